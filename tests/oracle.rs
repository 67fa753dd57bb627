use std::{cell::Cell, rc::Rc};

use otter_omt::{
    config::Config,
    environment::GenericEnvironment,
    model::Model,
    numeric::rational,
    objective::{Goal, ObjectiveValue, SearchStatus, StepOutcome},
    oracle::{LocalGoal, LocalOptimum, Oracle, SatResult, SmtOracle},
    reports::Report,
    terms::{Term, TermStore},
    types::err::ErrorKind,
};

/// The bundled oracle, with a shared count of checks.
struct Counting {
    inner: SmtOracle,
    checks: Rc<Cell<usize>>,
}

impl Oracle for Counting {
    fn terms(&self) -> &TermStore {
        self.inner.terms()
    }

    fn push(&mut self) -> Result<(), ErrorKind> {
        self.inner.push()
    }

    fn pop(&mut self) -> Result<(), ErrorKind> {
        self.inner.pop()
    }

    fn depth(&self) -> usize {
        self.inner.depth()
    }

    fn assert_hard(&mut self, term: Term) -> Result<(), ErrorKind> {
        self.inner.assert_hard(term)
    }

    fn check_sat(
        &mut self,
        assumptions: &[Term],
        terminate: &mut dyn FnMut() -> bool,
    ) -> Result<SatResult, ErrorKind> {
        self.checks.set(self.checks.get() + 1);
        self.inner.check_sat(assumptions, terminate)
    }

    fn get_model(&self) -> Result<Model, ErrorKind> {
        self.inner.get_model()
    }

    fn unsat_core(&self) -> Result<Vec<Term>, ErrorKind> {
        self.inner.unsat_core()
    }

    fn optimize_local(&mut self, goal: &LocalGoal) -> Result<LocalOptimum, ErrorKind> {
        self.inner.optimize_local(goal)
    }
}

fn environment(options: &[(&str, &str)]) -> (GenericEnvironment<Counting>, Rc<Cell<usize>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_options(options.iter().copied()).unwrap();
    let checks = Rc::new(Cell::new(0));
    let oracle = Counting {
        inner: SmtOracle::new(TermStore::default(), config.sat.clone()).unwrap(),
        checks: checks.clone(),
    };
    (GenericEnvironment::with_oracle(config, oracle).unwrap(), checks)
}

/// Asserts `x` is one of a few values, and minimizes `x` with linear steps.
fn minimize_choice(options: &[(&str, &str)]) -> (GenericEnvironment<Counting>, Rc<Cell<usize>>) {
    let mut options = options.to_vec();
    options.push(("opt.strategy", "lin"));
    options.push(("model_generation", "true"));
    let (mut env, checks) = environment(&options);

    let store = env.terms().clone();
    let x = store.real_var("x").unwrap();
    let choices = [90, 50, 12, 11]
        .iter()
        .map(|v| store.eq(x, store.real(*v).unwrap()).unwrap())
        .collect::<Vec<_>>();
    env.assert_hard(store.or(&choices).unwrap()).unwrap();

    let objective = env.create_objective(Goal::minimize(x)).unwrap();
    env.assert_objective(objective).unwrap();
    (env, checks)
}

mod checks {
    use super::*;

    #[test]
    fn empty_window() {
        let (mut env, checks) = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();

        let goal = Goal::minimize(x)
            .lower(store.int(10).unwrap())
            .upper(store.int(1).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        // Only the check of the hard constraints.
        assert_eq!(checks.get(), 1);
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::Unsat));
    }

    #[test]
    fn each_step_is_one_check() {
        let (mut env, checks) = environment(&[("opt.strategy", "lin")]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(3).unwrap()).unwrap()).unwrap();

        let objective = env.create_objective(Goal::minimize(x)).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        let steps = env.objective_state(objective).unwrap().steps as usize;
        assert_eq!(checks.get(), steps + 1);
    }

    #[test]
    fn all_sat_over_hard_constraints() {
        let (mut env, checks) = environment(&[]);
        let store = env.terms().clone();
        let p = store.bool_var("p").unwrap();
        let q = store.bool_var("q").unwrap();
        env.assert_hard(store.or(&[p, q]).unwrap()).unwrap();

        let mut count = 0;
        let report = env.all_sat(&[p, q], &mut |_| {
            count += 1;
            true
        });
        assert_eq!(report, Ok(Report::Satisfiable));
        assert_eq!(count, 3);
        // One check per assignment, and one to find no more.
        assert_eq!(checks.get(), 4);
        assert_eq!(env.depth(), 0);
    }
}

mod interruption {
    use super::*;

    #[test]
    fn partial_after_a_witness() {
        let (mut env, checks) = minimize_choice(&[]);

        // The hard constraints and the first step complete, and the second step is interrupted.
        let counted = checks.clone();
        env.set_callback_terminate(Box::new(move || counted.get() >= 3));
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.depth(), 0);

        let objective = env.objectives()[0];
        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatPartial);
        assert_eq!(state.history[0].outcome, StepOutcome::Improved);
        assert!(state.model.is_some());

        let value = state.value();
        assert!(value <= ObjectiveValue::exactly(rational(90)));
        assert!(value >= ObjectiveValue::exactly(rational(11)));
    }

    #[test]
    fn soft_timeout_is_approximate() {
        let (mut env, checks) = minimize_choice(&[("opt.soft_timeout", "true")]);

        let counted = checks.clone();
        env.set_callback_terminate(Box::new(move || counted.get() >= 3));
        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        let objective = env.objectives()[0];
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::SatApprox));
        assert!(env.objective_value(objective).is_ok());
    }

    #[test]
    fn unknown_without_a_witness() {
        let (mut env, checks) = minimize_choice(&[]);

        // Only the hard constraints complete.
        let counted = checks.clone();
        env.set_callback_terminate(Box::new(move || counted.get() >= 2));
        assert_eq!(env.solve(), Ok(Report::Unknown));

        let objective = env.objectives()[0];
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::Unknown));
        assert_eq!(env.depth(), 0);
    }
}
