use std::collections::BTreeSet;

use otter_omt::{
    config::Config,
    environment::Environment,
    numeric::rational,
    objective::{Goal, Objective, ObjectiveValue, SearchStatus},
    reports::Report,
    terms::Term,
    types::err::{ErrorKind, StateError, TypeError},
};

fn environment(options: &[(&str, &str)]) -> Environment {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_options(options.iter().copied()).unwrap();
    Environment::from_config(config).unwrap()
}

fn exactly(n: i64) -> ObjectiveValue {
    ObjectiveValue::exactly(rational(n))
}

mod incremental {
    use super::*;

    #[test]
    fn objectives_follow_checkpoints() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.real_var("x").unwrap();
        let objective = env.create_objective(Goal::minimize(x)).unwrap();

        env.push().unwrap();
        env.assert_objective(objective).unwrap();
        env.assert_hard(store.le(store.real(5).unwrap(), x).unwrap()).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(objective), Ok(exactly(5)));
        env.pop().unwrap();

        env.push().unwrap();
        env.assert_objective(objective).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(objective), Ok(ObjectiveValue::MinusInfinity));
        env.pop().unwrap();

        assert!(env.objectives().is_empty());
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(
            env.objective_value(objective),
            Err(ErrorKind::InvalidState(StateError::NoValue))
        );
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn repeated_solves() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(3).unwrap()).unwrap()).unwrap();

        let objective = env.create_objective(Goal::minimize(x)).unwrap();
        env.assert_objective(objective).unwrap();
        env.assert_objective(objective).unwrap();
        assert_eq!(env.objectives().len(), 1);

        env.solve().unwrap();
        assert_eq!(env.objective_value(objective), Ok(exactly(3)));

        env.assert_hard(store.ge(x, store.int(8).unwrap()).unwrap()).unwrap();
        env.solve().unwrap();
        assert_eq!(env.objective_value(objective), Ok(exactly(8)));
        assert_eq!(env.counters.solves, 2);
        assert_eq!(env.counters.searches, 2);
    }

    #[test]
    fn unsatisfiable_constraints() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        let objective = env.create_objective(Goal::maximize(x)).unwrap();
        env.assert_objective(objective).unwrap();

        env.push().unwrap();
        env.assert_hard(store.lt(x, store.int(0).unwrap()).unwrap()).unwrap();
        env.assert_hard(store.gt(x, store.int(0).unwrap()).unwrap()).unwrap();
        assert_eq!(env.solve(), Ok(Report::Unsatisfiable));
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::Unsat));
        env.pop().unwrap();

        env.assert_hard(store.lt(x, store.int(0).unwrap()).unwrap()).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(objective), Ok(exactly(-1)));
    }
}

mod limits {
    use super::*;

    #[test]
    fn distant_time_limit() {
        let mut env = environment(&[("time_limit", "1e19")]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(4).unwrap()).unwrap()).unwrap();

        let objective = env.create_objective(Goal::minimize(x)).unwrap();
        env.assert_objective(objective).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(objective), Ok(exactly(4)));
    }

    #[test]
    fn unrepresentable_time_limit() {
        assert!(Config::from_options([("time_limit", "1e30")]).is_err());
    }
}

mod all_sat {
    use super::*;

    #[test]
    fn important_atoms() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let [a, b, e] = ["a", "b", "e"].map(|name| store.bool_var(name).unwrap());
        let [x, y] = ["x", "y"].map(|name| store.int_var(name).unwrap());
        let int = |n: i64| store.int(n).unwrap();

        let positive = store.gt(store.add(&[x, y]).unwrap(), int(0)).unwrap();
        env.assert_hard(store.iff(a, positive).unwrap()).unwrap();
        env.assert_hard(store.or(&[a, b]).unwrap()).unwrap();
        env.assert_hard(store.iff(e, store.lt(int(10), x).unwrap()).unwrap()).unwrap();
        env.assert_hard(store.le(x, int(100)).unwrap()).unwrap();
        env.assert_hard(store.le(y, int(100)).unwrap()).unwrap();

        let mut found = BTreeSet::default();
        let report = env.all_sat(&[a, b, e], &mut |assignment| {
            let values = assignment.iter().map(|(_, value)| *value).collect::<Vec<_>>();
            assert!(found.insert(values), "Assignment repeated");
            true
        });
        assert_eq!(report, Ok(Report::Satisfiable));

        let expected = [
            [true, true, true],
            [true, true, false],
            [true, false, true],
            [true, false, false],
            [false, true, true],
            [false, true, false],
        ];
        assert_eq!(found, expected.iter().map(|v| v.to_vec()).collect::<BTreeSet<_>>());

        // The blocking clauses are retracted.
        assert_eq!(env.depth(), 0);
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
    }

    #[test]
    fn stopped_by_callback() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let [p, q, r] = ["p", "q", "r"].map(|name| store.bool_var(name).unwrap());

        let mut count = 0;
        let report = env.all_sat(&[p, q, r], &mut |_| {
            count += 1;
            count < 2
        });
        assert_eq!(report, Ok(Report::Satisfiable));
        assert_eq!(count, 2);
    }

    #[test]
    fn unsatisfiable_and_malformed() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let p = store.bool_var("p").unwrap();
        let x = store.int_var("x").unwrap();

        assert!(matches!(
            env.all_sat(&[x], &mut |_| true),
            Err(ErrorKind::TypeMismatch(TypeError::Expected { .. }))
        ));

        env.assert_hard(p).unwrap();
        env.assert_hard(store.not(p).unwrap()).unwrap();
        assert_eq!(env.all_sat(&[p], &mut |_| true), Ok(Report::Unsatisfiable));
    }
}

mod models {
    use super::*;

    /// `3 ≤ x ≤ 5`, `10 ≤ z ≤ 20`, and `y = 2x + z`, minimizing `x` and maximizing `y`.
    fn problem(priority: &str) -> (Environment, [Term; 3], [Objective; 2]) {
        let mut env = environment(&[("opt.priority", priority), ("model_generation", "true")]);
        let store = env.terms().clone();
        let [x, y, z] = ["x", "y", "z"].map(|name| store.int_var(name).unwrap());
        let int = |n: i64| store.int(n).unwrap();

        env.assert_hard(store.le(int(3), x).unwrap()).unwrap();
        env.assert_hard(store.le(x, int(5)).unwrap()).unwrap();
        env.assert_hard(store.le(int(10), z).unwrap()).unwrap();
        env.assert_hard(store.le(z, int(20)).unwrap()).unwrap();
        let double = store.mul(&[int(2), x]).unwrap();
        env.assert_hard(store.eq(y, store.add(&[double, z]).unwrap()).unwrap()).unwrap();

        let min_x = env.create_objective(Goal::minimize(x)).unwrap();
        let max_y = env.create_objective(Goal::maximize(y)).unwrap();
        env.assert_objective(min_x).unwrap();
        env.assert_objective(max_y).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        (env, [x, y, z], [min_x, max_y])
    }

    #[test]
    fn boxed_models() {
        let (mut env, [x, y, z], [min_x, max_y]) = problem("box");
        let store = env.terms().clone();
        assert_eq!(env.objective_value(min_x), Ok(exactly(3)));
        assert_eq!(env.objective_value(max_y), Ok(exactly(30)));

        env.load_objective_model(min_x).unwrap();
        assert_eq!(env.model().unwrap().eval_rational(&store, x, false), Ok(rational(3)));

        env.load_objective_model(max_y).unwrap();
        let model = env.model().unwrap();
        assert_eq!(model.eval_rational(&store, x, false), Ok(rational(5)));
        assert_eq!(model.eval_rational(&store, y, false), Ok(rational(30)));
        assert_eq!(model.eval_rational(&store, z, false), Ok(rational(20)));
    }

    #[test]
    fn lexicographic_models() {
        let (mut env, [x, _, z], [min_x, max_y]) = problem("lex");
        let store = env.terms().clone();
        assert_eq!(env.objective_value(min_x), Ok(exactly(3)));
        assert_eq!(env.objective_value(max_y), Ok(exactly(26)));

        env.load_objective_model(max_y).unwrap();
        let model = env.model().unwrap();
        assert_eq!(model.eval_rational(&store, x, false), Ok(rational(3)));
        assert_eq!(model.eval_rational(&store, z, false), Ok(rational(20)));
    }

    #[test]
    fn without_model_generation() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(1).unwrap()).unwrap()).unwrap();

        let objective = env.create_objective(Goal::minimize(x)).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_value(objective), Ok(exactly(1)));
        assert!(env.objective_state(objective).unwrap().model.is_none());
        assert_eq!(
            env.load_objective_model(objective),
            Err(ErrorKind::InvalidState(StateError::ModelGenerationDisabled))
        );
        assert_eq!(
            env.model().err(),
            Some(ErrorKind::InvalidState(StateError::ModelGenerationDisabled))
        );
    }

    #[test]
    fn model_of_the_hard_constraints() {
        let mut env = environment(&[("model_generation", "true")]);
        let store = env.terms().clone();
        let p = store.bool_var("p").unwrap();
        env.assert_hard(p).unwrap();

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.model().unwrap().satisfies(&store, p), Ok(true));
    }
}

mod sharing {
    use super::*;

    #[test]
    fn siblings_share_terms() {
        let mut env = environment(&[]);
        let mut other = env.sibling().unwrap();
        let store = env.terms().clone();
        assert!(store.same_store(other.terms()));

        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(1).unwrap()).unwrap()).unwrap();
        other.assert_hard(store.ge(x, store.int(2).unwrap()).unwrap()).unwrap();

        let in_env = env.create_objective(Goal::minimize(x)).unwrap();
        let in_other = other.create_objective(Goal::minimize(x)).unwrap();
        env.assert_objective(in_env).unwrap();
        other.assert_objective(in_other).unwrap();

        env.solve().unwrap();
        other.solve().unwrap();
        assert_eq!(env.objective_value(in_env), Ok(exactly(1)));
        assert_eq!(other.objective_value(in_other), Ok(exactly(2)));

        assert!(matches!(
            env.objective_value(in_other),
            Err(ErrorKind::InvalidHandle(_))
        ));
    }

    #[test]
    fn foreign_terms() {
        let mut env = environment(&[]);
        let other = environment(&[]);
        let foreign = other.terms().int_var("x").unwrap();
        let foreign = other.terms().ge(foreign, other.terms().int(0).unwrap()).unwrap();

        // The term store of each environment is distinct.
        assert!(!env.terms().same_store(other.terms()));
        assert!(matches!(
            env.assert_hard(foreign),
            Err(ErrorKind::InvalidHandle(_))
        ));
    }
}
