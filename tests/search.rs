use otter_omt::{
    config::Config,
    environment::Environment,
    numeric::{ratio, rational},
    objective::{Goal, Objective, ObjectiveValue, SearchStatus, StepKind, StepOutcome},
    reports::Report,
    terms::Term,
};

fn environment(options: &[(&str, &str)]) -> Environment {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_options(options.iter().copied()).unwrap();
    Environment::from_config(config).unwrap()
}

fn exactly(n: i64) -> ObjectiveValue {
    ObjectiveValue::exactly(rational(n))
}

/// Minimizes an integer `x ≥ floor`, with optional bounds on the objective.
fn minimize_above(env: &mut Environment, floor: i64, bounds: Option<(i64, i64)>) -> (Term, Objective) {
    let store = env.terms().clone();
    let x = store.int_var("x").unwrap();
    env.assert_hard(store.ge(x, store.int(floor).unwrap()).unwrap()).unwrap();

    let goal = match bounds {
        Some((lower, upper)) => Goal::minimize(x)
            .lower(store.int(lower).unwrap())
            .upper(store.int(upper).unwrap()),
        None => Goal::minimize(x),
    };
    let objective = env.create_objective(goal).unwrap();
    env.assert_objective(objective).unwrap();
    (x, objective)
}

mod strategies {
    use super::*;

    #[test]
    fn linear() {
        let mut env = environment(&[("opt.strategy", "lin")]);
        let (_, objective) = minimize_above(&mut env, 27, Some((23, 100)));
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatOptimal);
        assert_eq!(state.value(), exactly(27));
        assert_eq!(state.binary_steps, 0);
        assert!(state.history.iter().all(|step| step.kind == StepKind::Linear));
    }

    #[test]
    fn binary_pivots() {
        let mut env = environment(&[
            ("opt.strategy", "bin"),
            ("opt.bin.first_step_linear", "false"),
            ("opt.bin.max_consecutive", "2"),
            ("opt.bin.pivot_position", "0.5"),
        ]);
        let (_, objective) = minimize_above(&mut env, 27, Some((23, 100)));
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatOptimal);
        assert_eq!(state.value(), exactly(27));

        let first = &state.history[0];
        assert_eq!(first.kind, StepKind::Binary);
        assert_eq!(first.pivot, Some(ratio(123, 2)));
        assert_eq!(first.outcome, StepOutcome::Improved);

        // Two refuted pivots, at 25 and 26, then a linear step closes the interval.
        let kinds = state.history.iter().map(|step| step.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![StepKind::Binary, StepKind::Binary, StepKind::Binary, StepKind::Linear]
        );
        assert_eq!(state.history[1].pivot, Some(rational(25)));
        assert_eq!(state.history[2].pivot, Some(rational(26)));
        assert_eq!(state.history[3].outcome, StepOutcome::Refuted);
    }

    #[test]
    fn binary_without_lower_bound() {
        let mut env = environment(&[
            ("opt.strategy", "bin"),
            ("opt.bin.first_step_linear", "false"),
        ]);
        let (_, objective) = minimize_above(&mut env, -7, None);
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.value(), exactly(-7));
        assert_eq!(state.history[0].kind, StepKind::Linear);
        assert_eq!(state.history[1].kind, StepKind::Binary);
        assert_eq!(state.history[1].pivot, Some(rational(-15)));
    }

    #[test]
    fn adaptive_without_lower_bound() {
        let mut env = environment(&[("opt.strategy", "ada")]);
        let (_, objective) = minimize_above(&mut env, -7, None);
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatOptimal);
        assert_eq!(state.value(), exactly(-7));
        assert_eq!(state.binary_steps, 0);
        assert_eq!(state.linear_steps, 2);
    }

    #[test]
    fn adaptive_with_bounds() {
        let mut env = environment(&[
            ("opt.strategy", "ada"),
            ("opt.bin.first_step_linear", "false"),
            ("opt.bin.max_consecutive", "5"),
        ]);
        let (_, objective) = minimize_above(&mut env, 27, Some((23, 100)));
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatOptimal);
        assert_eq!(state.value(), exactly(27));
        assert_eq!(state.history[0].kind, StepKind::Linear);
        assert!(state.binary_steps > 0);
    }

    #[test]
    fn maximize_with_binary_steps() {
        let mut env = environment(&[
            ("opt.strategy", "bin"),
            ("opt.bin.first_step_linear", "false"),
        ]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.le(x, store.int(40).unwrap()).unwrap()).unwrap();

        let goal = Goal::maximize(x)
            .lower(store.int(0).unwrap())
            .upper(store.int(100).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.value(), exactly(40));
        // The first pivot is written as a value of the objective.
        assert_eq!(state.history[0].pivot, Some(rational(50)));
        assert_eq!(state.history[0].outcome, StepOutcome::Refuted);
    }
}

mod tightening {
    use super::*;

    /// Checks the interval only shrinks over the history, and each model found is better than the last.
    fn tightens(env: &Environment, objective: Objective, minimize: bool) {
        let state = env.objective_state(objective).unwrap();
        assert!(!state.history.is_empty());

        for (before, after) in state.history.iter().zip(state.history.iter().skip(1)) {
            assert!(before.lower <= after.lower);
            assert!(after.upper <= before.upper);
        }

        let witnessed = state
            .history
            .iter()
            .filter(|step| step.outcome == StepOutcome::Improved)
            .map(|step| match minimize {
                true => step.upper.clone(),
                false => step.lower.clone(),
            })
            .collect::<Vec<_>>();
        assert!(!witnessed.is_empty());
        for pair in witnessed.windows(2) {
            match minimize {
                true => assert!(pair[1] < pair[0]),
                false => assert!(pair[1] > pair[0]),
            }
        }
    }

    #[test]
    fn each_strategy() {
        for strategy in ["lin", "bin", "ada"] {
            for minimize in [true, false] {
                let mut env = environment(&[
                    ("opt.strategy", strategy),
                    ("opt.bin.first_step_linear", "false"),
                ]);
                let store = env.terms().clone();
                let x = store.int_var("x").unwrap();
                let choices = [3, 17, 40, 41, 66, 90]
                    .iter()
                    .map(|v| store.eq(x, store.int(*v).unwrap()).unwrap())
                    .collect::<Vec<_>>();
                env.assert_hard(store.or(&choices).unwrap()).unwrap();

                let goal = match minimize {
                    true => Goal::minimize(x),
                    false => Goal::maximize(x),
                };
                let goal = goal.lower(store.int(0).unwrap()).upper(store.int(100).unwrap());
                let objective = env.create_objective(goal).unwrap();
                env.assert_objective(objective).unwrap();
                env.solve().unwrap();

                let expected = if minimize { 3 } else { 90 };
                assert_eq!(env.objective_value(objective), Ok(exactly(expected)), "{strategy}");
                tightens(&env, objective, minimize);
            }
        }
    }
}

mod abort {
    use super::*;

    #[test]
    fn step_interval() {
        let mut env = environment(&[("opt.abort_interval", "1")]);
        let (_, objective) = minimize_above(&mut env, 5, None);
        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::SatApprox);
        assert_eq!(state.steps, 1);
        assert_eq!(state.value(), exactly(5));
        assert_eq!(
            env.objective_interval(objective),
            Ok((ObjectiveValue::MinusInfinity, exactly(5)))
        );
    }

    #[test]
    fn tolerance() {
        let mut env = environment(&[("opt.abort_tolerance", "0.5")]);
        let store = env.terms().clone();
        let x = store.real_var("x").unwrap();
        let choices = [90, 50, 12, 11]
            .iter()
            .map(|v| store.eq(x, store.real(*v).unwrap()).unwrap())
            .collect::<Vec<_>>();
        env.assert_hard(store.or(&choices).unwrap()).unwrap();

        let goal = Goal::minimize(x)
            .lower(store.real(0).unwrap())
            .upper(store.real(100).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_status(objective), Ok(SearchStatus::SatApprox));
        let value = env.objective_value(objective).unwrap();
        assert!(value <= exactly(50));
        assert!(value >= exactly(11));
    }

    #[test]
    fn termination_callback() {
        let mut env = environment(&[]);
        let (_, objective) = minimize_above(&mut env, 5, None);

        env.set_callback_terminate(Box::new(|| true));
        assert_eq!(env.solve(), Ok(Report::Unknown));
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::Unknown));
        assert_eq!(env.depth(), 0);

        env.clear_callback_terminate();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(objective), Ok(exactly(5)));
        assert_eq!(env.counters.solves, 2);
    }
}
