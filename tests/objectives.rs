use otter_omt::{
    config::Config,
    environment::Environment,
    numeric::{rational, DeltaRational},
    objective::{Goal, ObjectiveKind, ObjectiveValue, SearchStatus},
    reports::Report,
    terms::Sort,
    types::err::{ErrorKind, TermError, TypeError},
};

fn environment(options: &[(&str, &str)]) -> Environment {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_options(options.iter().copied()).unwrap();
    Environment::from_config(config).unwrap()
}

fn exactly(n: i64) -> ObjectiveValue {
    ObjectiveValue::exactly(rational(n))
}

mod single {
    use super::*;

    #[test]
    fn least_and_unbounded() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        let y = store.int_var("y").unwrap();

        assert!(env.assert_hard(store.ge(x, store.int(42).unwrap()).unwrap()).is_ok());
        assert!(env.assert_hard(store.le(y, x).unwrap()).is_ok());

        let min_x = env.create_objective(Goal::minimize(x)).unwrap();
        let min_y = env.create_objective(Goal::minimize(y)).unwrap();
        env.assert_objective(min_x).unwrap();
        env.assert_objective(min_y).unwrap();

        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        assert_eq!(env.objective_status(min_x), Ok(SearchStatus::SatOptimal));
        assert_eq!(env.objective_value(min_x), Ok(exactly(42)));

        assert_eq!(env.objective_status(min_y), Ok(SearchStatus::SatOptimal));
        assert_eq!(env.objective_value(min_y), Ok(ObjectiveValue::MinusInfinity));
    }

    #[test]
    fn strict_supremum() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let b = store.real_var("b").unwrap();
        env.assert_hard(store.lt(b, store.real(3).unwrap()).unwrap()).unwrap();

        let max_b = env.create_objective(Goal::maximize(b)).unwrap();
        env.assert_objective(max_b).unwrap();
        env.solve().unwrap();

        let value = env.objective_value(max_b).unwrap();
        assert_eq!(env.objective_status(max_b), Ok(SearchStatus::SatOptimal));
        assert_eq!(
            value,
            ObjectiveValue::Finite(DeltaRational::new(rational(3), rational(-1)))
        );
        assert_eq!(value.to_string(), "(- 3 epsilon)");
        assert_eq!(value.exact(), None);
    }

    #[test]
    fn each_kind_of_result() {
        let mut env = environment(&[("model_generation", "true")]);
        let store = env.terms().clone();
        let a = store.real_var("a").unwrap();
        let b = store.real_var("b").unwrap();
        let c = store.real_var("c").unwrap();
        let d = store.real_var("d").unwrap();

        env.assert_hard(store.le(store.real(42).unwrap(), a).unwrap()).unwrap();
        env.assert_hard(store.lt(b, store.real(3).unwrap()).unwrap()).unwrap();

        let zero = store.real(0).unwrap();
        let objectives = [
            env.create_objective(Goal::minimize(a)).unwrap(),
            env.create_objective(Goal::maximize(b)).unwrap(),
            env.create_objective(Goal::minimize(c)).unwrap(),
            env.create_objective(Goal::minimize(d).lower(zero).upper(zero)).unwrap(),
        ];
        for objective in objectives {
            env.assert_objective(objective).unwrap();
        }
        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        let [a_obj, b_obj, c_obj, d_obj] = objectives;
        assert_eq!(env.objective_value(a_obj).unwrap().to_string(), "42");
        assert_eq!(env.objective_value(b_obj).unwrap().to_string(), "(- 3 epsilon)");
        assert_eq!(env.objective_value(c_obj).unwrap().to_string(), "-oo");
        assert_eq!(env.objective_status(d_obj), Ok(SearchStatus::Unsat));

        let approximate = env.objective_value(b_obj).unwrap().approximate_default();
        assert_eq!(
            approximate,
            otter_omt::numeric::ratio(2_999_999, 1_000_000)
        );
        assert_eq!(
            env.objective_value(c_obj).unwrap().approximate_default(),
            rational(-1_000_000_000)
        );
        assert_eq!(env.objective_state(d_obj).unwrap().steps, 0);
    }
}

mod bounds {
    use super::*;

    #[test]
    fn minimize_within_bounds() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(0).unwrap()).unwrap()).unwrap();

        let goal = Goal::minimize(x)
            .lower(store.int(23).unwrap())
            .upper(store.int(100).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_value(objective), Ok(exactly(23)));
    }

    #[test]
    fn maximize_includes_upper_bound() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.le(x, store.int(1000).unwrap()).unwrap()).unwrap();

        let goal = Goal::maximize(x)
            .lower(store.int(23).unwrap())
            .upper(store.int(100).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_status(objective), Ok(SearchStatus::SatOptimal));
        assert_eq!(env.objective_value(objective), Ok(exactly(100)));
    }

    #[test]
    fn bound_outside_the_constraints() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.le(x, store.int(5).unwrap()).unwrap()).unwrap();

        let goal = Goal::minimize(x).lower(store.int(10).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_status(objective), Ok(SearchStatus::Unsat));
        assert!(env.objective_value(objective).is_err());
    }

    #[test]
    fn empty_window() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();

        let goal = Goal::minimize(x)
            .lower(store.int(10).unwrap())
            .upper(store.int(1).unwrap());
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        let state = env.objective_state(objective).unwrap();
        assert_eq!(state.status, SearchStatus::Unsat);
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn bounds_must_be_ground() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        let y = store.int_var("y").unwrap();

        assert_eq!(
            env.create_objective(Goal::minimize(x).lower(y)),
            Err(ErrorKind::Term(TermError::NotGround))
        );

        let sum = store.add(&[store.int(2).unwrap(), store.int(3).unwrap()]).unwrap();
        let objective = env.create_objective(Goal::minimize(x).lower(sum)).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();
        assert_eq!(env.objective_value(objective), Ok(exactly(5)));
    }
}

mod sorts {
    use super::*;

    #[test]
    fn unsigned_bit_vector() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.bv_var("x", 8).unwrap();
        env.assert_hard(store.bv_uge(x, store.bv(8, 8).unwrap()).unwrap()).unwrap();

        let min_x = env.create_objective(Goal::minimize(x)).unwrap();
        let max_x = env.create_objective(Goal::maximize(x)).unwrap();
        env.assert_objective(min_x).unwrap();
        env.assert_objective(max_x).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_value(min_x), Ok(exactly(8)));
        assert_eq!(env.objective_value(max_x), Ok(exactly(255)));
    }

    #[test]
    fn signed_bit_vector() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let x = store.bv_var("x", 8).unwrap();
        env.assert_hard(store.bv_sge(x, store.bv_signed(-16, 8).unwrap()).unwrap()).unwrap();

        let goal = Goal::minimize(x).lower(store.bv_signed(-100, 8).unwrap()).signed(true);
        let objective = env.create_objective(goal).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_status(objective), Ok(SearchStatus::SatOptimal));
        assert_eq!(env.objective_value(objective), Ok(exactly(-16)));
    }

    #[test]
    fn unsupported_sorts() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let p = store.bool_var("p").unwrap();
        let x = store.bv_var("x", 8).unwrap();
        let f = store.fp_var("f", 8, 24).unwrap();

        assert_eq!(
            env.create_objective(Goal::minimize(p)),
            Err(ErrorKind::TypeMismatch(TypeError::UnsupportedObjective(Sort::Bool)))
        );
        let float = env.create_objective(Goal::maximize(f));
        assert_eq!(
            float,
            Err(ErrorKind::TypeMismatch(TypeError::UnsupportedObjective(Sort::Float {
                exponent: 8,
                significand: 24
            })))
        );
        assert_eq!(
            float.unwrap_err().to_string(),
            "floating-point objectives are unsupported"
        );
        assert_eq!(
            env.create_objective(Goal::minimize(x).upper(store.int(3).unwrap())),
            Err(ErrorKind::TypeMismatch(TypeError::Incompatible(
                Sort::BitVector(8),
                Sort::Int
            )))
        );
    }
}

mod minmax {
    use super::*;

    #[test]
    fn least_greatest() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let l0 = store.int_var("l0").unwrap();
        let l1 = store.int_var("l1").unwrap();
        let l2 = store.int_var("l2").unwrap();

        env.assert_hard(store.lt(store.int(10).unwrap(), l0).unwrap()).unwrap();
        env.assert_hard(store.lt(l2, l1).unwrap()).unwrap();
        env.assert_hard(store.lt(store.int(14).unwrap(), l2).unwrap()).unwrap();

        let objective = env.create_objective(Goal::min_max(&[l0, l1, l2])).unwrap();
        env.assert_objective(objective).unwrap();
        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        assert_eq!(env.objective_status(objective), Ok(SearchStatus::SatOptimal));
        assert_eq!(env.objective_value(objective), Ok(exactly(16)));
    }

    #[test]
    fn greatest_least() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let a = store.int_var("a").unwrap();
        let b = store.int_var("b").unwrap();

        env.assert_hard(store.le(a, store.int(7).unwrap()).unwrap()).unwrap();
        env.assert_hard(store.le(b, store.int(4).unwrap()).unwrap()).unwrap();

        let objective = env.create_objective(Goal::max_min(&[a, b])).unwrap();
        env.assert_objective(objective).unwrap();
        env.solve().unwrap();

        assert_eq!(env.objective_value(objective), Ok(exactly(4)));
    }

    #[test]
    fn arity() {
        let mut env = environment(&[]);
        let store = env.terms().clone();
        let a = store.int_var("a").unwrap();
        let b = store.int_var("b").unwrap();

        let mut goal = Goal::min_max(&[a, b]);
        goal.kind = ObjectiveKind::Minimize;
        assert_eq!(
            env.create_objective(goal),
            Err(ErrorKind::Term(TermError::Arity))
        );
        assert_eq!(
            env.create_objective(Goal::min_max(&[])),
            Err(ErrorKind::Term(TermError::EmptyObjective))
        );
    }
}
