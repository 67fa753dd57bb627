use std::collections::BTreeSet;

use otter_omt::{
    config::{Config, Priority},
    environment::Environment,
    numeric::rational,
    objective::{Goal, Objective, ObjectiveValue, SearchStatus},
    reports::Report,
    terms::{Term, TermStore},
};

fn environment(options: &[(&str, &str)]) -> Environment {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_options(options.iter().copied()).unwrap();
    Environment::from_config(config).unwrap()
}

fn exactly(n: i64) -> ObjectiveValue {
    ObjectiveValue::exactly(rational(n))
}

/// Points of the plane, as values of reals `a` and `b`, with objectives to maximize `a` and `b`.
fn plane(env: &mut Environment, points: &[(i64, i64)]) -> (Objective, Objective) {
    let store = env.terms().clone();
    let a = store.real_var("a").unwrap();
    let b = store.real_var("b").unwrap();

    let point = |store: &TermStore, x: i64, y: i64| -> Term {
        store
            .and(&[
                store.eq(a, store.real(x).unwrap()).unwrap(),
                store.eq(b, store.real(y).unwrap()).unwrap(),
            ])
            .unwrap()
    };
    let points = points
        .iter()
        .map(|(x, y)| point(&store, *x, *y))
        .collect::<Vec<_>>();
    env.assert_hard(store.or(&points).unwrap()).unwrap();

    let max_a = env.create_objective(Goal::maximize(a)).unwrap();
    let max_b = env.create_objective(Goal::maximize(b)).unwrap();
    env.assert_objective(max_a).unwrap();
    env.assert_objective(max_b).unwrap();
    (max_a, max_b)
}

/// Six points of the plane, of which (3, 1), (1, 3), and (2, 2) are Pareto-optimal when maximizing both coordinates.
fn six_points(env: &mut Environment) -> (Objective, Objective) {
    plane(env, &[(1, 1), (2, 1), (1, 2), (2, 2), (3, 1), (1, 3)])
}

/// Enumerates Pareto-optimal points until exhausted, as pairs of integers.
fn enumerate(env: &mut Environment, a: Objective, b: Objective) -> BTreeSet<(i64, i64)> {
    let mut found = BTreeSet::default();
    for _ in 0..10 {
        match env.solve().unwrap() {
            Report::Satisfiable => {
                assert_eq!(env.objective_status(a), Ok(SearchStatus::SatOptimal));
                let value = |objective: Objective| -> i64 {
                    let exact = env.objective_value(objective).unwrap().exact().unwrap();
                    i64::try_from(exact.to_integer()).unwrap()
                };
                found.insert((value(a), value(b)));
            }
            Report::Unsatisfiable => return found,
            Report::Unknown => panic!("Unknown report"),
        }
    }
    panic!("Enumeration failed to terminate");
}

mod boxed {
    use super::*;

    #[test]
    fn independent_optima() {
        let mut env = environment(&[("opt.priority", "box")]);
        let (a, b) = six_points(&mut env);

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(a), Ok(exactly(3)));
        assert_eq!(env.objective_value(b), Ok(exactly(3)));
    }
}

mod lexicographic {
    use super::*;

    #[test]
    fn earlier_objectives_bound_later() {
        let mut env = environment(&[("opt.priority", "lex")]);
        let (a, b) = six_points(&mut env);

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(a), Ok(exactly(3)));
        assert_eq!(env.objective_value(b), Ok(exactly(1)));
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn repeated_solves_agree() {
        let mut env = environment(&[("opt.priority", "lex")]);
        let (a, b) = plane(&mut env, &[(1, 5), (4, 2), (4, 3), (2, 6), (4, 1)]);

        env.solve().unwrap();
        let first = (env.objective_value(a), env.objective_value(b));
        assert_eq!(first, (Ok(exactly(4)), Ok(exactly(3))));

        for _ in 0..3 {
            assert_eq!(env.solve(), Ok(Report::Satisfiable));
            assert_eq!((env.objective_value(a), env.objective_value(b)), first);
        }

        env.push().unwrap();
        env.pop().unwrap();
        env.solve().unwrap();
        assert_eq!((env.objective_value(a), env.objective_value(b)), first);
    }

    #[test]
    fn suppliers() {
        let mut env = environment(&[("opt.priority", "lex"), ("model_generation", "true")]);
        let store = env.terms().clone();

        let q = ["q1", "q2", "q3", "q4"].map(|name| store.real_var(name).unwrap());
        let s = ["s1", "s2", "s3", "s4"].map(|name| store.bool_var(name).unwrap());
        let real = |n: i64| store.real(n).unwrap();

        env.assert_hard(store.eq(real(250), store.add(&q).unwrap()).unwrap()).unwrap();

        for (quantity, (least, most)) in q.iter().zip([(50, 250), (100, 150), (100, 100), (50, 100)]) {
            let offered = store
                .and(&[
                    store.le(real(least), *quantity).unwrap(),
                    store.le(*quantity, real(most)).unwrap(),
                ])
                .unwrap();
            let unused = store.eq(*quantity, real(0)).unwrap();
            env.assert_hard(store.or(&[unused, offered]).unwrap()).unwrap();
        }

        for (used, quantity) in s.iter().zip(q) {
            let sends = store.not(store.eq(quantity, real(0)).unwrap()).unwrap();
            env.assert_hard(store.implies(*used, sends).unwrap()).unwrap();
        }

        let mut unused_suppliers = None;
        for used in s {
            unused_suppliers = Some(env.assert_soft(used, rational(1), "unused_suppliers").unwrap());
        }

        let prices = [23, 21, 20, 10];
        let cost = store
            .add(
                &q.iter()
                    .zip(prices)
                    .map(|(quantity, price)| store.mul(&[*quantity, real(price)]).unwrap())
                    .collect::<Vec<_>>(),
            )
            .unwrap();

        let cost = env.create_objective(Goal::minimize(cost)).unwrap();
        let unused = env
            .create_objective(Goal::minimize(unused_suppliers.unwrap()))
            .unwrap();
        env.assert_objective(cost).unwrap();
        env.assert_objective(unused).unwrap();

        assert_eq!(env.solve(), Ok(Report::Satisfiable));
        assert_eq!(env.objective_value(cost), Ok(exactly(4150)));
        assert_eq!(env.objective_value(unused), Ok(exactly(1)));

        env.load_objective_model(cost).unwrap();
        let model = env.model().unwrap();
        assert_eq!(model.eval_rational(&store, q[3], false), Ok(rational(100)));
    }
}

mod pareto {
    use super::*;

    #[test]
    fn each_point_once() {
        let mut env = environment(&[("opt.priority", "par"), ("model_generation", "true")]);
        let (a, b) = six_points(&mut env);

        let found = enumerate(&mut env, a, b);
        assert_eq!(found, BTreeSet::from([(3, 1), (1, 3), (2, 2)]));
        assert_eq!(env.pareto_points().len(), 3);

        // Exhausted until the enumeration is reset.
        assert_eq!(env.solve(), Ok(Report::Unsatisfiable));
        assert_eq!(env.objective_status(a), Ok(SearchStatus::Unsat));
    }

    #[test]
    fn frontier_is_undominated() {
        let points = [
            (1, 1),
            (2, 1),
            (1, 2),
            (2, 2),
            (3, 1),
            (1, 3),
            (0, 4),
            (4, 0),
            (3, 2),
            (0, 0),
        ];
        let dominates = |p: &(i64, i64), q: &(i64, i64)| p.0 >= q.0 && p.1 >= q.1 && p != q;

        let mut env = environment(&[("opt.priority", "par")]);
        let (a, b) = plane(&mut env, &points);
        let found = enumerate(&mut env, a, b);

        for p in &found {
            assert!(points.contains(p));
            assert!(!points.iter().any(|q| dominates(q, p)), "{p:?} is dominated");
        }
        for p in &points {
            if !points.iter().any(|q| dominates(q, p)) {
                assert!(found.contains(p), "{p:?} is missing");
            }
        }
        assert_eq!(found, BTreeSet::from([(0, 4), (1, 3), (3, 2), (4, 0)]));
    }

    #[test]
    fn reset_by_assertion() {
        let mut env = environment(&[("opt.priority", "par")]);
        let (a, b) = six_points(&mut env);

        assert_eq!(env.solve(), Ok(Report::Satisfiable));

        let store = env.terms().clone();
        let a_term = store.lookup("a").unwrap();
        env.assert_hard(store.le(a_term, store.real(2).unwrap()).unwrap()).unwrap();
        assert!(env.pareto_points().is_empty());

        let found = enumerate(&mut env, a, b);
        assert_eq!(found, BTreeSet::from([(1, 3), (2, 2)]));
    }
}

mod priority {
    use super::*;

    #[test]
    fn each_priority_in_turn() {
        let mut env = environment(&[("model_generation", "true")]);
        let (a, b) = six_points(&mut env);

        env.set_priority(Priority::Box);
        env.solve().unwrap();
        assert_eq!(env.objective_value(a), Ok(exactly(3)));
        assert_eq!(env.objective_value(b), Ok(exactly(3)));

        env.set_priority(Priority::Lexicographic);
        env.solve().unwrap();
        assert_eq!(env.objective_value(a), Ok(exactly(3)));
        assert_eq!(env.objective_value(b), Ok(exactly(1)));

        env.set_priority(Priority::Pareto);
        let found = enumerate(&mut env, a, b);
        assert_eq!(found.len(), 3);
        assert_eq!(env.counters.pareto_points, 3);
    }
}
