/*!
The environment --- to which constraints and objectives are added and within which solves take place, etc.

Strictly, a [GenericEnvironment] and an [Environment].

The generic environment is generic over the [decision oracle](crate::oracle::Oracle), and an environment uses the bundled [SmtOracle](crate::oracle::SmtOracle).
[from_config](Environment::from_config) is implemented for an environment rather than a generic environment to avoid requiring an oracle to be supplied alongside a config.

# Example
```rust
# use otter_omt::environment::Environment;
# use otter_omt::config::Config;
# use otter_omt::objective::{Goal, ObjectiveValue, SearchStatus};
# use otter_omt::numeric::rational;
# use otter_omt::reports::Report;
let mut env = Environment::from_config(Config::default()).unwrap();
let store = env.terms().clone();

let x = store.int_var("x").unwrap();
let y = store.int_var("y").unwrap();
env.assert_hard(store.ge(x, store.int(42).unwrap()).unwrap()).unwrap();
env.assert_hard(store.le(y, x).unwrap()).unwrap();

let min_x = env.create_objective(Goal::minimize(x)).unwrap();
let max_y = env.create_objective(Goal::maximize(y)).unwrap();
env.assert_objective(min_x).unwrap();
env.assert_objective(max_y).unwrap();

assert_eq!(env.solve().unwrap(), Report::Satisfiable);

assert_eq!(env.objective_status(min_x).unwrap(), SearchStatus::SatOptimal);
assert_eq!(env.objective_value(min_x).unwrap(), ObjectiveValue::exactly(rational(42)));
assert_eq!(env.objective_value(max_y).unwrap(), ObjectiveValue::PlusInfinity);
```

# Checkpoints

Constraints and objectives are asserted within checkpoints, see [push](GenericEnvironment::push) and [pop](GenericEnvironment::pop).

An objective may be created at one depth and asserted at another.
Closing the checkpoint an objective was asserted within de-asserts the objective, and closing the checkpoint an objective was created within invalidates the objective.
*/

pub mod all_sat;
pub mod callbacks;
mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericEnvironment;
mod objectives;
mod solve;
mod specific;
pub use specific::Environment;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        objective::{Goal, SearchStatus},
        types::err::{ErrorKind, HandleError, StateError},
    };

    #[test]
    fn handles() {
        let mut env = Environment::from_config(Config::default()).unwrap();
        let mut other = env.sibling().unwrap();
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();

        let objective = env.create_objective(Goal::minimize(x)).unwrap();
        assert_eq!(
            other.assert_objective(objective),
            Err(ErrorKind::InvalidHandle(HandleError::ForeignObjective))
        );

        env.destroy_objective(objective).unwrap();
        assert_eq!(
            env.objective_status(objective),
            Err(ErrorKind::InvalidHandle(HandleError::DestroyedObjective))
        );
    }

    #[test]
    fn popped_objectives() {
        let mut env = Environment::from_config(Config::default()).unwrap();
        let store = env.terms().clone();
        let x = store.int_var("x").unwrap();
        env.assert_hard(store.ge(x, store.int(5).unwrap()).unwrap()).unwrap();

        let outer = env.create_objective(Goal::minimize(x)).unwrap();
        env.push().unwrap();
        env.assert_objective(outer).unwrap();
        let inner = env.create_objective(Goal::maximize(x)).unwrap();
        env.assert_objective(inner).unwrap();
        env.solve().unwrap();
        assert_eq!(env.objective_status(outer).unwrap(), SearchStatus::SatOptimal);
        env.pop().unwrap();

        assert!(env.objectives().is_empty());
        assert_eq!(env.objective_status(outer).unwrap(), SearchStatus::Unknown);
        assert_eq!(
            env.objective_status(inner),
            Err(ErrorKind::InvalidState(StateError::StaleObjective))
        );
        assert_eq!(env.pop(), Err(ErrorKind::InvalidState(StateError::NoCheckpoint)));
    }
}
