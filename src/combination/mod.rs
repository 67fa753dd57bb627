/*!
Combinations of objectives.

A solve optimizes each asserted objective under one of three [priorities](crate::config::Priority):

- [Boxed](boxed): each objective is optimized independently, against the hard constraints alone.
- [Lexicographic](lexicographic): objectives are optimized in the order asserted, and the optimum of each objective bounds the later objectives.
- [Pareto](pareto): each solve gives a single Pareto-optimal point, until no further point exists.

Each combination is given objectives [prepared](crate::objective::Prepared) by the environment, and returns a [SearchState] for each, in the same order.
*/

pub mod boxed;
pub mod lexicographic;
pub mod pareto;

pub use pareto::{ParetoPoint, ParetoRun};

use crate::objective::{Prepared, SearchState, SearchStatus};

/// A state for an objective which was not searched, with the given status.
pub(crate) fn unsearched(task: &Prepared, status: SearchStatus) -> SearchState {
    let mut state = SearchState::new(
        task.target.sense,
        task.window.lower.clone(),
        task.window.upper.clone(),
    );
    state.status = status;
    state
}
