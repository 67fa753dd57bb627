//! Lexicographic optimization, in the order objectives were asserted.

use super::unsearched;
use crate::{
    misc::log::targets,
    numeric::format_rational,
    objective::{Prepared, SearchState, SearchStatus},
    oracle::Oracle,
    search::{self, Session},
    types::err::ErrorKind,
};

/// Optimizes each of `tasks` in turn, bounding each later objective by the optimum of each earlier objective.
///
/// After an optimal or approximate result, the cost of the objective is fixed to at most the cost of the model found.
/// An unbounded optimum fixes nothing.
/// After any other result, each remaining objective is [Unknown](SearchStatus::Unknown).
///
/// Bounds are asserted within a checkpoint, which is closed before returning.
pub fn solve<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    tasks: &[Prepared],
) -> Result<Vec<SearchState>, ErrorKind> {
    session.checkpointed(|session| {
        let store = session.oracle.terms().clone();
        let mut states = Vec::with_capacity(tasks.len());
        let mut stopped = false;

        for task in tasks {
            if stopped {
                states.push(unsearched(task, SearchStatus::Unknown));
                continue;
            }

            let state = search::optimize(session, task)?;
            match state.status {
                SearchStatus::SatOptimal | SearchStatus::SatApprox => {
                    if let (Some(model), true) = (&state.model, state.value().is_finite()) {
                        let cost = task.target.model_cost(&store, model)?;
                        log::debug!(target: targets::SEARCH, "{} - fixed at cost {}", task.label, format_rational(&cost));
                        let fixed = task.target.at_most(&store, &cost)?;
                        session.oracle.assert_hard(fixed)?;
                    }
                }

                _ => stopped = true,
            }
            states.push(state);
        }

        Ok(states)
    })
}
