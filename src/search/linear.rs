//! Linear steps, asking for any model strictly better than the best model found.

use super::{
    driver::{self, Probe},
    Session,
};
use crate::{
    misc::log::targets,
    objective::{Prepared, SearchState, StepKind, StepOutcome},
    oracle::Oracle,
    types::err::ErrorKind,
};

/// Makes a linear step, updating `state` with the outcome.
pub(super) fn step<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
    state: &mut SearchState,
) -> Result<StepOutcome, ErrorKind> {
    state.steps += 1;
    state.linear_steps += 1;
    state.consecutive_refutations = 0;
    log::log!(target: targets::SEARCH, session.trace_level(), "{} - linear step: {}", task.label, state.linear_steps);

    let bound = driver::below(session, &task.target, &state.upper)?;

    let outcome = match driver::probe(session, &task.target, bound)? {
        Probe::Improved(cost, model) => {
            state.improve(cost, model);
            driver::log_upper(session, task, state);
            StepOutcome::Improved
        }

        Probe::Refuted => {
            state.lower = state.upper.clone();
            driver::log_lower(session, task, state);
            StepOutcome::Refuted
        }

        Probe::Interrupted => StepOutcome::Interrupted,
    };

    state.record(StepKind::Linear, None, outcome);
    Ok(outcome)
}
