use super::{adaptive, adaptive::Plan, binary, linear, Session};
use crate::{
    misc::log::targets,
    model::Model,
    numeric::{self, Rational},
    objective::{
        Domain, ObjectiveValue, Prepared, SearchState, SearchStatus, StepOutcome, Target,
    },
    oracle::{self, Oracle, SatResult},
    terms::Term,
    types::err::ErrorKind,
};

/// The result of a check below some bound.
pub(super) enum Probe {
    Improved(ObjectiveValue, Model),
    Refuted,
    Interrupted,
}

/// Checks for a model with `bound` asserted, within a checkpoint.
///
/// On a model the cost of the target is improved by local optimization.
pub(super) fn probe<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    target: &Target,
    bound: Option<Term>,
) -> Result<Probe, ErrorKind> {
    let Session {
        oracle, terminate, ..
    } = session;

    oracle::checkpointed(&mut **oracle, |oracle| {
        if let Some(bound) = bound {
            oracle.assert_hard(bound)?;
        }
        match oracle.check_sat(&[], &mut **terminate)? {
            SatResult::Sat => {
                let optimum = oracle.optimize_local(&target.goal())?;
                let model = oracle.get_model()?;
                Ok(Probe::Improved(target.local_cost(optimum), model))
            }
            SatResult::Unsat => Ok(Probe::Refuted),
            SatResult::Unknown => Ok(Probe::Interrupted),
        }
    })
}

/// The formula `cost < bound`, or none if the bound is +∞.
pub(super) fn below<O: Oracle + ?Sized>(
    session: &Session<'_, O>,
    target: &Target,
    bound: &ObjectiveValue,
) -> Result<Option<Term>, ErrorKind> {
    let store = session.oracle.terms();
    match bound {
        ObjectiveValue::PlusInfinity => Ok(None),
        ObjectiveValue::MinusInfinity => Ok(Some(store.ff()?)),
        ObjectiveValue::Finite(bound) => Ok(Some(target.below(store, bound)?)),
    }
}

/// True if no cost of `domain` lies within `[lower, upper)`.
pub(super) fn closed(lower: &ObjectiveValue, upper: &ObjectiveValue, domain: Domain) -> bool {
    if lower >= upper {
        return true;
    }
    match (lower, upper) {
        (ObjectiveValue::Finite(lower), ObjectiveValue::Finite(upper)) if domain.is_integral() => {
            Rational::from_integer(numeric::ceil(&lower.real)) >= upper.real
        }
        _ => false,
    }
}

/// The status of a search stopped by a step budget or tolerance, if stopped.
fn aborted<O: Oracle + ?Sized>(session: &Session<'_, O>, state: &SearchState) -> Option<SearchStatus> {
    let interval = session.config.abort_interval.value;
    if interval > 0 && state.steps >= interval {
        return Some(match state.witnessed() {
            true => SearchStatus::SatApprox,
            false => SearchStatus::Unknown,
        });
    }

    let tolerance = session.config.abort_tolerance.value;
    if tolerance > 0.0 && state.witnessed() {
        if let (Some(lower), Some(upper)) = (state.lower.real(), state.upper.real()) {
            let width = upper - lower;
            let scale = match &state.initial_width {
                Some(initial) => initial.clone(),
                None => numeric::abs(upper),
            };
            let tolerance = Rational::from_float(tolerance)?;
            if width <= tolerance * scale {
                return Some(SearchStatus::SatApprox);
            }
        }
    }

    None
}

/// The status of a search interrupted by the termination predicate.
pub(super) fn interrupted<O: Oracle + ?Sized>(
    session: &Session<'_, O>,
    state: &SearchState,
) -> SearchStatus {
    match (state.witnessed(), session.config.soft_timeout.value) {
        (true, true) => SearchStatus::SatApprox,
        (true, false) => SearchStatus::SatPartial,
        (false, _) => SearchStatus::Unknown,
    }
}

/// True if the error is a failure of the oracle, after which a search stops with the bounds found.
pub(crate) fn is_oracle_failure(error: &ErrorKind) -> bool {
    matches!(error, ErrorKind::Oracle(_) | ErrorKind::SAT(_))
}

/// Searches for the optimum of `task`, with linear and binary steps.
pub(super) fn search<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
) -> Result<SearchState, ErrorKind> {
    let level = session.trace_level();
    let target = &task.target;
    let mut state = SearchState::new(
        target.sense,
        task.window.lower.clone(),
        task.window.upper.clone(),
    );

    log::log!(target: targets::SEARCH, level, "{} - search start: {}", task.label, state.interval_string());

    if task.window.is_empty(target.domain) {
        state.status = SearchStatus::Unsat;
        log::log!(target: targets::SEARCH, level, "{} - empty window", task.label);
        log::log!(target: targets::SEARCH, level, "{} - search end: {}", task.label, state.status);
        return Ok(state);
    }

    let start_depth = session.oracle.depth();
    let outcome = {
        let floor = match &state.lower {
            ObjectiveValue::Finite(lower) => Some(target.at_least(session.oracle.terms(), &lower.real)?),
            _ => None,
        };

        session.checkpointed(|session| {
            if let Some(floor) = floor {
                session.oracle.assert_hard(floor)?;
            }
            search_loop(session, task, &mut state)
        })
    };

    match outcome {
        Ok(()) => {}
        Err(error) if is_oracle_failure(&error) => {
            log::warn!(target: targets::SEARCH, "{} - oracle failure: {error}", task.label);
            state.status = SearchStatus::Unknown;
        }
        Err(error) => return Err(error),
    }
    debug_assert_eq!(start_depth, session.oracle.depth());

    log::log!(target: targets::SEARCH, level, "{} - search end: {}", task.label, state.status);
    Ok(state)
}

fn search_loop<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
    state: &mut SearchState,
) -> Result<(), ErrorKind> {
    let level = session.trace_level();
    let domain = task.target.domain;

    loop {
        if closed(&state.lower, &state.upper, domain) {
            state.status = match state.witnessed() {
                true => SearchStatus::SatOptimal,
                false => SearchStatus::Unsat,
            };
            return Ok(());
        }

        if let Some(status) = aborted(session, state) {
            log::log!(target: targets::SEARCH, level, "{} - abort: {}", task.label, state.interval_string());
            state.status = status;
            return Ok(());
        }

        let outcome = match adaptive::plan(session, state, domain) {
            Plan::Linear => linear::step(session, task, state)?,
            Plan::Binary(pivot) => binary::step(session, task, state, pivot)?,
        };

        if outcome == StepOutcome::Interrupted {
            log::log!(target: targets::SEARCH, level, "{} - interrupted", task.label);
            state.status = interrupted(session, state);
            return Ok(());
        }
    }
}

/// Notes an improvement to the upper bound.
pub(super) fn log_upper<O: Oracle + ?Sized>(session: &Session<'_, O>, task: &Prepared, state: &SearchState) {
    log::log!(
        target: targets::SEARCH,
        session.trace_level(),
        "{} - update upper: {}",
        task.label,
        state.interval_string()
    );
}

/// Notes an improvement to the lower bound.
pub(super) fn log_lower<O: Oracle + ?Sized>(session: &Session<'_, O>, task: &Prepared, state: &SearchState) {
    log::log!(
        target: targets::SEARCH,
        session.trace_level(),
        "{} - update lower: {}",
        task.label,
        state.interval_string()
    );
}
