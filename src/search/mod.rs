/*!
The search for the optimum of a single objective.

A search tightens an interval `[lower, upper)` of *costs* (see [objective](crate::objective#costs)) until the interval closes, a budget is exhausted, or the search is interrupted.
Each step is a check of the oracle within a fresh checkpoint:

- A [linear](StepKind::Linear) step asserts `cost < upper`.
  A model improves `upper` to the cost of the model, after [local optimization](crate::oracle#local-optimization), and otherwise `lower` is raised to `upper`.
- A [binary](StepKind::Binary) step asserts `cost < pivot`, for a pivot strictly between the bounds.
  A model improves `upper` as a linear step, and otherwise `lower` is raised to the pivot.

With a [linear](SearchStrategy::Linear) strategy every step is linear.

With a [binary](SearchStrategy::Binary) strategy the first step is linear if `opt.bin.first_step_linear` is set or `upper` is unbounded, and a linear step is made after `opt.bin.max_consecutive` consecutive binary steps without a model.
Otherwise, the pivot is placed at `opt.bin.pivot_position` between the bounds, and if `lower` is unbounded the pivot is placed below `upper` at a distance which doubles with each refutation.

An [adaptive](SearchStrategy::Adaptive) strategy is the binary strategy, with the first step always linear and linear steps whenever `lower` is unbounded.

In each case, a linear step is made when no pivot strictly between the bounds exists (for integral domains, a pivot which excludes some integer).

Note, with `opt.bin.max_consecutive` set to `0` binary steps continue without limit, and over the reals a search may then approach the optimum without closing the interval.
A step budget or tolerance bounds such a search.

# Termination

| Reason | Status |
|---|---|
| `lower ≥ upper` with a model | [SatOptimal](SearchStatus::SatOptimal) |
| `lower ≥ upper` without a model | [Unsat](SearchStatus::Unsat) |
| `opt.abort_interval` steps, or the relative width of the interval at most `opt.abort_tolerance` | [SatApprox](SearchStatus::SatApprox), or [Unknown](SearchStatus::Unknown) without a model |
| interrupted | [SatPartial](SearchStatus::SatPartial) ([SatApprox](SearchStatus::SatApprox) with `opt.soft_timeout`), or [Unknown](SearchStatus::Unknown) without a model |
| oracle failure | [Unknown](SearchStatus::Unknown) |

In each case the bounds found remain readable, and the oracle is returned to the depth at which the search began.
*/

mod adaptive;
mod binary;
mod driver;
mod linear;

pub(crate) use driver::is_oracle_failure;

use crate::{
    config::{Config, SearchStrategy},
    maxsmt,
    objective::{Prepared, SearchState},
    oracle::Oracle,
    types::err::ErrorKind,
};

#[cfg(doc)]
use crate::objective::{SearchStatus, StepKind};

/// The oracle, configuration, and termination predicate of a solve.
pub struct Session<'s, O: Oracle + ?Sized> {
    pub oracle: &'s mut O,
    pub config: &'s Config,
    pub terminate: &'s mut dyn FnMut() -> bool,
}

impl<O: Oracle + ?Sized> Session<'_, O> {
    /// The level at which search traces are logged.
    pub(crate) fn trace_level(&self) -> log::Level {
        match self.config.verbose.value {
            true => log::Level::Info,
            false => log::Level::Trace,
        }
    }

    pub(crate) fn strategy(&self) -> SearchStrategy {
        self.config.strategy.value
    }

    /// Runs `f` within a fresh checkpoint of the oracle, closed regardless of the result of `f`.
    pub fn checkpointed<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ErrorKind>,
    ) -> Result<T, ErrorKind> {
        self.oracle.push()?;
        let result = f(self);
        let closed = self.oracle.pop();
        match (result, closed) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e),
            (Ok(value), Ok(())) => Ok(value),
        }
    }
}

/// Searches for the optimum of `task`.
pub fn optimize<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
) -> Result<SearchState, ErrorKind> {
    match &task.relaxation {
        Some(softs) => maxsmt::maxres::minimize(session, task, softs),
        None => driver::search(session, task),
    }
}
