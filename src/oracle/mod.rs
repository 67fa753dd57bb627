/*!
Decision oracles.

An [Oracle] decides the satisfiability of a stack of hard assertions, and on a satisfiable check provides a [Model].
The optimization layer depends only on the [Oracle] trait, and each [environment](crate::environment) is generic over its oracle.

# Checkpoints

Assertions are made within *checkpoints*, opened with [push](Oracle::push) and closed with [pop](Oracle::pop).
Closing a checkpoint retracts each assertion made within the checkpoint.

Every operation which opens a checkpoint closes the checkpoint on each path out of the operation, and [checkpointed] is a convenience for this pattern.

# Local optimization

After a satisfiable check an oracle may be asked to improve the value of some term without changing the truth value of any atom, via [optimize_local](Oracle::optimize_local).
The result is a value at least as good as the value of the term in the current model, and the model is updated to witness the value where possible.
The default implementation returns the value of the term in the current model.
*/

mod smt;
pub use smt::{OracleCounters, SmtOracle};

use crate::{
    model::Model,
    numeric::delta::DeltaRational,
    terms::{Term, TermStore},
    types::err::ErrorKind,
};

/// The result of a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

impl std::fmt::Display for SatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Unsat => write!(f, "unsat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A term to optimize, locally.
#[derive(Clone, Copy, Debug)]
pub struct LocalGoal {
    pub term: Term,
    pub minimize: bool,
    /// Read bit-vector terms as signed.
    pub signed: bool,
}

/// The result of a local optimization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalOptimum {
    /// The term may be improved without limit.
    Unbounded,

    /// The value of the term.
    Bounded(DeltaRational),
}

/// The interface to a decision oracle.
pub trait Oracle {
    /// The store of terms the oracle accepts.
    fn terms(&self) -> &TermStore;

    /// Opens a checkpoint.
    fn push(&mut self) -> Result<(), ErrorKind>;

    /// Closes the most recent checkpoint, retracting each assertion made since.
    fn pop(&mut self) -> Result<(), ErrorKind>;

    /// A count of open checkpoints.
    fn depth(&self) -> usize;

    /// Asserts a boolean term within the current checkpoint.
    fn assert_hard(&mut self, term: Term) -> Result<(), ErrorKind>;

    /// Determines the satisfiability of the assertions, given `assumptions`.
    ///
    /// `terminate` is polled during the check, and the check returns [SatResult::Unknown] if it returns true.
    fn check_sat(
        &mut self,
        assumptions: &[Term],
        terminate: &mut dyn FnMut() -> bool,
    ) -> Result<SatResult, ErrorKind>;

    /// The model of the most recent check, if satisfiable.
    fn get_model(&self) -> Result<Model, ErrorKind>;

    /// Assumptions responsible for the most recent check, if unsatisfiable.
    fn unsat_core(&self) -> Result<Vec<Term>, ErrorKind>;

    /// Improves the value of a term within the current model, see [the module documentation](crate::oracle#local-optimization).
    fn optimize_local(&mut self, goal: &LocalGoal) -> Result<LocalOptimum, ErrorKind> {
        let model = self.get_model()?;
        let value = model.eval_rational(self.terms(), goal.term, goal.signed)?;
        Ok(LocalOptimum::Bounded(value.into()))
    }
}

/// Runs `f` within a fresh checkpoint, which is closed regardless of the result of `f`.
///
/// An error from `f` takes precedence over an error from closing the checkpoint.
pub fn checkpointed<O: Oracle + ?Sized, T>(
    oracle: &mut O,
    f: impl FnOnce(&mut O) -> Result<T, ErrorKind>,
) -> Result<T, ErrorKind> {
    oracle.push()?;
    let result = f(oracle);
    let closed = oracle.pop();
    match (result, closed) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Ok(value), Ok(())) => Ok(value),
    }
}
