//! Error types used in the library.
//!
//! - Errors from the optimization layer follow a handful of kinds: an invalid handle, a type mismatch, an operation in the wrong state, or an unsupported combination of options.
//! - Errors from the bundled oracle are wrapped as [OracleError]s, and are reported by a solve as an unknown result rather than returned, as the best bounds found so far remain readable.
//! - Some errors are internally expected, e.g. an attempt to read a model after an unsatisfiable check.
//!
//! Names of the error enums for the most part overlap with the area of the library they originate from.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::terms::Sort;

/// The kinds of error returned by the library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A handle (term, objective, environment) which is unknown, destroyed, or belongs elsewhere.
    InvalidHandle(HandleError),

    /// Terms or bounds of incompatible sorts.
    TypeMismatch(TypeError),

    /// An operation which is not permitted in the current state.
    InvalidState(StateError),

    /// A configuration which is malformed, or a request the configuration does not support.
    UnsupportedCombination(ConfigError),

    /// A malformed term.
    Term(TermError),

    /// A failure of the decision oracle.
    Oracle(OracleError),

    /// A failure of the SAT core.
    SAT(SatError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHandle(e) => write!(f, "invalid handle: {e:?}"),
            Self::TypeMismatch(e @ TypeError::UnsupportedObjective(_)) => write!(f, "{e}"),
            Self::TypeMismatch(e) => write!(f, "type mismatch: {e}"),
            Self::InvalidState(e) => write!(f, "invalid state: {e:?}"),
            Self::UnsupportedCombination(e) => write!(f, "unsupported combination: {e}"),
            Self::Term(e) => write!(f, "malformed term: {e:?}"),
            Self::Oracle(e) => write!(f, "oracle failure: {e}"),
            Self::SAT(e) => write!(f, "sat failure: {e:?}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Noted errors regarding handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleError {
    /// A term was created by some other term store.
    ForeignTerm,

    /// A term index beyond the store.
    UnknownTerm,

    /// An objective of some other environment.
    ForeignObjective,

    /// An objective which has been destroyed.
    DestroyedObjective,
}

impl From<HandleError> for ErrorKind {
    fn from(e: HandleError) -> Self {
        ErrorKind::InvalidHandle(e)
    }
}

/// Noted errors regarding the sorts of terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// A term of some sort was expected, but a term of another sort was found.
    Expected { expected: Sort, found: Sort },

    /// Two terms which should share a sort do not.
    Incompatible(Sort, Sort),

    /// A term of a numeric sort (int, real) was expected.
    ExpectedNumeric(Sort),

    /// The objective sort does not support optimization, e.g. booleans or floating-point.
    UnsupportedObjective(Sort),

    /// A symbol was declared again with a different sort.
    Redeclaration { name: String, declared: Sort, requested: Sort },

    /// A bit-vector width of zero.
    ZeroWidth,
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expected { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::Incompatible(a, b) => write!(f, "{a} and {b} are incompatible"),
            Self::ExpectedNumeric(s) => write!(f, "expected a numeric sort, found {s}"),
            Self::UnsupportedObjective(Sort::Float { .. }) => {
                write!(f, "floating-point objectives are unsupported")
            }
            Self::UnsupportedObjective(s) => write!(f, "objectives over {s} are unsupported"),
            Self::Redeclaration {
                name,
                declared,
                requested,
            } => write!(f, "{name} is declared as {declared}, not {requested}"),
            Self::ZeroWidth => write!(f, "bit-vectors have positive width"),
        }
    }
}

impl From<TypeError> for ErrorKind {
    fn from(e: TypeError) -> Self {
        ErrorKind::TypeMismatch(e)
    }
}

/// Noted errors regarding the state of an environment or oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateError {
    /// A pop without a matching push.
    NoCheckpoint,

    /// A model was requested without a preceding satisfiable check.
    NoModel,

    /// An unsat core was requested without a preceding unsatisfiable check.
    NoCore,

    /// Models are not retained without model generation.
    ModelGenerationDisabled,

    /// An objective whose checkpoint has been popped.
    StaleObjective,

    /// The objective has no value, e.g. as no solve has taken place since it was asserted.
    NoValue,

    /// The checkpoint depth of the oracle differs from the environment.
    UnbalancedCheckpoints,
}

impl From<StateError> for ErrorKind {
    fn from(e: StateError) -> Self {
        ErrorKind::InvalidState(e)
    }
}

/// Noted errors regarding configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An unknown option key.
    UnknownOption(String),

    /// A value which does not parse for the option.
    InvalidValue { option: &'static str, value: String },

    /// A value outside the permitted range of the option.
    OutOfRange { option: &'static str },

    /// A Pareto mode other than incremental.
    UnsupportedParetoMode,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOption(key) => write!(f, "unknown option {key}"),
            Self::InvalidValue { option, value } => write!(f, "{value} is not a value of {option}"),
            Self::OutOfRange { option } => write!(f, "value of {option} is out of range"),
            Self::UnsupportedParetoMode => write!(f, "only incremental pareto enumeration"),
        }
    }
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::UnsupportedCombination(e)
    }
}

/// Noted errors when building terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TermError {
    /// An operator applied to the wrong number of arguments.
    Arity,

    /// A term expected to be ground contains a symbol.
    NotGround,

    /// Division by zero.
    DivisionByZero,

    /// An objective without terms.
    EmptyObjective,

    /// A bit-vector constant which does not fit its width.
    Overflow,
}

impl From<TermError> for ErrorKind {
    fn from(e: TermError) -> Self {
        ErrorKind::Term(e)
    }
}

/// Noted failures of the decision oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleError {
    /// A theory without a decision procedure.
    UnsupportedTheory(&'static str),

    /// A product of two non-constant terms.
    NonLinear,

    /// A bit-vector operation outside the supported fragment.
    UnsupportedOperator(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedTheory(theory) => write!(f, "no decision procedure for {theory}"),
            Self::NonLinear => write!(f, "non-linear arithmetic"),
            Self::UnsupportedOperator(op) => write!(f, "unsupported operator {op}"),
        }
    }
}

impl From<OracleError> for ErrorKind {
    fn from(e: OracleError) -> Self {
        ErrorKind::Oracle(e)
    }
}

/// Noted errors in the SAT core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SatError {
    /// Resolution failed to terminate with an asserting clause.
    NoAssertion,

    /// A clause key without a clause.
    MissingClause,
}

impl From<SatError> for ErrorKind {
    fn from(e: SatError) -> Self {
        ErrorKind::SAT(e)
    }
}
