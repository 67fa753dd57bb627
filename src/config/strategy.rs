use std::str::FromStr;

/// The search strategy used to tighten the bounds of an objective.
///
/// See [search](crate::search) for details of each strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchStrategy {
    /// Each step asks for a model strictly better than the best model found.
    Linear = 0,

    /// Steps ask for a model below a pivot between the current bounds.
    Binary,

    /// Begin with a linear step and interleave binary steps, falling back to linear steps when binary steps fail to make progress.
    Adaptive,
}

impl SearchStrategy {
    /// The minimum SearchStrategy type.
    pub const MIN: SearchStrategy = SearchStrategy::Linear;

    /// The maximum SearchStrategy type.
    pub const MAX: SearchStrategy = SearchStrategy::Adaptive;
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "lin"),
            Self::Binary => write!(f, "bin"),
            Self::Adaptive => write!(f, "ada"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lin" => Ok(Self::Linear),
            "bin" => Ok(Self::Binary),
            "ada" => Ok(Self::Adaptive),
            _unknown_string => Err(()),
        }
    }
}
