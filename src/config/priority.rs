use std::str::FromStr;

/// How multiple objectives are combined during a solve.
///
/// See [combination](crate::combination) for details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Each objective is optimized independently of the others.
    Box = 0,

    /// Objectives are optimized in order of assertion, each fixing its optimum before the next.
    Lexicographic,

    /// Pareto-optimal points are enumerated, one per solve.
    Pareto,
}

impl Priority {
    /// The minimum Priority type.
    pub const MIN: Priority = Priority::Box;

    /// The maximum Priority type.
    pub const MAX: Priority = Priority::Pareto;
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Box => write!(f, "box"),
            Self::Lexicographic => write!(f, "lex"),
            Self::Pareto => write!(f, "par"),
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "lex" => Ok(Self::Lexicographic),
            "par" => Ok(Self::Pareto),
            _unknown_string => Err(()),
        }
    }
}

/// How Pareto points are enumerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParetoMode {
    /// One point is returned by each solve, with the search state kept between solves.
    Incremental = 0,

    /// Every point is collected by a single solve.
    ///
    /// Accepted by the parser, and rejected when an environment is created.
    Callback,
}

impl ParetoMode {
    /// The minimum ParetoMode type.
    pub const MIN: ParetoMode = ParetoMode::Incremental;

    /// The maximum ParetoMode type.
    pub const MAX: ParetoMode = ParetoMode::Callback;
}

impl std::fmt::Display for ParetoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incremental => write!(f, "incremental"),
            Self::Callback => write!(f, "callback"),
        }
    }
}

impl FromStr for ParetoMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incremental" => Ok(Self::Incremental),
            "callback" => Ok(Self::Callback),
            _unknown_string => Err(()),
        }
    }
}
