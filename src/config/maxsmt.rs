use std::str::FromStr;

/// The engine used to minimize the penalty of a group of soft constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MaxSMTEngine {
    /// The penalty is treated as any other numeric objective, and searched with the configured strategy.
    OMT = 0,

    /// Core-guided relaxation, in the style of MaxRes.
    MaxRes,
}

impl MaxSMTEngine {
    /// The minimum MaxSMTEngine type.
    pub const MIN: MaxSMTEngine = MaxSMTEngine::OMT;

    /// The maximum MaxSMTEngine type.
    pub const MAX: MaxSMTEngine = MaxSMTEngine::MaxRes;
}

impl std::fmt::Display for MaxSMTEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OMT => write!(f, "omt"),
            Self::MaxRes => write!(f, "maxres"),
        }
    }
}

impl FromStr for MaxSMTEngine {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "omt" => Ok(Self::OMT),
            "maxres" => Ok(Self::MaxRes),
            _unknown_string => Err(()),
        }
    }
}
