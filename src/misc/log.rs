/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

The trace of an objective search is logged to the [SEARCH](targets::SEARCH) target at trace level, or at info level when the verbose option is set.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [BCP](crate::sat::procedures::bcp)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [analysis](crate::sat::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to the [clause database](crate::sat::clause_db)
    pub const CLAUSE_DB: &str = "clause_db";

    /// Logs related to [backjumping](crate::sat::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to the [simplex](crate::theory::arith::simplex)
    pub const SIMPLEX: &str = "simplex";

    /// Logs related to the [oracle](crate::oracle)
    pub const ORACLE: &str = "oracle";

    /// Logs related to [objective search](crate::search)
    pub const SEARCH: &str = "search";

    /// Logs related to [MaxSMT](crate::maxsmt)
    pub const MAXSMT: &str = "maxsmt";

    /// Logs related to [Pareto enumeration](crate::combination::pareto)
    pub const PARETO: &str = "pareto";

    /// Logs related to an [environment](crate::environment)
    pub const ENVIRONMENT: &str = "environment";
}
