use std::time::Duration;

/// Counts for various things which count, roughly.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// A count of every solve.
    pub solves: usize,

    /// A count of objective searches, across every solve.
    pub searches: usize,

    /// A count of search steps, across every search.
    pub steps: usize,

    /// A count of Pareto-optimal points found.
    pub pareto_points: usize,

    /// The time taken during solves.
    pub time: Duration,
}
