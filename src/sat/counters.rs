/// Counts for various things which count, roughly.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// A count of every conflict seen.
    pub total_conflicts: usize,

    /// A count of free decisions made, not counting decisions on assumptions.
    pub total_decisions: usize,

    /// A count of literals propagated.
    pub propagations: usize,

    /// The total number of iterations through each solve.
    pub total_iterations: usize,

    /// The number of restarts.
    pub restarts: usize,

    /// The number of solves.
    pub solves: usize,

    /// A count of clauses removed from the clause database.
    pub collected_clauses: usize,
}
