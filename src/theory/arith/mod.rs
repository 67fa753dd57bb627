//! Linear arithmetic over the integers and reals.

pub mod linear;
pub mod simplex;

/// The direction of a bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundKind {
    /// A bound `x ≤ c`.
    Upper,

    /// A bound `x ≥ c`.
    Lower,
}

impl BoundKind {
    pub fn flip(self) -> Self {
        match self {
            BoundKind::Upper => BoundKind::Lower,
            BoundKind::Lower => BoundKind::Upper,
        }
    }
}
