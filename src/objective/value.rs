//! Values of objectives, which may be exact, infinitesimally offset, or infinite.

use std::cmp::Ordering;

use num::{BigInt, Zero};

use crate::numeric::{delta::DeltaRational, format_rational, Rational};

/// The value of an objective, or a bound on the value of an objective.
///
/// Finite values are [delta-rationals](DeltaRational), so the optimum of maximizing `x` subject to `x < 3` is written `(- 3 epsilon)`.
///
/// ```rust
/// # use otter_omt::objective::ObjectiveValue;
/// # use otter_omt::numeric::{DeltaRational, rational, ratio};
/// let value = ObjectiveValue::Finite(DeltaRational::new(rational(3), rational(-1)));
/// assert_eq!(value.to_string(), "(- 3 epsilon)");
/// assert_eq!(value.exact(), None);
/// assert_eq!(value.approximate(&rational(1_000), &ratio(1, 100)), ratio(299, 100));
///
/// assert_eq!(ObjectiveValue::MinusInfinity.to_string(), "-oo");
/// assert!(ObjectiveValue::MinusInfinity < value);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveValue {
    MinusInfinity,
    Finite(DeltaRational),
    PlusInfinity,
}

impl ObjectiveValue {
    /// The value `value`, exactly.
    pub fn exactly(value: Rational) -> Self {
        ObjectiveValue::Finite(value.into())
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, ObjectiveValue::Finite(_))
    }

    /// The value, if finite.
    pub fn finite(&self) -> Option<&DeltaRational> {
        match self {
            ObjectiveValue::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// The value, if finite and without an infinitesimal part.
    pub fn exact(&self) -> Option<Rational> {
        match self {
            ObjectiveValue::Finite(value) if value.is_exact() => Some(value.real.clone()),
            _ => None,
        }
    }

    /// A rational approximation, with `infinity` for +∞ and `epsilon` for ε.
    pub fn approximate(&self, infinity: &Rational, epsilon: &Rational) -> Rational {
        match self {
            ObjectiveValue::MinusInfinity => -infinity.clone(),
            ObjectiveValue::Finite(value) => value.concretize(epsilon),
            ObjectiveValue::PlusInfinity => infinity.clone(),
        }
    }

    /// A rational approximation, with `10^9` for +∞ and `10^-6` for ε.
    pub fn approximate_default(&self) -> Rational {
        let infinity = Rational::from_integer(BigInt::from(1_000_000_000));
        let epsilon = Rational::new(BigInt::from(1), BigInt::from(1_000_000));
        self.approximate(&infinity, &epsilon)
    }

    /// The value with sign reversed.
    pub fn negated(&self) -> Self {
        match self {
            ObjectiveValue::MinusInfinity => ObjectiveValue::PlusInfinity,
            ObjectiveValue::Finite(value) => ObjectiveValue::Finite(-value),
            ObjectiveValue::PlusInfinity => ObjectiveValue::MinusInfinity,
        }
    }

    /// The real part of a finite value.
    pub(crate) fn real(&self) -> Option<&Rational> {
        self.finite().map(|value| &value.real)
    }
}

impl From<DeltaRational> for ObjectiveValue {
    fn from(value: DeltaRational) -> Self {
        ObjectiveValue::Finite(value)
    }
}

impl Ord for ObjectiveValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use ObjectiveValue::*;
        match (self, other) {
            (MinusInfinity, MinusInfinity) | (PlusInfinity, PlusInfinity) => Ordering::Equal,
            (MinusInfinity, _) | (_, PlusInfinity) => Ordering::Less,
            (_, MinusInfinity) | (PlusInfinity, _) => Ordering::Greater,
            (Finite(a), Finite(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ObjectiveValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ObjectiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinusInfinity => write!(f, "-oo"),
            Self::PlusInfinity => write!(f, "+oo"),
            Self::Finite(value) if value.delta.is_zero() => write!(f, "{}", format_rational(&value.real)),
            Self::Finite(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{ratio, rational};

    #[test]
    fn order() {
        let finite = ObjectiveValue::exactly(rational(-1_000));
        assert!(ObjectiveValue::MinusInfinity < finite);
        assert!(finite < ObjectiveValue::PlusInfinity);
        assert_eq!(ObjectiveValue::PlusInfinity.negated(), ObjectiveValue::MinusInfinity);
    }

    #[test]
    fn approximations() {
        let below_three = ObjectiveValue::Finite(DeltaRational::new(rational(3), rational(-1)));
        assert_eq!(below_three.approximate_default(), ratio(2_999_999, 1_000_000));
        assert_eq!(
            ObjectiveValue::MinusInfinity.approximate_default(),
            rational(-1_000_000_000)
        );
        assert_eq!(ObjectiveValue::exactly(ratio(1, 2)).exact(), Some(ratio(1, 2)));
        assert_eq!(ObjectiveValue::exactly(ratio(1, 2)).to_string(), "1/2");
    }
}
