use std::{
    cmp::Ordering,
    ops::{Add, Neg, Sub},
};

use num::{Signed, Zero};

use super::{format_rational, Rational};

/// A rational `real + delta·δ`, with δ a positive infinitesimal.
///
/// Ordering is lexicographic, as δ is smaller than any positive rational.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DeltaRational {
    pub real: Rational,
    pub delta: Rational,
}

impl DeltaRational {
    pub fn new(real: Rational, delta: Rational) -> Self {
        DeltaRational { real, delta }
    }

    /// True if there is no infinitesimal part.
    pub fn is_exact(&self) -> bool {
        self.delta.is_zero()
    }

    /// Scales both parts by `factor`.
    pub fn scale(&self, factor: &Rational) -> Self {
        DeltaRational {
            real: &self.real * factor,
            delta: &self.delta * factor,
        }
    }

    /// The rational obtained by fixing δ to `delta`.
    pub fn concretize(&self, delta: &Rational) -> Rational {
        &self.real + &self.delta * delta
    }
}

impl From<Rational> for DeltaRational {
    fn from(real: Rational) -> Self {
        DeltaRational {
            real,
            delta: Rational::zero(),
        }
    }
}

impl Ord for DeltaRational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.real
            .cmp(&other.real)
            .then_with(|| self.delta.cmp(&other.delta))
    }
}

impl PartialOrd for DeltaRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &DeltaRational {
    type Output = DeltaRational;

    fn add(self, other: &DeltaRational) -> DeltaRational {
        DeltaRational {
            real: &self.real + &other.real,
            delta: &self.delta + &other.delta,
        }
    }
}

impl Sub for &DeltaRational {
    type Output = DeltaRational;

    fn sub(self, other: &DeltaRational) -> DeltaRational {
        DeltaRational {
            real: &self.real - &other.real,
            delta: &self.delta - &other.delta,
        }
    }
}

impl Neg for &DeltaRational {
    type Output = DeltaRational;

    fn neg(self) -> DeltaRational {
        DeltaRational {
            real: -&self.real,
            delta: -&self.delta,
        }
    }
}

/// Written with ε for δ, e.g. `(- 3 epsilon)` or `(+ 1/2 (* 2 epsilon))`.
impl std::fmt::Display for DeltaRational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let real = format_rational(&self.real);
        if self.delta.is_zero() {
            return write!(f, "{real}");
        }
        let sign = if self.delta.is_negative() { "-" } else { "+" };
        let magnitude = self.delta.abs();
        match magnitude == Rational::from_integer(1.into()) {
            true => write!(f, "({sign} {real} epsilon)"),
            false => write!(f, "({sign} {real} (* {} epsilon))", format_rational(&magnitude)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{ratio, rational};

    #[test]
    fn order() {
        let three = DeltaRational::from(rational(3));
        let below = DeltaRational::new(rational(3), rational(-1));
        let above = DeltaRational::new(rational(3), rational(1));
        assert!(below < three);
        assert!(three < above);
        assert!(DeltaRational::new(rational(2), rational(100)) < below);
    }

    #[test]
    fn display() {
        assert_eq!(DeltaRational::new(rational(3), rational(-1)).to_string(), "(- 3 epsilon)");
        assert_eq!(
            DeltaRational::new(ratio(1, 2), rational(2)).to_string(),
            "(+ 1/2 (* 2 epsilon))"
        );
        assert_eq!(DeltaRational::from(rational(-4)).to_string(), "-4");
    }

    #[test]
    fn concretize() {
        let value = DeltaRational::new(rational(3), rational(-1));
        assert_eq!(value.concretize(&ratio(1, 1_000_000)), ratio(2_999_999, 1_000_000));
    }
}
