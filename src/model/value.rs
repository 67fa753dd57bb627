use std::cmp::Ordering;

use num::{BigInt, BigUint, One, Zero};

use crate::numeric::{self, Rational};

/// The value of a term in a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Real(Rational),
    /// A bit-vector, as the unsigned value of its bits.
    BitVector { value: BigUint, width: u32 },
    /// A floating point value, as the bits of its IEEE representation.
    Float {
        bits: BigUint,
        exponent: u32,
        significand: u32,
    },
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as a rational, for integers, reals, and bit-vectors.
    ///
    /// Bit-vectors are read as two's complement when `signed`.
    pub fn as_rational(&self, signed: bool) -> Option<Rational> {
        match self {
            Value::Int(value) => Some(Rational::from_integer(value.clone())),
            Value::Real(value) => Some(value.clone()),
            Value::BitVector { value, width } => {
                Some(Rational::from_integer(bv_integer(value, *width, signed)))
            }
            _ => None,
        }
    }

    /// The default value of a sort, used for symbols without an assignment.
    pub fn default_of(sort: crate::terms::Sort) -> Value {
        use crate::terms::Sort;
        match sort {
            Sort::Bool => Value::Bool(false),
            Sort::Int => Value::Int(BigInt::zero()),
            Sort::Real => Value::Real(Rational::zero()),
            Sort::BitVector(width) => Value::BitVector {
                value: BigUint::zero(),
                width,
            },
            Sort::Float {
                exponent,
                significand,
            } => Value::Float {
                bits: BigUint::zero(),
                exponent,
                significand,
            },
        }
    }
}

/// The integer value of the bits of a bit-vector.
pub fn bv_integer(value: &BigUint, width: u32, signed: bool) -> BigInt {
    let unsigned = BigInt::from(value.clone());
    match signed && width > 0 && unsigned >= numeric::power_of_two(width - 1) {
        true => unsigned - numeric::power_of_two(width),
        false => unsigned,
    }
}

/// A decoded IEEE floating point value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FloatValue {
    NaN,
    Infinite { negative: bool },
    Finite(Rational),
}

impl FloatValue {
    pub(crate) fn decode(bits: &BigUint, exponent: u32, significand: u32) -> FloatValue {
        // The significand width includes the hidden bit.
        let fraction_width = significand.saturating_sub(1) as usize;
        let fraction_mask = (BigUint::one() << fraction_width) - BigUint::one();
        let exponent_mask = (BigUint::one() << exponent as usize) - BigUint::one();

        let fraction = bits & &fraction_mask;
        let biased = (bits >> fraction_width) & &exponent_mask;
        let negative = !((bits >> (fraction_width + exponent as usize)) & BigUint::one()).is_zero();

        let bias = (BigInt::one() << (exponent.saturating_sub(1) as usize)) - BigInt::one();
        let fraction = BigInt::from(fraction);
        let scale = BigInt::one() << fraction_width;

        let magnitude = if biased == exponent_mask {
            return match fraction.is_zero() {
                true => FloatValue::Infinite { negative },
                false => FloatValue::NaN,
            };
        } else if biased.is_zero() {
            // Subnormal.
            let value = Rational::new(fraction, scale);
            value * power(&(BigInt::one() - &bias))
        } else {
            let value = Rational::new(scale.clone() + fraction, scale);
            value * power(&(BigInt::from(biased) - &bias))
        };

        FloatValue::Finite(if negative { -magnitude } else { magnitude })
    }

    /// The IEEE ordering, with no ordering for NaN.
    pub(crate) fn compare(&self, other: &FloatValue) -> Option<Ordering> {
        use FloatValue::*;
        match (self, other) {
            (NaN, _) | (_, NaN) => None,
            (Infinite { negative: a }, Infinite { negative: b }) => Some(b.cmp(a)),
            (Infinite { negative }, Finite(_)) => match negative {
                true => Some(Ordering::Less),
                false => Some(Ordering::Greater),
            },
            (Finite(_), Infinite { negative }) => match negative {
                true => Some(Ordering::Greater),
                false => Some(Ordering::Less),
            },
            (Finite(a), Finite(b)) => Some(a.cmp(b)),
        }
    }
}

/// `2^exponent` as a rational, for any integer exponent.
fn power(exponent: &BigInt) -> Rational {
    let magnitude = exponent.magnitude().clone();
    let exponent_u = usize::try_from(magnitude).unwrap_or(usize::MAX);
    let value = Rational::from_integer(BigInt::one() << exponent_u);
    match exponent.sign() {
        num::bigint::Sign::Minus => Rational::one() / value,
        _ => value,
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{}", numeric::format_rational(value)),
            Self::BitVector { value, width } => write!(f, "{value}_{width}"),
            Self::Float {
                bits,
                exponent,
                significand,
            } => match FloatValue::decode(bits, *exponent, *significand) {
                FloatValue::NaN => write!(f, "NaN"),
                FloatValue::Infinite { negative: true } => write!(f, "-oo"),
                FloatValue::Infinite { negative: false } => write!(f, "+oo"),
                FloatValue::Finite(value) => write!(f, "{}", numeric::format_rational(&value)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{ratio, rational};

    #[test]
    fn signed_reading() {
        let value = Value::BitVector {
            value: BigUint::from(240_u32),
            width: 8,
        };
        assert_eq!(value.as_rational(false), Some(rational(240)));
        assert_eq!(value.as_rational(true), Some(rational(-16)));
        assert_eq!(value.to_string(), "240_8");
    }

    #[test]
    fn floats() {
        // 1.5 and -0.25 as single precision.
        let one_and_half = FloatValue::decode(&BigUint::from(0x3FC0_0000_u32), 8, 24);
        let minus_quarter = FloatValue::decode(&BigUint::from(0xBE80_0000_u32), 8, 24);
        let nan = FloatValue::decode(&BigUint::from(0x7FC0_0000_u32), 8, 24);

        assert_eq!(one_and_half, FloatValue::Finite(ratio(3, 2)));
        assert_eq!(minus_quarter, FloatValue::Finite(ratio(-1, 4)));
        assert_eq!(nan, FloatValue::NaN);
        assert_eq!(one_and_half.compare(&minus_quarter), Some(Ordering::Greater));
        assert_eq!(nan.compare(&one_and_half), None);
    }
}
