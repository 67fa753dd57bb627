/*!
Exact numbers.

All arithmetic is exact, over arbitrary precision [rationals](Rational).

Strict inequalities over dense domains are represented with [delta-rationals](DeltaRational), pairs `c + kδ` with δ a positive infinitesimal.
For example, the least upper bound of `x < 3` is `3 - δ`, and the optimum of maximizing `x` subject to `x < 3` is the symbolic value `3 - ε`.
*/

pub mod delta;
pub use delta::DeltaRational;

use num::{BigInt, Integer, One, Signed, Zero};

/// The representation of rationals.
pub type Rational = num::BigRational;

/// The rational `n`.
pub fn rational(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// The rational `n / d`.
///
/// # Panics
/// If `d` is zero.
pub fn ratio(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

/// Parses integers (`-3`), fractions (`7/2`), and decimals (`0.125`, `-1.5`).
pub fn parse_rational(s: &str) -> Option<Rational> {
    let s = s.trim();
    if let Some((numerator, denominator)) = s.split_once('/') {
        let numerator = numerator.trim().parse::<BigInt>().ok()?;
        let denominator = denominator.trim().parse::<BigInt>().ok()?;
        return match denominator.is_zero() {
            true => None,
            false => Some(Rational::new(numerator, denominator)),
        };
    }

    match s.split_once('.') {
        None => s.parse::<BigInt>().ok().map(Rational::from_integer),
        Some((whole, fraction)) => {
            if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let negative = whole.starts_with('-');
            let whole = match whole.trim_start_matches(['-', '+']) {
                "" => BigInt::zero(),
                digits => digits.parse::<BigInt>().ok()?,
            };
            let scale = num::pow(BigInt::from(10), fraction.len());
            let fraction = fraction.parse::<BigInt>().ok()?;
            let magnitude = Rational::new(whole * &scale + fraction, scale);
            Some(if negative { -magnitude } else { magnitude })
        }
    }
}

/// Formats a rational as an integer, or as `n/d`.
pub fn format_rational(value: &Rational) -> String {
    match value.is_integer() {
        true => value.numer().to_string(),
        false => format!("{}/{}", value.numer(), value.denom()),
    }
}

/// The greatest integer less than or equal to `value`, as an integer.
pub fn floor(value: &Rational) -> BigInt {
    value.floor().to_integer()
}

/// The least integer greater than or equal to `value`, as an integer.
pub fn ceil(value: &Rational) -> BigInt {
    value.ceil().to_integer()
}

/// The greatest common divisor of the numerators of `values`, assumed to be integers.
pub fn gcd_of(values: impl IntoIterator<Item = BigInt>) -> BigInt {
    values
        .into_iter()
        .fold(BigInt::zero(), |acc, value| acc.gcd(&value))
}

/// The least common multiple of the denominators of `values`.
pub fn lcm_of_denominators<'a>(values: impl IntoIterator<Item = &'a Rational>) -> BigInt {
    values
        .into_iter()
        .fold(BigInt::one(), |acc, value| acc.lcm(value.denom()))
}

/// `2^exponent`, as an integer.
pub fn power_of_two(exponent: u32) -> BigInt {
    BigInt::one() << exponent as usize
}

/// The absolute value of `value`.
pub fn abs(value: &Rational) -> Rational {
    value.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses() {
        assert_eq!(parse_rational("3"), Some(rational(3)));
        assert_eq!(parse_rational("-7/2"), Some(ratio(-7, 2)));
        assert_eq!(parse_rational("0.125"), Some(ratio(1, 8)));
        assert_eq!(parse_rational("-1.5"), Some(ratio(-3, 2)));
        assert_eq!(parse_rational(".5"), Some(ratio(1, 2)));
        assert_eq!(parse_rational("1/0"), None);
        assert_eq!(parse_rational("1.x"), None);
        assert_eq!(parse_rational("half"), None);
    }

    #[test]
    fn rounding() {
        assert_eq!(floor(&ratio(-7, 2)), BigInt::from(-4));
        assert_eq!(ceil(&ratio(-7, 2)), BigInt::from(-3));
        assert_eq!(format_rational(&ratio(123, 2)), "123/2");
        assert_eq!(format_rational(&rational(-4)), "-4");
    }
}
