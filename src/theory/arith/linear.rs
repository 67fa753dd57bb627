//! Linear expressions over simplex variables, and the normal form of linear comparisons.

use std::collections::BTreeMap;

use num::{One, Signed, Zero};

use super::simplex::VarId;
use crate::numeric::{gcd_of, lcm_of_denominators, Rational};

/// A linear expression `Σ aᵢxᵢ + k`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearExpr {
    pub coefficients: BTreeMap<VarId, Rational>,
    pub constant: Rational,
}

impl LinearExpr {
    pub fn constant(value: Rational) -> Self {
        LinearExpr {
            coefficients: BTreeMap::default(),
            constant: value,
        }
    }

    pub fn var(var: VarId) -> Self {
        let mut coefficients = BTreeMap::default();
        coefficients.insert(var, Rational::one());
        LinearExpr {
            coefficients,
            constant: Rational::zero(),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Adds `factor · other` to the expression.
    pub fn add_scaled(&mut self, other: &LinearExpr, factor: &Rational) {
        for (var, coefficient) in &other.coefficients {
            add_to(&mut self.coefficients, *var, coefficient * factor);
        }
        self.constant += &other.constant * factor;
    }

    pub fn scale(&mut self, factor: &Rational) {
        if factor.is_zero() {
            self.coefficients.clear();
            self.constant = Rational::zero();
            return;
        }
        for coefficient in self.coefficients.values_mut() {
            *coefficient *= factor;
        }
        self.constant *= factor;
    }
}

/// Adds `amount` to the coefficient of `var`, removing the coefficient if zero.
pub fn add_to(row: &mut BTreeMap<VarId, Rational>, var: VarId, amount: Rational) {
    let coefficient = row.entry(var).or_insert_with(Rational::zero);
    *coefficient += amount;
    if coefficient.is_zero() {
        row.remove(&var);
    }
}

/// The normal form of `Σ aᵢxᵢ + k ⋈ 0`, as `Σ bᵢxᵢ ⋈' c`.
///
/// The expression is scaled so the coefficient of the least variable is positive, and either one, or for integral rows the least positive integer for which each coefficient is integral.
/// If scaling was by a negative factor the comparison is flipped, e.g. `≤` to `≥`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub coefficients: BTreeMap<VarId, Rational>,
    pub bound: Rational,
    pub flipped: bool,
}

/// The normal form of a comparison of `expr` with zero, if `expr` is not constant.
pub fn normalize(expr: &LinearExpr, integral: bool) -> Option<Normalized> {
    let (_, leading) = expr.coefficients.iter().next()?;

    let magnitude = match integral {
        true => {
            let lcm = lcm_of_denominators(expr.coefficients.values());
            let numerators = expr
                .coefficients
                .values()
                .map(|coefficient| (coefficient * Rational::from_integer(lcm.clone())).to_integer());
            let gcd = gcd_of(numerators);
            Rational::new(lcm, gcd)
        }
        false => Rational::one() / leading.abs(),
    };

    let factor = match leading.is_negative() {
        true => -magnitude,
        false => magnitude,
    };

    let coefficients = expr
        .coefficients
        .iter()
        .map(|(var, coefficient)| (*var, coefficient * &factor))
        .collect();

    Some(Normalized {
        coefficients,
        bound: -(&expr.constant * &factor),
        flipped: factor.is_negative(),
    })
}
