/*!
Bit-vectors, lowered to bounded integers.

A bit-vector `b` of width `w` is represented by an integer variable `u ∈ [0, 2ʷ - 1]`, the unsigned value of `b`.
When the signed value of `b` is required, an integer *sign* variable `k ∈ [0, 1]` is introduced together with a row `u - 2ʷ⁻¹k ∈ [0, 2ʷ⁻¹ - 1]`, and the signed value of `b` is `u - 2ʷk`.

For example, with `w = 8` the value `u = 240` forces `k = 1`, as `240 - 128k ≤ 127`, and the signed value is `240 - 256 = -16`.

The fragment supported is comparison, equality, and if-then-else over variables and constants, which is the fragment required to state bounds on bit-vector objectives.
*/

use num::BigInt;

use crate::{
    numeric::{power_of_two, Rational},
    theory::arith::{linear::LinearExpr, simplex::Simplex, simplex::VarId, BoundKind},
};

/// The simplex variables of a bit-vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BvVars {
    pub width: u32,
    pub unsigned: VarId,
    pub sign: Option<VarId>,
}

/// The least and greatest values of a bit-vector of `width`, read as signed or unsigned.
pub fn domain(width: u32, signed: bool) -> (BigInt, BigInt) {
    match signed {
        true => {
            let half = power_of_two(width.saturating_sub(1));
            (-half.clone(), half - 1)
        }
        false => (BigInt::from(0), power_of_two(width) - 1),
    }
}

impl BvVars {
    /// Fresh variables for a bit-vector of `width`.
    pub fn declare(simplex: &mut Simplex, width: u32) -> Self {
        let unsigned = simplex.new_var(true);
        let (lower, upper) = domain(width, false);
        simplex.set_static(unsigned, BoundKind::Lower, Rational::from_integer(lower));
        simplex.set_static(unsigned, BoundKind::Upper, Rational::from_integer(upper));
        BvVars {
            width,
            unsigned,
            sign: None,
        }
    }

    /// The unsigned value.
    pub fn unsigned_expr(&self) -> LinearExpr {
        LinearExpr::var(self.unsigned)
    }

    /// The signed value, introducing a sign variable if required.
    pub fn signed_expr(&mut self, simplex: &mut Simplex) -> LinearExpr {
        let sign = match self.sign {
            Some(sign) => sign,
            None => {
                let sign = simplex.new_var(true);
                simplex.set_static(sign, BoundKind::Lower, Rational::from_integer(0.into()));
                simplex.set_static(sign, BoundKind::Upper, Rational::from_integer(1.into()));

                let half = Rational::from_integer(power_of_two(self.width.saturating_sub(1)));
                let mut remainder = LinearExpr::var(self.unsigned);
                remainder.add_scaled(&LinearExpr::var(sign), &-half.clone());
                let row = simplex.add_row(&remainder.coefficients, true);
                simplex.set_static(row, BoundKind::Lower, Rational::from_integer(0.into()));
                simplex.set_static(row, BoundKind::Upper, half - Rational::from_integer(1.into()));

                self.sign = Some(sign);
                sign
            }
        };

        let mut expr = LinearExpr::var(self.unsigned);
        let modulus = Rational::from_integer(power_of_two(self.width));
        expr.add_scaled(&LinearExpr::var(sign), &-modulus);
        expr
    }
}
