//! Methods to build terms.
//!
//! Each method checks the sorts of its arguments, and light simplification is applied to constants and connectives of zero or one argument.

use num::{BigInt, BigUint, One, Signed, Zero};

use super::{Op, Sort, Term, TermStore};
use crate::{
    numeric::{self, Rational},
    types::err::{ErrorKind, TermError},
};

impl TermStore {
    /// Declares a boolean symbol.
    pub fn bool_var(&self, name: &str) -> Result<Term, ErrorKind> {
        self.declare(name, Sort::Bool)
    }

    /// Declares an integer symbol.
    pub fn int_var(&self, name: &str) -> Result<Term, ErrorKind> {
        self.declare(name, Sort::Int)
    }

    /// Declares a real symbol.
    pub fn real_var(&self, name: &str) -> Result<Term, ErrorKind> {
        self.declare(name, Sort::Real)
    }

    /// Declares a bit-vector symbol of width `width`.
    pub fn bv_var(&self, name: &str, width: u32) -> Result<Term, ErrorKind> {
        self.declare(name, Sort::BitVector(width))
    }

    /// Declares a floating point symbol.
    pub fn fp_var(&self, name: &str, exponent: u32, significand: u32) -> Result<Term, ErrorKind> {
        self.declare(
            name,
            Sort::Float {
                exponent,
                significand,
            },
        )
    }

    pub fn tt(&self) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::True, Sort::Bool))
    }

    pub fn ff(&self) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::False, Sort::Bool))
    }

    /// The boolean constant `value`.
    pub fn boolean(&self, value: bool) -> Result<Term, ErrorKind> {
        match value {
            true => self.tt(),
            false => self.ff(),
        }
    }

    /// The integer constant `value`.
    pub fn int(&self, value: i64) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::Numeral(numeric::rational(value)), Sort::Int))
    }

    /// The integer constant `value`.
    pub fn int_big(&self, value: BigInt) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::Numeral(Rational::from_integer(value)), Sort::Int))
    }

    /// The real constant `value`.
    pub fn real(&self, value: i64) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::Numeral(numeric::rational(value)), Sort::Real))
    }

    /// The real constant `value`.
    pub fn rational(&self, value: Rational) -> Result<Term, ErrorKind> {
        Ok(self.make_constant(Op::Numeral(value), Sort::Real))
    }

    /// A constant of numeric sort `sort` with value `value`.
    ///
    /// Non-integral values are real, regardless of `sort`.
    pub fn numeral(&self, value: Rational, sort: Sort) -> Result<Term, ErrorKind> {
        sort.expect_numeric()?;
        match sort == Sort::Int && value.is_integer() {
            true => Ok(self.make_constant(Op::Numeral(value), Sort::Int)),
            false => self.rational(value),
        }
    }

    /// The bit-vector constant of width `width` with value `value`.
    ///
    /// Negative values are read as two's complement, and so `value` must be between `-2^(width-1)` and `2^width - 1`.
    pub fn bv(&self, value: i64, width: u32) -> Result<Term, ErrorKind> {
        self.bv_big(BigInt::from(value), width)
    }

    /// The bit-vector constant of width `width` whose signed reading is `value`.
    ///
    /// Unlike [bv](TermStore::bv), `value` must be between `-2^(width-1)` and `2^(width-1) - 1`.
    pub fn bv_signed(&self, value: i64, width: u32) -> Result<Term, ErrorKind> {
        if width == 0 {
            return Err(crate::types::err::TypeError::ZeroWidth.into());
        }
        let value = BigInt::from(value);
        if value >= numeric::power_of_two(width - 1) {
            return Err(TermError::Overflow.into());
        }
        self.bv_big(value, width)
    }

    /// The bit-vector constant of width `width` with value `value`, as [bv](TermStore::bv).
    pub fn bv_big(&self, value: BigInt, width: u32) -> Result<Term, ErrorKind> {
        if width == 0 {
            return Err(crate::types::err::TypeError::ZeroWidth.into());
        }
        let modulus = numeric::power_of_two(width);
        let half = numeric::power_of_two(width - 1);
        if value >= modulus || value < -half {
            return Err(TermError::Overflow.into());
        }
        let unsigned = match value.is_negative() {
            true => value + &modulus,
            false => value,
        };
        let bits = unsigned.to_biguint().unwrap_or_default();
        Ok(self.make_constant(Op::BvConst(bits), Sort::BitVector(width)))
    }

    /// The floating point constant with the given bits.
    pub fn fp_bits(
        &self,
        bits: BigUint,
        exponent: u32,
        significand: u32,
    ) -> Result<Term, ErrorKind> {
        if bits >= (BigUint::one() << (exponent + significand) as usize) {
            return Err(TermError::Overflow.into());
        }
        Ok(self.make_constant(
            Op::FpConst(bits),
            Sort::Float {
                exponent,
                significand,
            },
        ))
    }

    pub fn not(&self, term: Term) -> Result<Term, ErrorKind> {
        let node = self.node(term)?;
        match node.op {
            Op::Not => Ok(node.args[0]),
            Op::True => self.ff(),
            Op::False => self.tt(),
            _ => self.make(Op::Not, vec![term]),
        }
    }

    pub fn and(&self, terms: &[Term]) -> Result<Term, ErrorKind> {
        match terms {
            [] => self.tt(),
            [term] => {
                self.sort(*term)?.expect(Sort::Bool)?;
                Ok(*term)
            }
            _ => self.make(Op::And, terms.to_vec()),
        }
    }

    pub fn or(&self, terms: &[Term]) -> Result<Term, ErrorKind> {
        match terms {
            [] => self.ff(),
            [term] => {
                self.sort(*term)?.expect(Sort::Bool)?;
                Ok(*term)
            }
            _ => self.make(Op::Or, terms.to_vec()),
        }
    }

    pub fn implies(&self, antecedent: Term, consequent: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Implies, vec![antecedent, consequent])
    }

    pub fn iff(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Iff, vec![a, b])
    }

    pub fn xor(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Xor, vec![a, b])
    }

    /// If `condition` then `then` else `otherwise`.
    pub fn ite(&self, condition: Term, then: Term, otherwise: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Ite, vec![condition, then, otherwise])
    }

    /// Equality, as a biconditional for booleans.
    pub fn eq(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        match self.sort(a)? {
            Sort::Bool => self.iff(a, b),
            _ => self.make(Op::Eq, vec![a, b]),
        }
    }

    pub fn distinct(&self, terms: &[Term]) -> Result<Term, ErrorKind> {
        self.make(Op::Distinct, terms.to_vec())
    }

    pub fn add(&self, terms: &[Term]) -> Result<Term, ErrorKind> {
        match terms {
            [] => self.int(0),
            [term] => {
                self.sort(*term)?.expect_numeric()?;
                Ok(*term)
            }
            _ => self.make(Op::Add, terms.to_vec()),
        }
    }

    pub fn sub(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Sub, vec![a, b])
    }

    pub fn neg(&self, term: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Neg, vec![term])
    }

    pub fn mul(&self, terms: &[Term]) -> Result<Term, ErrorKind> {
        match terms {
            [] => self.int(1),
            [term] => {
                self.sort(*term)?.expect_numeric()?;
                Ok(*term)
            }
            _ => self.make(Op::Mul, terms.to_vec()),
        }
    }

    /// Real division.
    pub fn div(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        if let Op::Numeral(value) = self.node(b)?.op {
            if value.is_zero() {
                return Err(TermError::DivisionByZero.into());
            }
        }
        self.make(Op::Div, vec![a, b])
    }

    pub fn to_real(&self, term: Term) -> Result<Term, ErrorKind> {
        self.make(Op::ToReal, vec![term])
    }

    pub fn le(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Le, vec![a, b])
    }

    pub fn lt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Lt, vec![a, b])
    }

    pub fn ge(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Ge, vec![a, b])
    }

    pub fn gt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::Gt, vec![a, b])
    }

    pub fn bv_ule(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvUle, vec![a, b])
    }

    pub fn bv_ult(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvUlt, vec![a, b])
    }

    pub fn bv_uge(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvUle, vec![b, a])
    }

    pub fn bv_ugt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvUlt, vec![b, a])
    }

    pub fn bv_sle(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvSle, vec![a, b])
    }

    pub fn bv_slt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvSlt, vec![a, b])
    }

    pub fn bv_sge(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvSle, vec![b, a])
    }

    pub fn bv_sgt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::BvSlt, vec![b, a])
    }

    pub fn fp_leq(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::FpLeq, vec![a, b])
    }

    pub fn fp_lt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::FpLt, vec![a, b])
    }

    pub fn fp_geq(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::FpLeq, vec![b, a])
    }

    pub fn fp_gt(&self, a: Term, b: Term) -> Result<Term, ErrorKind> {
        self.make(Op::FpLt, vec![b, a])
    }

    /// `a <= b`, `a < b`, when `strict`, for numeric or bit-vector terms.
    ///
    /// Bit-vectors are compared as signed values when `signed`, and unsigned values otherwise.
    pub fn ordered(&self, a: Term, b: Term, strict: bool, signed: bool) -> Result<Term, ErrorKind> {
        match (self.sort(a)?, strict, signed) {
            (Sort::BitVector(_), true, true) => self.bv_slt(a, b),
            (Sort::BitVector(_), false, true) => self.bv_sle(a, b),
            (Sort::BitVector(_), true, false) => self.bv_ult(a, b),
            (Sort::BitVector(_), false, false) => self.bv_ule(a, b),
            (_, true, _) => self.lt(a, b),
            (_, false, _) => self.le(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_vector_constants() {
        let store = TermStore::default();
        assert_eq!(store.bv(-5, 4).unwrap(), store.bv(11, 4).unwrap());
        assert_eq!(store.bv(16, 4), Err(TermError::Overflow.into()));
        assert_eq!(store.bv(-9, 4), Err(TermError::Overflow.into()));

        assert_eq!(store.bv_signed(-5, 4).unwrap(), store.bv(11, 4).unwrap());
        assert_eq!(store.bv_signed(7, 4).unwrap(), store.bv(7, 4).unwrap());
        assert_eq!(store.bv_signed(8, 4), Err(TermError::Overflow.into()));
        assert_eq!(store.bv_signed(-9, 4), Err(TermError::Overflow.into()));
        assert!(store.bv_signed(0, 0).is_err());
    }

    #[test]
    fn simplification() {
        let store = TermStore::default();
        let p = store.bool_var("p").unwrap();
        assert_eq!(store.not(store.not(p).unwrap()).unwrap(), p);
        assert_eq!(store.and(&[p]).unwrap(), p);
        assert_eq!(store.or(&[]).unwrap(), store.ff().unwrap());
        assert_eq!(store.not(store.tt().unwrap()).unwrap(), store.ff().unwrap());
    }

    #[test]
    fn numerals() {
        let store = TermStore::default();
        assert_ne!(store.int(5).unwrap(), store.real(5).unwrap());
        assert_eq!(
            store.numeral(numeric::ratio(10, 2), Sort::Int).unwrap(),
            store.int(5).unwrap()
        );
        assert_eq!(
            store.sort(store.numeral(numeric::ratio(5, 2), Sort::Int).unwrap()).unwrap(),
            Sort::Real
        );
        let x = store.real_var("x").unwrap();
        assert!(store.div(x, store.int(0).unwrap()).is_err());
    }
}
