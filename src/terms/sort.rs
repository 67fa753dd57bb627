use crate::types::err::{ErrorKind, TypeError};

/// The sort (type) of a term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sort {
    Bool,
    Int,
    Real,
    /// A bit-vector of the given (positive) width.
    BitVector(u32),
    /// An IEEE floating point sort, with widths of the exponent and significand.
    Float { exponent: u32, significand: u32 },
}

impl Sort {
    /// True for integers and reals.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Sort::Int | Sort::Real)
    }

    /// The width of a bit-vector sort.
    pub fn width(&self) -> Option<u32> {
        match self {
            Sort::BitVector(width) => Some(*width),
            _ => None,
        }
    }

    /// The sort of a term which may take values of either sort.
    ///
    /// Integers and reals join to reals, otherwise the sorts must be equal.
    pub fn join(self, other: Sort) -> Result<Sort, ErrorKind> {
        match (self, other) {
            (a, b) if a == b => Ok(a),
            (Sort::Int, Sort::Real) | (Sort::Real, Sort::Int) => Ok(Sort::Real),
            (a, b) => Err(TypeError::Incompatible(a, b).into()),
        }
    }

    /// Requires `self` to be `expected`.
    pub fn expect(self, expected: Sort) -> Result<(), ErrorKind> {
        match self == expected {
            true => Ok(()),
            false => Err(TypeError::Expected {
                expected,
                found: self,
            }
            .into()),
        }
    }

    /// Requires `self` to be numeric.
    pub fn expect_numeric(self) -> Result<(), ErrorKind> {
        match self.is_numeric() {
            true => Ok(()),
            false => Err(TypeError::ExpectedNumeric(self).into()),
        }
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Real => write!(f, "Real"),
            Self::BitVector(width) => write!(f, "(_ BitVec {width})"),
            Self::Float {
                exponent,
                significand,
            } => write!(f, "(_ FloatingPoint {exponent} {significand})"),
        }
    }
}
