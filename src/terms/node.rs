use num::BigUint;

use super::{Sort, Term};
use crate::{
    numeric::Rational,
    types::err::{ErrorKind, TermError},
};

/// The operator at the root of a term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// A declared constant, by name.
    Symbol(String),

    True,
    False,
    Not,
    And,
    Or,
    Implies,
    Iff,
    Xor,
    Ite,
    Eq,
    Distinct,

    /// An integer or real constant, by the sort of the node.
    Numeral(Rational),
    Add,
    Sub,
    Neg,
    Mul,
    Div,
    ToReal,
    Le,
    Lt,
    Ge,
    Gt,

    /// A bit-vector constant, as the unsigned value of the bits.
    BvConst(BigUint),
    BvUle,
    BvUlt,
    BvSle,
    BvSlt,

    /// A floating point constant, as the bits of the IEEE representation.
    FpConst(BigUint),
    FpLeq,
    FpLt,
}

impl Op {
    /// The SMT-LIB name of the operator, for operators applied to arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Implies => "=>",
            Op::Iff | Op::Eq => "=",
            Op::Xor => "xor",
            Op::Ite => "ite",
            Op::Distinct => "distinct",
            Op::Add => "+",
            Op::Sub | Op::Neg => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::ToReal => "to_real",
            Op::Le => "<=",
            Op::Lt => "<",
            Op::Ge => ">=",
            Op::Gt => ">",
            Op::BvUle => "bvule",
            Op::BvUlt => "bvult",
            Op::BvSle => "bvsle",
            Op::BvSlt => "bvslt",
            Op::FpLeq => "fp.leq",
            Op::FpLt => "fp.lt",
            Op::Symbol(_)
            | Op::True
            | Op::False
            | Op::Numeral(_)
            | Op::BvConst(_)
            | Op::FpConst(_) => "",
        }
    }
}

/// An interned node: an operator, the arguments of the operator, and the sort of the result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub op: Op,
    pub args: Vec<Term>,
    pub sort: Sort,
}

fn arity(args: &[Sort], expected: usize) -> Result<(), ErrorKind> {
    match args.len() == expected {
        true => Ok(()),
        false => Err(TermError::Arity.into()),
    }
}

fn at_least(args: &[Sort], expected: usize) -> Result<(), ErrorKind> {
    match args.len() >= expected {
        true => Ok(()),
        false => Err(TermError::Arity.into()),
    }
}

fn all_bool(args: &[Sort]) -> Result<(), ErrorKind> {
    args.iter().try_for_each(|sort| sort.expect(Sort::Bool))
}

fn join_all(args: &[Sort]) -> Result<Sort, ErrorKind> {
    let mut joined = args[0];
    for sort in &args[1..] {
        joined = joined.join(*sort)?;
    }
    Ok(joined)
}

fn numeric_join(args: &[Sort]) -> Result<Sort, ErrorKind> {
    args.iter().try_for_each(|sort| sort.expect_numeric())?;
    join_all(args)
}

fn same_bit_vector(args: &[Sort]) -> Result<(), ErrorKind> {
    arity(args, 2)?;
    match args[0] {
        Sort::BitVector(_) => args[1].expect(args[0]),
        other => Err(crate::types::err::TypeError::Expected {
            expected: Sort::BitVector(args[1].width().unwrap_or(1)),
            found: other,
        }
        .into()),
    }
}

fn same_float(args: &[Sort]) -> Result<(), ErrorKind> {
    arity(args, 2)?;
    match args[0] {
        Sort::Float { .. } => args[1].expect(args[0]),
        other => Err(crate::types::err::TypeError::Expected {
            expected: Sort::Float {
                exponent: 8,
                significand: 24,
            },
            found: other,
        }
        .into()),
    }
}

/// The sort of an application of `op` to arguments of sorts `args`, for operators which are not constants.
pub(super) fn infer(op: &Op, args: &[Sort]) -> Result<Sort, ErrorKind> {
    match op {
        Op::Not => {
            arity(args, 1)?;
            all_bool(args)?;
            Ok(Sort::Bool)
        }

        Op::And | Op::Or => {
            at_least(args, 1)?;
            all_bool(args)?;
            Ok(Sort::Bool)
        }

        Op::Implies | Op::Iff | Op::Xor => {
            arity(args, 2)?;
            all_bool(args)?;
            Ok(Sort::Bool)
        }

        Op::Ite => {
            arity(args, 3)?;
            args[0].expect(Sort::Bool)?;
            args[1].join(args[2])
        }

        Op::Eq | Op::Distinct => {
            at_least(args, 2)?;
            join_all(args)?;
            Ok(Sort::Bool)
        }

        Op::Add | Op::Mul => {
            at_least(args, 1)?;
            numeric_join(args)
        }

        Op::Sub => {
            arity(args, 2)?;
            numeric_join(args)
        }

        Op::Neg => {
            arity(args, 1)?;
            numeric_join(args)
        }

        Op::Div => {
            arity(args, 2)?;
            numeric_join(args)?;
            Ok(Sort::Real)
        }

        Op::ToReal => {
            arity(args, 1)?;
            args[0].expect_numeric()?;
            Ok(Sort::Real)
        }

        Op::Le | Op::Lt | Op::Ge | Op::Gt => {
            arity(args, 2)?;
            numeric_join(args)?;
            Ok(Sort::Bool)
        }

        Op::BvUle | Op::BvUlt | Op::BvSle | Op::BvSlt => {
            same_bit_vector(args)?;
            Ok(Sort::Bool)
        }

        Op::FpLeq | Op::FpLt => {
            same_float(args)?;
            Ok(Sort::Bool)
        }

        Op::Symbol(_)
        | Op::True
        | Op::False
        | Op::Numeral(_)
        | Op::BvConst(_)
        | Op::FpConst(_) => Err(TermError::Arity.into()),
    }
}
