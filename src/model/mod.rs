/*!
Models: assignments of values to declared symbols.

A [Model] is immutable once built by an [oracle](crate::oracle), and any term may be [evaluated](Model::eval) in a model.
Symbols without an assignment take the [default value](Value::default_of) of their sort, which is how a model treats symbols not relevant to the formula it satisfies.

An [environment](crate::environment) keeps a model for each objective and a single *current* model, see [load_objective_model](crate::environment::GenericEnvironment::load_objective_model).
*/

mod value;
pub use value::{bv_integer, Value};
pub(crate) use value::FloatValue;

use std::{cmp::Ordering, collections::BTreeMap};

use num::{BigUint, Zero};

use crate::{
    numeric::{self, Rational},
    terms::{Node, Op, Sort, Term, TermStore},
    types::err::{ErrorKind, TermError, TypeError},
};

/// An assignment of values to symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    values: BTreeMap<Term, (String, Value)>,
}

impl Model {
    pub(crate) fn assign(&mut self, symbol: Term, name: String, value: Value) {
        self.values.insert(symbol, (name, value));
    }

    /// The value assigned to `symbol`, if any.
    pub fn value_of(&self, symbol: Term) -> Option<&Value> {
        self.values.get(&symbol).map(|(_, value)| value)
    }

    /// The value assigned to the symbol named `name`, if any.
    pub fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.values
            .values()
            .find(|(symbol_name, _)| symbol_name == name)
            .map(|(_, value)| value)
    }

    /// The assignments of the model, in order of declaration.
    pub fn iter(&self) -> impl Iterator<Item = (Term, &str, &Value)> {
        self.values
            .iter()
            .map(|(term, (name, value))| (*term, name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if `formula` evaluates to true.
    pub fn satisfies(&self, store: &TermStore, formula: Term) -> Result<bool, ErrorKind> {
        match self.eval(store, formula)? {
            Value::Bool(value) => Ok(value),
            _ => Err(TypeError::Expected {
                expected: Sort::Bool,
                found: store.sort(formula)?,
            }
            .into()),
        }
    }

    /// The value of a numeric or bit-vector `term`, as a rational.
    pub fn eval_rational(
        &self,
        store: &TermStore,
        term: Term,
        signed: bool,
    ) -> Result<Rational, ErrorKind> {
        let value = self.eval(store, term)?;
        match value.as_rational(signed) {
            Some(rational) => Ok(rational),
            None => Err(TypeError::ExpectedNumeric(store.sort(term)?).into()),
        }
    }

    /// The value of `term`.
    pub fn eval(&self, store: &TermStore, term: Term) -> Result<Value, ErrorKind> {
        let Node { op, args, sort } = store.node(term)?;

        let value = match op {
            Op::Symbol(_) => match self.value_of(term) {
                Some(value) => value.clone(),
                None => Value::default_of(sort),
            },

            Op::True => Value::Bool(true),

            Op::False => Value::Bool(false),

            Op::Not => Value::Bool(!self.eval_bool(store, args[0])?),

            Op::And => {
                let mut result = true;
                for arg in args {
                    result &= self.eval_bool(store, arg)?;
                }
                Value::Bool(result)
            }

            Op::Or => {
                let mut result = false;
                for arg in args {
                    result |= self.eval_bool(store, arg)?;
                }
                Value::Bool(result)
            }

            Op::Implies => {
                Value::Bool(!self.eval_bool(store, args[0])? || self.eval_bool(store, args[1])?)
            }

            Op::Iff => Value::Bool(self.eval_bool(store, args[0])? == self.eval_bool(store, args[1])?),

            Op::Xor => Value::Bool(self.eval_bool(store, args[0])? != self.eval_bool(store, args[1])?),

            Op::Ite => {
                let branch = match self.eval_bool(store, args[0])? {
                    true => args[1],
                    false => args[2],
                };
                coerce(self.eval(store, branch)?, sort)
            }

            Op::Eq => {
                let first = self.eval(store, args[0])?;
                let mut result = true;
                for arg in &args[1..] {
                    result &= equal_values(&first, &self.eval(store, *arg)?);
                }
                Value::Bool(result)
            }

            Op::Distinct => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(store, *arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut result = true;
                for (i, a) in values.iter().enumerate() {
                    for b in &values[i + 1..] {
                        result &= !equal_values(a, b);
                    }
                }
                Value::Bool(result)
            }

            Op::Numeral(value) => numeric_value(value, sort),

            Op::Add => {
                let mut sum = Rational::zero();
                for arg in args {
                    sum += self.eval_numeric(store, arg)?;
                }
                numeric_value(sum, sort)
            }

            Op::Sub => {
                let a = self.eval_numeric(store, args[0])?;
                let b = self.eval_numeric(store, args[1])?;
                numeric_value(a - b, sort)
            }

            Op::Neg => numeric_value(-self.eval_numeric(store, args[0])?, sort),

            Op::Mul => {
                let mut product = numeric::rational(1);
                for arg in args {
                    product *= self.eval_numeric(store, arg)?;
                }
                numeric_value(product, sort)
            }

            Op::Div => {
                let a = self.eval_numeric(store, args[0])?;
                let b = self.eval_numeric(store, args[1])?;
                if b.is_zero() {
                    return Err(TermError::DivisionByZero.into());
                }
                Value::Real(a / b)
            }

            Op::ToReal => Value::Real(self.eval_numeric(store, args[0])?),

            Op::Le | Op::Lt | Op::Ge | Op::Gt => {
                let a = self.eval_numeric(store, args[0])?;
                let b = self.eval_numeric(store, args[1])?;
                Value::Bool(match op {
                    Op::Le => a <= b,
                    Op::Lt => a < b,
                    Op::Ge => a >= b,
                    _ => a > b,
                })
            }

            Op::BvConst(bits) => Value::BitVector {
                value: bits,
                width: sort.width().unwrap_or(1),
            },

            Op::BvUle | Op::BvUlt | Op::BvSle | Op::BvSlt => {
                let signed = matches!(op, Op::BvSle | Op::BvSlt);
                let a = self.eval_rational(store, args[0], signed)?;
                let b = self.eval_rational(store, args[1], signed)?;
                Value::Bool(match op {
                    Op::BvUle | Op::BvSle => a <= b,
                    _ => a < b,
                })
            }

            Op::FpConst(bits) => match sort {
                Sort::Float {
                    exponent,
                    significand,
                } => Value::Float {
                    bits,
                    exponent,
                    significand,
                },
                _ => Value::default_of(sort),
            },

            Op::FpLeq | Op::FpLt => {
                let a = self.eval_float(store, args[0])?;
                let b = self.eval_float(store, args[1])?;
                Value::Bool(match (a.compare(&b), op) {
                    (None, _) => false,
                    (Some(Ordering::Less), _) => true,
                    (Some(Ordering::Equal), Op::FpLeq) => true,
                    _ => false,
                })
            }
        };
        Ok(value)
    }

    fn eval_bool(&self, store: &TermStore, term: Term) -> Result<bool, ErrorKind> {
        match self.eval(store, term)? {
            Value::Bool(value) => Ok(value),
            _ => Err(TypeError::Expected {
                expected: Sort::Bool,
                found: store.sort(term)?,
            }
            .into()),
        }
    }

    fn eval_numeric(&self, store: &TermStore, term: Term) -> Result<Rational, ErrorKind> {
        self.eval_rational(store, term, false)
    }

    fn eval_float(&self, store: &TermStore, term: Term) -> Result<FloatValue, ErrorKind> {
        match self.eval(store, term)? {
            Value::Float {
                bits,
                exponent,
                significand,
            } => Ok(FloatValue::decode(&bits, exponent, significand)),
            _ => Err(TypeError::Expected {
                expected: Sort::Float {
                    exponent: 8,
                    significand: 24,
                },
                found: store.sort(term)?,
            }
            .into()),
        }
    }
}

/// A numeric value of `sort`.
fn numeric_value(value: Rational, sort: Sort) -> Value {
    match (sort, value.is_integer()) {
        (Sort::Int, true) => Value::Int(value.to_integer()),
        _ => Value::Real(value),
    }
}

/// Integers are lifted to reals in a branch of real sort.
fn coerce(value: Value, sort: Sort) -> Value {
    match (value, sort) {
        (Value::Int(value), Sort::Real) => Value::Real(Rational::from_integer(value)),
        (value, _) => value,
    }
}

fn equal_values(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float { .. }, Value::Float { .. }) => a == b,
        (Value::BitVector { .. }, Value::BitVector { .. }) => a == b,
        _ => match (a.as_rational(false), b.as_rational(false)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.values.values() {
            writeln!(f, "{name} : {value}")?;
        }
        Ok(())
    }
}

/// The unsigned bits of the integer `value` as a bit-vector of `width`, wrapping as required.
pub(crate) fn bv_bits(value: &num::BigInt, width: u32) -> BigUint {
    use num::Integer;
    let modulus = numeric::power_of_two(width);
    value.mod_floor(&modulus).to_biguint().unwrap_or_default()
}
