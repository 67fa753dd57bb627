//! Encoding of terms to clauses, simplex rows, and theory atoms.

use std::collections::BTreeMap;

use num::{One, Zero};

use super::{SmtOracle, TheoryAtom};
use crate::{
    misc::log::targets,
    model::bv_integer,
    numeric::{self, Rational},
    sat::literal::Literal,
    terms::{Node, Op, Sort, Term},
    theory::{
        arith::{
            linear::{normalize, LinearExpr},
            simplex::VarId,
            BoundKind,
        },
        bv::BvVars,
    },
    types::err::{ErrorKind, OracleError},
};

impl SmtOracle {
    /// The literal of a boolean term, encoding the term if required.
    pub(super) fn encode(&mut self, term: Term) -> Result<Literal, ErrorKind> {
        if let Some(literal) = self.literals.get(&term) {
            return Ok(*literal);
        }

        let Node { op, args, sort: _ } = self.store.node(term)?;

        let literal = match op {
            Op::Symbol(_) => {
                let atom = self.sat.fresh_atom();
                self.bool_symbols.insert(term, atom);
                Literal::new(atom, true)
            }

            Op::True => self.top,

            Op::False => self.top.negate(),

            Op::Not => self.encode(args[0])?.negate(),

            Op::And => {
                let literals = self.encode_all(&args)?;
                self.define_and(literals)?
            }

            Op::Or => {
                let literals = self.encode_all(&args)?;
                self.define_or(literals)?
            }

            Op::Implies => {
                let antecedent = self.encode(args[0])?;
                let consequent = self.encode(args[1])?;
                self.define_or(vec![antecedent.negate(), consequent])?
            }

            Op::Iff => {
                let a = self.encode(args[0])?;
                let b = self.encode(args[1])?;
                self.define_iff(a, b)?
            }

            Op::Xor => {
                let a = self.encode(args[0])?;
                let b = self.encode(args[1])?;
                self.define_iff(a, b)?.negate()
            }

            Op::Ite => {
                let condition = self.encode(args[0])?;
                let then = self.encode(args[1])?;
                let otherwise = self.encode(args[2])?;
                self.define_ite(condition, then, otherwise)?
            }

            Op::Eq => {
                let mut pairs = Vec::with_capacity(args.len());
                for pair in args.windows(2) {
                    pairs.push(self.encode_equality(pair[0], pair[1])?);
                }
                self.define_and(pairs)?
            }

            Op::Distinct => {
                let mut pairs = Vec::default();
                for (index, a) in args.iter().enumerate() {
                    for b in &args[index + 1..] {
                        pairs.push(self.encode_equality(*a, *b)?.negate());
                    }
                }
                self.define_and(pairs)?
            }

            Op::Le | Op::Lt | Op::Ge | Op::Gt => {
                let difference = self.difference(args[0], args[1], false)?;
                self.encode_comparison(&op, difference)
            }

            Op::BvUle | Op::BvUlt | Op::BvSle | Op::BvSlt => {
                let signed = matches!(op, Op::BvSle | Op::BvSlt);
                let difference = self.difference(args[0], args[1], signed)?;
                let op = match op {
                    Op::BvUle | Op::BvSle => Op::Le,
                    _ => Op::Lt,
                };
                self.encode_comparison(&op, difference)
            }

            Op::FpLeq | Op::FpLt => {
                return Err(OracleError::UnsupportedTheory("floating-point").into());
            }

            Op::Numeral(_)
            | Op::Add
            | Op::Sub
            | Op::Neg
            | Op::Mul
            | Op::Div
            | Op::ToReal
            | Op::BvConst(_)
            | Op::FpConst(_) => {
                return Err(OracleError::UnsupportedOperator(op.name().to_string()).into());
            }
        };

        self.literals.insert(term, literal);
        Ok(literal)
    }

    fn encode_all(&mut self, terms: &[Term]) -> Result<Vec<Literal>, ErrorKind> {
        terms.iter().map(|term| self.encode(*term)).collect()
    }

    /// The literal of `a = b`, for terms of any supported sort.
    fn encode_equality(&mut self, a: Term, b: Term) -> Result<Literal, ErrorKind> {
        match self.store.sort(a)? {
            Sort::Bool => {
                let a = self.encode(a)?;
                let b = self.encode(b)?;
                self.define_iff(a, b)
            }

            Sort::Float { .. } => Err(OracleError::UnsupportedTheory("floating-point").into()),

            _ => {
                let difference = self.difference(a, b, false)?;
                self.equality_of(difference)
            }
        }
    }

    /// The literal of `expr = 0`.
    fn equality_of(&mut self, expr: LinearExpr) -> Result<Literal, ErrorKind> {
        let upper = self.comparison(&expr, BoundKind::Upper);
        let lower = self.comparison(&expr, BoundKind::Lower);
        self.define_and(vec![upper, lower])
    }

    /// The literal of `difference ⋈ 0`, for the comparison `op`.
    fn encode_comparison(&mut self, op: &Op, difference: LinearExpr) -> Literal {
        match op {
            Op::Le => self.comparison(&difference, BoundKind::Upper),
            Op::Lt => self.comparison(&difference, BoundKind::Lower).negate(),
            Op::Ge => self.comparison(&difference, BoundKind::Lower),
            _ => self.comparison(&difference, BoundKind::Upper).negate(),
        }
    }

    /// `a - b`, as a linear expression.
    fn difference(&mut self, a: Term, b: Term, signed: bool) -> Result<LinearExpr, ErrorKind> {
        let (mut a, b) = match self.store.sort(a)? {
            Sort::BitVector(_) => (self.bv_value(a, signed)?, self.bv_value(b, signed)?),
            _ => (self.linear(a)?, self.linear(b)?),
        };
        a.add_scaled(&b, &-Rational::one());
        Ok(a)
    }

    /// The literal of `expr ≤ 0` (for [BoundKind::Upper]) or `expr ≥ 0` (for [BoundKind::Lower]).
    fn comparison(&mut self, expr: &LinearExpr, kind: BoundKind) -> Literal {
        let integral = expr
            .coefficients
            .keys()
            .all(|var| self.simplex.is_int(*var));

        let Some(normal) = normalize(expr, integral) else {
            let holds = match kind {
                BoundKind::Upper => expr.constant <= Rational::zero(),
                BoundKind::Lower => expr.constant >= Rational::zero(),
            };
            return match holds {
                true => self.top,
                false => self.top.negate(),
            };
        };

        let kind = match normal.flipped {
            true => kind.flip(),
            false => kind,
        };
        let var = self.row_var(&normal.coefficients, integral);
        self.atom_for(var, kind, normal.bound, integral)
    }

    /// The variable of a row, which is the variable itself for a single variable with coefficient one.
    pub(super) fn row_var(&mut self, coefficients: &BTreeMap<VarId, Rational>, integral: bool) -> VarId {
        if coefficients.len() == 1 {
            if let Some((var, coefficient)) = coefficients.iter().next() {
                if coefficient.is_one() {
                    return *var;
                }
            }
        }

        let key = coefficients
            .iter()
            .map(|(var, coefficient)| (*var, coefficient.clone()))
            .collect::<Vec<_>>();
        if let Some(var) = self.rows.get(&key) {
            return *var;
        }
        let var = self.simplex.add_row(coefficients, integral);
        self.rows.insert(key, var);
        var
    }

    /// The atom of `var ≤ bound` or `var ≥ bound`, as a positive literal.
    pub(super) fn atom_for(&mut self, var: VarId, kind: BoundKind, bound: Rational, integral: bool) -> Literal {
        let bound = match (integral, kind) {
            (true, BoundKind::Upper) => Rational::from_integer(numeric::floor(&bound)),
            (true, BoundKind::Lower) => Rational::from_integer(numeric::ceil(&bound)),
            (false, _) => bound,
        };

        let key = (var, kind, bound.clone());
        if let Some(atom) = self.atom_index.get(&key) {
            return Literal::new(*atom, true);
        }

        let atom = self.sat.fresh_atom();
        log::trace!(target: targets::ORACLE, "Atom {atom}: {var} {kind:?} {}", numeric::format_rational(&bound));
        self.atom_index.insert(key, atom);
        self.theory_atoms.push(TheoryAtom {
            atom,
            var,
            kind,
            bound,
            integral,
        });
        Literal::new(atom, true)
    }

    /// The value of a numeric term, as a linear expression.
    pub(super) fn linear(&mut self, term: Term) -> Result<LinearExpr, ErrorKind> {
        if let Some(var) = self.numeric_vars.get(&term) {
            return Ok(LinearExpr::var(*var));
        }

        let Node { op, args, sort } = self.store.node(term)?;

        let expr = match op {
            Op::Symbol(_) => {
                let var = self.simplex.new_var(sort == Sort::Int);
                self.numeric_vars.insert(term, var);
                LinearExpr::var(var)
            }

            Op::Numeral(value) => LinearExpr::constant(value),

            Op::Add => {
                let mut sum = LinearExpr::default();
                for arg in args {
                    let arg = self.linear(arg)?;
                    sum.add_scaled(&arg, &Rational::one());
                }
                sum
            }

            Op::Sub => {
                let mut a = self.linear(args[0])?;
                let b = self.linear(args[1])?;
                a.add_scaled(&b, &-Rational::one());
                a
            }

            Op::Neg => {
                let mut a = self.linear(args[0])?;
                a.scale(&-Rational::one());
                a
            }

            Op::Mul => {
                let mut factor = Rational::one();
                let mut variable: Option<LinearExpr> = None;
                for arg in args {
                    let arg = self.linear(arg)?;
                    match (arg.is_constant(), &variable) {
                        (true, _) => factor *= &arg.constant,
                        (false, None) => variable = Some(arg),
                        (false, Some(_)) => return Err(OracleError::NonLinear.into()),
                    }
                }
                match variable {
                    Some(mut product) => {
                        product.scale(&factor);
                        product
                    }
                    None => LinearExpr::constant(factor),
                }
            }

            Op::Div => {
                let mut a = self.linear(args[0])?;
                let b = self.linear(args[1])?;
                if !b.is_constant() {
                    return Err(OracleError::NonLinear.into());
                }
                if b.constant.is_zero() {
                    return Err(crate::types::err::TermError::DivisionByZero.into());
                }
                a.scale(&(Rational::one() / &b.constant));
                a
            }

            Op::ToReal => self.linear(args[0])?,

            Op::Ite => {
                let var = self.simplex.new_var(sort == Sort::Int);
                self.numeric_vars.insert(term, var);
                let condition = self.encode(args[0])?;

                let mut then = LinearExpr::var(var);
                let then_value = self.linear(args[1])?;
                then.add_scaled(&then_value, &-Rational::one());
                let then = self.equality_of(then)?;

                let mut otherwise = LinearExpr::var(var);
                let otherwise_value = self.linear(args[2])?;
                otherwise.add_scaled(&otherwise_value, &-Rational::one());
                let otherwise = self.equality_of(otherwise)?;

                self.sat.add_clause(vec![condition.negate(), then])?;
                self.sat.add_clause(vec![condition, otherwise])?;
                LinearExpr::var(var)
            }

            _ => return Err(OracleError::UnsupportedOperator(op.name().to_string()).into()),
        };

        Ok(expr)
    }

    /// The value of a bit-vector term, read as signed or unsigned, as a linear expression.
    pub(super) fn bv_value(&mut self, term: Term, signed: bool) -> Result<LinearExpr, ErrorKind> {
        if let Some(vars) = self.bv_vars.get(&term).copied() {
            return Ok(self.bv_read(term, vars, signed));
        }

        let Node { op, args, sort } = self.store.node(term)?;
        let width = sort.width().unwrap_or(1);

        match op {
            Op::Symbol(_) => {
                let vars = BvVars::declare(&mut self.simplex, width);
                self.bv_vars.insert(term, vars);
                Ok(self.bv_read(term, vars, signed))
            }

            Op::BvConst(bits) => Ok(LinearExpr::constant(Rational::from_integer(bv_integer(
                &bits, width, signed,
            )))),

            Op::Ite => {
                let vars = BvVars::declare(&mut self.simplex, width);
                self.bv_vars.insert(term, vars);
                let condition = self.encode(args[0])?;

                let mut then = vars.unsigned_expr();
                let then_value = self.bv_value(args[1], false)?;
                then.add_scaled(&then_value, &-Rational::one());
                let then = self.equality_of(then)?;

                let mut otherwise = vars.unsigned_expr();
                let otherwise_value = self.bv_value(args[2], false)?;
                otherwise.add_scaled(&otherwise_value, &-Rational::one());
                let otherwise = self.equality_of(otherwise)?;

                self.sat.add_clause(vec![condition.negate(), then])?;
                self.sat.add_clause(vec![condition, otherwise])?;
                Ok(self.bv_read(term, vars, signed))
            }

            _ => Err(OracleError::UnsupportedOperator(op.name().to_string()).into()),
        }
    }

    fn bv_read(&mut self, term: Term, mut vars: BvVars, signed: bool) -> LinearExpr {
        match signed {
            false => vars.unsigned_expr(),
            true => {
                let expr = vars.signed_expr(&mut self.simplex);
                self.bv_vars.insert(term, vars);
                expr
            }
        }
    }

    /// True if every arithmetic if-then-else within `term` has been lifted to a variable.
    pub(super) fn is_encoded(&self, term: Term) -> Result<bool, ErrorKind> {
        let Node { op, args, sort } = self.store.node(term)?;
        match (op, sort) {
            (Op::Ite, Sort::Bool) => Ok(true),
            (Op::Ite, _) => Ok(self.numeric_vars.contains_key(&term) || self.bv_vars.contains_key(&term)),
            _ => {
                for arg in args {
                    if !self.is_encoded(arg)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// A definition `v ↔ (l₁ ∧ … ∧ lₙ)`.
    fn define_and(&mut self, literals: Vec<Literal>) -> Result<Literal, ErrorKind> {
        match literals.len() {
            0 => return Ok(self.top),
            1 => return Ok(literals[0]),
            _ => {}
        }
        let v = Literal::new(self.sat.fresh_atom(), true);
        let mut long = vec![v];
        for literal in &literals {
            self.sat.add_clause(vec![v.negate(), *literal])?;
            long.push(literal.negate());
        }
        self.sat.add_clause(long)?;
        Ok(v)
    }

    /// A definition `v ↔ (l₁ ∨ … ∨ lₙ)`.
    fn define_or(&mut self, literals: Vec<Literal>) -> Result<Literal, ErrorKind> {
        let negated = literals.iter().map(|literal| literal.negate()).collect();
        Ok(self.define_and(negated)?.negate())
    }

    /// A definition `v ↔ (a ↔ b)`.
    fn define_iff(&mut self, a: Literal, b: Literal) -> Result<Literal, ErrorKind> {
        let v = Literal::new(self.sat.fresh_atom(), true);
        self.sat.add_clause(vec![v.negate(), a.negate(), b])?;
        self.sat.add_clause(vec![v.negate(), a, b.negate()])?;
        self.sat.add_clause(vec![v, a, b])?;
        self.sat.add_clause(vec![v, a.negate(), b.negate()])?;
        Ok(v)
    }

    /// A definition `v ↔ ite(c, t, e)`.
    fn define_ite(&mut self, c: Literal, t: Literal, e: Literal) -> Result<Literal, ErrorKind> {
        let v = Literal::new(self.sat.fresh_atom(), true);
        self.sat.add_clause(vec![c.negate(), t.negate(), v])?;
        self.sat.add_clause(vec![c.negate(), t, v.negate()])?;
        self.sat.add_clause(vec![c, e.negate(), v])?;
        self.sat.add_clause(vec![c, e, v.negate()])?;
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::sat::SatConfig, oracle::{Oracle, SatResult}, terms::TermStore};

    #[test]
    fn shared_atoms() {
        let mut oracle = SmtOracle::new(TermStore::default(), SatConfig::default()).unwrap();
        let store = oracle.terms().clone();
        let x = store.int_var("x").unwrap();
        let y = store.int_var("y").unwrap();

        // x + y ≤ 4 and 2x + 2y ≤ 9 share a row, and over the integers a bound.
        let sum = store.add(&[x, y]).unwrap();
        let double = store
            .add(&[
                store.mul(&[store.int(2).unwrap(), x]).unwrap(),
                store.mul(&[store.int(2).unwrap(), y]).unwrap(),
            ])
            .unwrap();
        let a = oracle.encode(store.le(sum, store.int(4).unwrap()).unwrap()).unwrap();
        let b = oracle.encode(store.le(double, store.int(9).unwrap()).unwrap()).unwrap();
        assert_eq!(a, b);

        let c = oracle.encode(store.gt(sum, store.int(4).unwrap()).unwrap()).unwrap();
        assert_eq!(c, a.negate());
    }

    #[test]
    fn constant_comparisons() {
        let mut oracle = SmtOracle::new(TermStore::default(), SatConfig::default()).unwrap();
        let store = oracle.terms().clone();
        let x = store.int_var("x").unwrap();
        let trivial = store.le(store.sub(x, x).unwrap(), store.int(1).unwrap()).unwrap();
        assert_eq!(oracle.encode(trivial).unwrap(), oracle.top);
    }

    #[test]
    fn non_linear() {
        let mut oracle = SmtOracle::new(TermStore::default(), SatConfig::default()).unwrap();
        let store = oracle.terms().clone();
        let x = store.int_var("x").unwrap();
        let square = store.mul(&[x, x]).unwrap();
        let result = oracle.assert_hard(store.ge(square, store.int(1).unwrap()).unwrap());
        assert_eq!(result, Err(OracleError::NonLinear.into()));
    }

    #[test]
    fn lifted_ite() {
        let mut oracle = SmtOracle::new(TermStore::default(), SatConfig::default()).unwrap();
        let store = oracle.terms().clone();
        let p = store.bool_var("p").unwrap();
        let x = store.real_var("x").unwrap();
        let choice = store.ite(p, store.int(3).unwrap(), store.int(10).unwrap()).unwrap();

        oracle.assert_hard(store.eq(x, store.to_real(choice).unwrap()).unwrap()).unwrap();
        oracle.assert_hard(store.gt(x, store.int(5).unwrap()).unwrap()).unwrap();
        assert_eq!(oracle.check_sat(&[], &mut || false).unwrap(), SatResult::Sat);

        let model = oracle.get_model().unwrap();
        assert_eq!(model.value_of(p), Some(&crate::model::Value::Bool(false)));
        assert_eq!(model.eval_rational(&store, x, false).unwrap(), numeric::rational(10));
    }
}
