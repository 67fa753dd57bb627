/*!
The bundled oracle, a lazy combination of the [SAT core](crate::sat) with the [simplex](crate::theory::arith::simplex).

# Overview

Boolean structure is encoded to clauses by definitions, with a fresh atom for each connective, and each arithmetic comparison is normalized to a bound on a row of the simplex and given an atom.
A check then alternates between:
- A solve of the SAT core, which fixes a value for every atom.
- A check of the bounds given by the values of arithmetic atoms.

If the bounds are inconsistent, the explanation from the simplex is negated and added as a clause, and the SAT core solves again.
If an integer variable has a fractional value, a fresh atom `x ≤ ⌊v⌋` is introduced, and the SAT core is left to decide the branch.

# Checkpoints

Each checkpoint has a *selector* atom.
An assertion within a checkpoint is added as a clause guarded by the selector of the checkpoint, and each check assumes the selector of every open checkpoint.
Closing a checkpoint asserts the negation of the selector, which satisfies each guarded clause.

Definitions of connectives and lemmas from the theory do not depend on any assertion, and so are added without a guard.

Every [COLLECTION_INTERVAL] closed checkpoints, the clauses satisfied by the negated selectors are removed from the SAT core, together with any other clause satisfied at level zero.
Atoms are kept, as the encoding of each term is cached and reused by later assertions, and so the count of atoms grows with the count of distinct terms asserted.

# Limitations

- Products are linear: at most one factor of a product may be non-constant, and divisors are constant.
- Floating point terms are not supported, and assertions involving floating point comparisons are rejected.
- Bit-vectors are limited to comparison, equality, and if-then-else, see [bv](crate::theory::bv).
*/

mod encode;

use std::collections::HashMap;

use num::Zero;

use crate::{
    config::sat::SatConfig,
    misc::log::targets,
    model::{self, Model, Value},
    numeric::{self, delta::DeltaRational, Rational},
    oracle::{LocalGoal, LocalOptimum, Oracle, SatResult},
    reports::Report,
    sat::{
        literal::{Atom, Literal},
        Context,
    },
    terms::{Sort, Term, TermStore},
    theory::{
        arith::{
            linear::LinearExpr,
            simplex::{Explanation, Optimum, Simplex, VarId},
            BoundKind,
        },
        bv::BvVars,
    },
    types::err::{ErrorKind, StateError},
};

/// A count of closed checkpoints between collections of satisfied clauses.
pub const COLLECTION_INTERVAL: usize = 64;

/// An atom of the SAT core which stands for a bound on a simplex variable.
#[derive(Clone, Debug)]
pub(crate) struct TheoryAtom {
    atom: Atom,
    var: VarId,
    kind: BoundKind,
    bound: Rational,
    integral: bool,
}

impl TheoryAtom {
    /// The bound asserted when the atom has `value`.
    fn bound_given(&self, value: bool) -> (BoundKind, DeltaRational) {
        let one = Rational::from_integer(1.into());
        match (value, self.kind, self.integral) {
            (true, kind, _) => (kind, DeltaRational::from(self.bound.clone())),
            (false, BoundKind::Upper, true) => (BoundKind::Lower, (&self.bound + &one).into()),
            (false, BoundKind::Lower, true) => (BoundKind::Upper, (&self.bound - &one).into()),
            (false, BoundKind::Upper, false) => (
                BoundKind::Lower,
                DeltaRational::new(self.bound.clone(), one),
            ),
            (false, BoundKind::Lower, false) => {
                (BoundKind::Upper, DeltaRational::new(self.bound.clone(), -one))
            }
        }
    }
}

enum TheoryCheck {
    Consistent,
    Conflict(Explanation),
    Branch(VarId),
}

/// The result of the most recent check.
enum LastCheck {
    None,
    Sat(Model),
    Unsat(Vec<Term>),
    Unknown,
}

/// Counts for the oracle.
#[derive(Clone, Debug, Default)]
pub struct OracleCounters {
    /// A count of checks.
    pub checks: usize,

    /// A count of lemmas added from conflicts of the simplex.
    pub theory_conflicts: usize,

    /// A count of branches on fractional integer variables.
    pub branches: usize,

    /// A count of checkpoints closed.
    pub pops: usize,
}

/// The bundled oracle.
pub struct SmtOracle {
    store: TermStore,
    sat: Context,
    simplex: Simplex,

    /// A literal fixed to true.
    top: Literal,

    /// The selector of each open checkpoint.
    selectors: Vec<Literal>,

    /// Boolean terms with an encoding.
    literals: HashMap<Term, Literal>,

    /// Boolean symbols, and their atoms.
    bool_symbols: HashMap<Term, Atom>,

    /// Numeric symbols and lifted terms, and their simplex variables.
    numeric_vars: HashMap<Term, VarId>,

    /// Bit-vector symbols and lifted terms, and their simplex variables.
    bv_vars: HashMap<Term, BvVars>,

    /// Normalized rows, and their simplex variables.
    rows: HashMap<Vec<(VarId, Rational)>, VarId>,

    theory_atoms: Vec<TheoryAtom>,

    /// Theory atoms by variable, direction, and bound.
    atom_index: HashMap<(VarId, BoundKind, Rational), Atom>,

    last: LastCheck,

    pub counters: OracleCounters,
}

impl SmtOracle {
    /// An oracle for terms of `store`, with the given configuration of the SAT core.
    pub fn new(store: TermStore, config: SatConfig) -> Result<Self, ErrorKind> {
        let mut sat = Context::from_config(config);
        let top = Literal::new(sat.fresh_atom(), true);
        sat.add_clause(vec![top])?;

        Ok(SmtOracle {
            store,
            sat,
            simplex: Simplex::default(),
            top,
            selectors: Vec::default(),
            literals: HashMap::default(),
            bool_symbols: HashMap::default(),
            numeric_vars: HashMap::default(),
            bv_vars: HashMap::default(),
            rows: HashMap::default(),
            theory_atoms: Vec::default(),
            atom_index: HashMap::default(),
            last: LastCheck::None,
            counters: OracleCounters::default(),
        })
    }

    /// Adds `clause`, guarded by the selector of the current checkpoint if any.
    fn add_guarded(&mut self, clause: Vec<Literal>) -> Result<(), ErrorKind> {
        let mut clause = clause;
        if let Some(selector) = self.selectors.last() {
            clause.push(selector.negate());
        }
        self.sat.add_clause(clause)
    }

    /// Asserts the bounds of each arithmetic atom and checks the simplex.
    fn theory_check(&mut self) -> TheoryCheck {
        self.simplex.reset_bounds();

        for theory_atom in &self.theory_atoms {
            let Some(value) = self.sat.value_of(theory_atom.atom) else {
                continue;
            };
            let (kind, bound) = theory_atom.bound_given(value);
            let reason = Literal::new(theory_atom.atom, value);
            if let Err(explanation) = self.simplex.assert_bound(theory_atom.var, kind, bound, reason) {
                return TheoryCheck::Conflict(explanation);
            }
        }

        if let Err(explanation) = self.simplex.check() {
            return TheoryCheck::Conflict(explanation);
        }

        match self.simplex.fractional_vars().next() {
            Some(var) => TheoryCheck::Branch(var),
            None => TheoryCheck::Consistent,
        }
    }

    /// Introduces the atom `var ≤ ⌊v⌋` for the fractional value `v` of `var`.
    fn branch(&mut self, var: VarId) -> Result<(), ErrorKind> {
        let value = self.simplex.value(var);
        let floor = match value.real.is_integer() {
            true if value.delta < Rational::zero() => &value.real - Rational::from_integer(1.into()),
            true => value.real.clone(),
            false => Rational::from_integer(numeric::floor(&value.real)),
        };
        log::trace!(target: targets::ORACLE, "Branch on {var} at {}", numeric::format_rational(&floor));
        self.counters.branches += 1;
        self.atom_for(var, BoundKind::Upper, floor, true);
        Ok(())
    }

    /// A model from the current valuation of the SAT core and the values of the simplex.
    fn build_model(&self) -> Model {
        let delta = self.simplex.delta_witness();
        let mut model = Model::default();

        for (name, symbol, sort) in self.store.symbols() {
            let value = match sort {
                Sort::Bool => self
                    .bool_symbols
                    .get(&symbol)
                    .and_then(|atom| self.sat.value_of(*atom))
                    .map(Value::Bool),

                Sort::Int => self.numeric_vars.get(&symbol).map(|var| {
                    let value = self.simplex.value(*var).concretize(&delta);
                    Value::Int(numeric::floor(&value))
                }),

                Sort::Real => self
                    .numeric_vars
                    .get(&symbol)
                    .map(|var| Value::Real(self.simplex.value(*var).concretize(&delta))),

                Sort::BitVector(width) => self.bv_vars.get(&symbol).map(|vars| {
                    let value = self.simplex.value(vars.unsigned).concretize(&delta);
                    Value::BitVector {
                        value: model::bv_bits(&numeric::floor(&value), width),
                        width,
                    }
                }),

                Sort::Float { .. } => None,
            };
            model.assign(symbol, name, value.unwrap_or(Value::default_of(sort)));
        }
        model
    }

    /// The linear value of the goal, if the goal has been encoded.
    fn goal_value(&mut self, goal: &LocalGoal) -> Result<Option<LinearExpr>, ErrorKind> {
        if !self.is_encoded(goal.term)? {
            return Ok(None);
        }
        match self.store.sort(goal.term)? {
            Sort::BitVector(_) => Ok(Some(self.bv_value(goal.term, goal.signed)?)),
            _ => Ok(Some(self.linear(goal.term)?)),
        }
    }
}

impl Oracle for SmtOracle {
    fn terms(&self) -> &TermStore {
        &self.store
    }

    fn push(&mut self) -> Result<(), ErrorKind> {
        let selector = Literal::new(self.sat.fresh_atom(), true);
        self.selectors.push(selector);
        log::trace!(target: targets::ORACLE, "Push to {}", self.selectors.len());
        Ok(())
    }

    fn pop(&mut self) -> Result<(), ErrorKind> {
        let Some(selector) = self.selectors.pop() else {
            return Err(StateError::NoCheckpoint.into());
        };
        self.last = LastCheck::None;
        log::trace!(target: targets::ORACLE, "Pop to {}", self.selectors.len());
        self.sat.add_clause(vec![selector.negate()])?;

        self.counters.pops += 1;
        if self.counters.pops % COLLECTION_INTERVAL == 0 {
            let removed = self.sat.collect_satisfied();
            log::debug!(target: targets::ORACLE, "Collected {removed} clauses");
        }
        Ok(())
    }

    fn depth(&self) -> usize {
        self.selectors.len()
    }

    fn assert_hard(&mut self, term: Term) -> Result<(), ErrorKind> {
        self.store.sort(term)?.expect(Sort::Bool)?;
        self.last = LastCheck::None;
        let literal = self.encode(term)?;
        self.add_guarded(vec![literal])
    }

    fn check_sat(
        &mut self,
        assumptions: &[Term],
        terminate: &mut dyn FnMut() -> bool,
    ) -> Result<SatResult, ErrorKind> {
        self.last = LastCheck::None;
        self.counters.checks += 1;

        let mut assumed = self.selectors.clone();
        let mut origins: HashMap<Literal, Vec<Term>> = HashMap::default();
        for term in assumptions {
            self.store.sort(*term)?.expect(Sort::Bool)?;
            let literal = self.encode(*term)?;
            origins.entry(literal).or_default().push(*term);
            assumed.push(literal);
        }

        loop {
            match self.sat.solve_given(&assumed, terminate)? {
                Report::Unknown => {
                    self.last = LastCheck::Unknown;
                    return Ok(SatResult::Unknown);
                }

                Report::Unsatisfiable => {
                    let mut core = Vec::default();
                    for literal in self.sat.failed_assumptions() {
                        if let Some(terms) = origins.get(literal) {
                            core.extend(terms.iter().copied());
                        }
                    }
                    core.sort();
                    core.dedup();
                    self.last = LastCheck::Unsat(core);
                    return Ok(SatResult::Unsat);
                }

                Report::Satisfiable => match self.theory_check() {
                    TheoryCheck::Consistent => {
                        self.last = LastCheck::Sat(self.build_model());
                        return Ok(SatResult::Sat);
                    }

                    TheoryCheck::Conflict(explanation) => {
                        self.counters.theory_conflicts += 1;
                        let lemma = explanation.iter().map(|literal| literal.negate()).collect();
                        self.sat.add_clause(lemma)?;
                    }

                    TheoryCheck::Branch(var) => self.branch(var)?,
                },
            }
        }
    }

    fn get_model(&self) -> Result<Model, ErrorKind> {
        match &self.last {
            LastCheck::Sat(model) => Ok(model.clone()),
            _ => Err(StateError::NoModel.into()),
        }
    }

    fn unsat_core(&self) -> Result<Vec<Term>, ErrorKind> {
        match &self.last {
            LastCheck::Unsat(core) => Ok(core.clone()),
            _ => Err(StateError::NoCore.into()),
        }
    }

    fn optimize_local(&mut self, goal: &LocalGoal) -> Result<LocalOptimum, ErrorKind> {
        let model_value = match &self.last {
            LastCheck::Sat(model) => model.eval_rational(&self.store, goal.term, goal.signed)?,
            _ => return Err(StateError::NoModel.into()),
        };
        let fallback = LocalOptimum::Bounded(model_value.into());

        let Some(expr) = self.goal_value(goal)? else {
            return Ok(fallback);
        };
        if expr.is_constant() {
            return Ok(LocalOptimum::Bounded(expr.constant.into()));
        }

        let var = self.row_var(&expr.coefficients, false);
        let constant = DeltaRational::from(expr.constant.clone());

        match self.simplex.optimize(var, goal.minimize) {
            Optimum::Unbounded => Ok(LocalOptimum::Unbounded),

            Optimum::Bounded(value) => {
                if self.simplex.fractional_vars().next().is_some() {
                    return Ok(fallback);
                }
                self.last = LastCheck::Sat(self.build_model());
                Ok(LocalOptimum::Bounded(&value + &constant))
            }
        }
    }
}
