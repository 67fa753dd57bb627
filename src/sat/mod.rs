/*!
The SAT core of the bundled oracle.

A conflict-driven clause-learning solver, over atoms created with [fresh_atom](SatContext::fresh_atom) and clauses added with [add_clause](SatContext::add_clause).

# Orientation

The context is split into a few structures, each a field of the context so the borrow checker may reason about each separately:
- The [trail](trail::Trail), which holds the current valuation.
- The [clause database](clause_db::ClauseDB), which holds clauses and the watch lists of each literal.
- An [activity heap](crate::generic::index_heap::IndexHeap) over atoms, used to make decisions.

A solve is a loop of [propagation](procedures::bcp), [analysis](procedures::analysis) of any conflict followed by a [backjump](procedures::backjump), and [decisions](procedures::decision) when nothing is left to propagate.

# Assumptions

A solve may be given *assumptions*, literals which are decided (in order) before any free decision.
If an assumption is found to be false, the solve returns unsatisfiable and the assumptions which led to the conflict can be read with [failed_assumptions](SatContext::failed_assumptions).
The clauses of the context are unaffected, and later solves are free to drop the failed assumptions.

```rust
# use otter_omt::sat::{Context, literal::Literal};
# use otter_omt::config::sat::SatConfig;
# use otter_omt::reports::Report;
let mut ctx = Context::from_config(SatConfig::default());
let p = ctx.fresh_atom();
let q = ctx.fresh_atom();

ctx.add_clause(vec![Literal::new(p, true), Literal::new(q, true)]).unwrap();
ctx.add_clause(vec![Literal::new(p, false), Literal::new(q, true)]).unwrap();

let assumptions = [Literal::new(q, false)];
let result = ctx.solve_given(&assumptions, &mut || false).unwrap();
assert_eq!(result, Report::Unsatisfiable);
assert_eq!(ctx.failed_assumptions(), &[Literal::new(q, false)]);

assert_eq!(ctx.solve_given(&[], &mut || false).unwrap(), Report::Satisfiable);
assert_eq!(ctx.value_of(q), Some(true));
```
*/

pub mod clause_db;
pub mod counters;
pub mod literal;
pub mod procedures;
pub mod trail;

use std::collections::HashSet;

use clause_db::ClauseDB;
use counters::Counters;
use literal::{Atom, Literal};
use trail::Trail;

use crate::{
    config::sat::SatConfig,
    generic::{index_heap::IndexHeap, random::MinimalPCG32},
    misc::log::targets,
    reports::Report,
    types::err::ErrorKind,
};

/// The state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// Clauses may be added, and no solve has completed since.
    Input,

    /// The most recent solve found the clauses (and assumptions) satisfiable, and the valuation remains.
    Satisfiable,

    /// The clauses of the context are unsatisfiable, regardless of assumptions.
    Unsatisfiable,
}

/// A SAT context, generic over a source of randomness.
pub struct SatContext<R: rand::Rng + std::default::Default> {
    pub config: SatConfig,

    pub counters: Counters,

    pub(crate) trail: Trail,

    pub(crate) clause_db: ClauseDB,

    /// Activity of each atom.
    pub(crate) activity: IndexHeap<f64>,

    /// The amount added to the activity of an atom when bumped.
    pub(crate) bump: f64,

    /// The most recent value of each atom.
    pub(crate) phases: Vec<bool>,

    /// Marks used during analysis.
    pub(crate) seen: Vec<bool>,

    /// The failed assumptions of the most recent solve.
    pub(crate) failed: Vec<Literal>,

    pub(crate) rng: R,

    pub state: ContextState,
}

/// A context which uses [MinimalPCG32] as a source of randomness.
pub type Context = SatContext<MinimalPCG32>;

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// A context with the given configuration.
    pub fn from_config(config: SatConfig) -> Self {
        SatContext {
            config,
            counters: Counters::default(),
            trail: Trail::default(),
            clause_db: ClauseDB::default(),
            activity: IndexHeap::default(),
            bump: 1.0,
            phases: Vec::default(),
            seen: Vec::default(),
            failed: Vec::default(),
            rng: R::default(),
            state: ContextState::Input,
        }
    }

    /// A fresh atom.
    pub fn fresh_atom(&mut self) -> Atom {
        let atom = self.trail.atom_count() as Atom;
        self.trail.ensure_atom(atom);
        self.clause_db.ensure_atom(atom);
        self.activity.add(atom as usize, 0.0);
        self.activity.activate(atom as usize);

        let initial_phase = self.rng.random_bool(self.config.polarity_lean.value);
        self.phases.push(initial_phase);
        self.seen.push(false);
        atom
    }

    /// A count of atoms in the context.
    pub fn atom_count(&self) -> usize {
        self.trail.atom_count()
    }

    /// Adds a clause to the context.
    ///
    /// The context is returned to level zero, duplicate literals are removed, and tautologies are ignored.
    /// Literals false at level zero are removed, and if no literal remains the context is unsatisfiable.
    pub fn add_clause(&mut self, clause: Vec<Literal>) -> Result<(), ErrorKind> {
        self.backjump(0);
        if self.state == ContextState::Unsatisfiable {
            return Ok(());
        }
        self.state = ContextState::Input;

        let mut clause = clause;
        for literal in &clause {
            while self.trail.atom_count() <= literal.atom() as usize {
                self.fresh_atom();
            }
        }
        clause.sort_unstable();
        clause.dedup();

        // Sorted, so complementary literals are adjacent.
        if clause.windows(2).any(|pair| pair[0].atom() == pair[1].atom()) {
            return Ok(());
        }

        if clause
            .iter()
            .any(|literal| self.trail.value_of(*literal) == Some(true))
        {
            return Ok(());
        }
        clause.retain(|literal| self.trail.value_of(*literal).is_none());

        match clause.len() {
            0 => {
                log::trace!(target: targets::CLAUSE_DB, "Empty clause at level zero");
                self.state = ContextState::Unsatisfiable;
            }

            1 => {
                self.trail.assign(clause[0], None);
                if self.bcp().is_some() {
                    log::trace!(target: targets::PROPAGATION, "Conflict from unit {}", clause[0]);
                    self.state = ContextState::Unsatisfiable;
                }
            }

            _ => {
                self.clause_db.store(clause, false);
            }
        }
        Ok(())
    }

    /// Removes each stored clause satisfied at level zero, returning a count of the clauses removed.
    ///
    /// Clauses which are the reason for some assignment at level zero are kept.
    pub fn collect_satisfied(&mut self) -> usize {
        self.backjump(0);
        if self.state == ContextState::Unsatisfiable {
            return 0;
        }
        self.state = ContextState::Input;

        let trail = &self.trail;
        let reasons = trail
            .literals
            .iter()
            .filter_map(|literal| trail.reason_of(literal.atom()))
            .collect::<HashSet<_>>();

        let removed = self.clause_db.collect(
            |clause| clause.iter().any(|literal| trail.value_of(*literal) == Some(true)),
            |key| reasons.contains(&key),
        );
        self.counters.collected_clauses += removed;
        removed
    }

    /// The value of `atom` on the current valuation.
    ///
    /// After a satisfiable solve, the current valuation is a satisfying valuation.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        match (atom as usize) < self.trail.atom_count() {
            true => self.trail.value_of_atom(atom),
            false => None,
        }
    }

    /// The value of `literal` on the current valuation.
    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.value_of(literal.atom())
            .map(|value| value == literal.polarity())
    }

    /// The assumptions responsible for the most recent unsatisfiable solve, if any.
    pub fn failed_assumptions(&self) -> &[Literal] {
        &self.failed
    }

    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        self.state.into()
    }
}
