/*!
Analysis of a conflict, to the first unique implication point.

See [SatContext::conflict_analysis] for the relevant context method.

# Overview

The clause in conflict is resolved with the reasons of literals assigned at the current level, in reverse order of assignment, until a single literal of the current level remains.
The resulting clause is *asserting*: after a backjump to the second highest level of the clause, every literal but the negation of the remaining literal is false, and so the clause propagates.

Literals assigned at level zero are dropped during resolution, as these hold on any valuation extending the current valuation.

Each atom met during resolution has its activity bumped.

# Invariants

- The reason for an assigned literal holds the literal at position zero.
- The clause in conflict contains some literal assigned at the current level.
*/

use crate::{
    misc::log::targets,
    sat::{clause_db::ClauseKey, literal::Literal, SatContext},
    types::err::{ErrorKind, SatError},
};

/// The result of conflict analysis.
pub struct Analysis {
    /// The asserting clause, with the asserted literal at position zero and a literal of the backjump level at position one.
    pub clause: Vec<Literal>,

    /// The level to backjump to.
    pub level: u32,
}

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// Analyses the conflict of the clause at `key` at the current level.
    pub fn conflict_analysis(&mut self, key: ClauseKey) -> Result<Analysis, ErrorKind> {
        let level = self.trail.decision_level();
        let mut seen = std::mem::take(&mut self.seen);
        seen.resize(self.trail.atom_count(), false);

        let mut clause = vec![Literal::new(0, false)];
        let mut bumped = Vec::default();
        let mut pending: usize = 0;
        let mut trail_index = self.trail.literals.len();
        let mut resolvent = key;
        let mut skip_first = false;

        let asserted = loop {
            let literals = self.clause_db.get(resolvent)?;
            let start = if skip_first { 1 } else { 0 };

            for literal in &literals[start..] {
                let atom = literal.atom();
                if !seen[atom as usize] && self.trail.level_of(atom) > 0 {
                    seen[atom as usize] = true;
                    bumped.push(atom);
                    if self.trail.level_of(atom) == level {
                        pending += 1;
                    } else {
                        clause.push(*literal);
                    }
                }
            }

            let resolved = loop {
                if trail_index == 0 {
                    self.seen = seen;
                    return Err(SatError::NoAssertion.into());
                }
                trail_index -= 1;
                let candidate = self.trail.literals[trail_index];
                if seen[candidate.atom() as usize] {
                    break candidate;
                }
            };
            seen[resolved.atom() as usize] = false;

            if pending <= 1 {
                break resolved;
            }
            pending -= 1;

            match self.trail.reason_of(resolved.atom()) {
                Some(reason) => resolvent = reason,
                None => {
                    self.seen = seen;
                    return Err(SatError::NoAssertion.into());
                }
            }
            skip_first = true;
        };

        clause[0] = asserted.negate();

        for literal in &clause[1..] {
            seen[literal.atom() as usize] = false;
        }
        self.seen = seen;

        let mut backjump_level = 0;
        if clause.len() > 1 {
            let mut max_position = 1;
            for position in 2..clause.len() {
                if self.trail.level_of(clause[position].atom())
                    > self.trail.level_of(clause[max_position].atom())
                {
                    max_position = position;
                }
            }
            clause.swap(1, max_position);
            backjump_level = self.trail.level_of(clause[1].atom());
        }

        for atom in bumped {
            self.bump_activity(atom);
        }

        log::trace!(target: targets::ANALYSIS, "Learnt {:?} from {key}, backjump to {backjump_level}", clause);

        Ok(Analysis {
            clause,
            level: backjump_level,
        })
    }

    /// Bumps the activity of `atom`, rescaling each activity if required.
    pub fn bump_activity(&mut self, atom: crate::sat::literal::Atom) {
        let bump = self.bump;
        self.activity.apply_to_index(atom as usize, |value| value + bump);
        if *self.activity.value_at(atom as usize) > 1e100 {
            self.activity.apply_to_all(|value| value * 1e-100);
            self.bump *= 1e-100;
        }
    }

    /// Decays the activity of each atom, by increasing future bumps.
    pub fn decay_activity(&mut self) {
        self.bump /= self.config.activity_decay.value;
    }
}
