//! The current valuation, as a trail of assigned literals separated into decision levels.

use super::{
    clause_db::ClauseKey,
    literal::{Atom, Literal},
};

#[derive(Default)]
pub struct Trail {
    values: Vec<Option<bool>>,
    levels: Vec<u32>,
    reasons: Vec<Option<ClauseKey>>,

    /// Assigned literals, in order of assignment.
    pub(crate) literals: Vec<Literal>,

    /// The index on the trail of the first literal of each level above zero.
    pub(crate) level_starts: Vec<usize>,

    /// The index of the next literal to propagate.
    pub(crate) q_head: usize,
}

impl Trail {
    pub fn ensure_atom(&mut self, atom: Atom) {
        let required = atom as usize + 1;
        if self.values.len() < required {
            self.values.resize(required, None);
            self.levels.resize(required, 0);
            self.reasons.resize(required, None);
        }
    }

    pub fn atom_count(&self) -> usize {
        self.values.len()
    }

    pub fn value_of_atom(&self, atom: Atom) -> Option<bool> {
        self.values[atom as usize]
    }

    /// The value of `literal`, if the atom of `literal` has a value.
    pub fn value_of(&self, literal: Literal) -> Option<bool> {
        self.values[literal.atom() as usize].map(|value| value == literal.polarity())
    }

    pub fn level_of(&self, atom: Atom) -> u32 {
        self.levels[atom as usize]
    }

    pub fn reason_of(&self, atom: Atom) -> Option<ClauseKey> {
        self.reasons[atom as usize]
    }

    pub fn decision_level(&self) -> u32 {
        self.level_starts.len() as u32
    }

    pub fn new_level(&mut self) {
        self.level_starts.push(self.literals.len());
    }

    /// Assigns `literal` at the current level, queued for propagation.
    pub fn assign(&mut self, literal: Literal, reason: Option<ClauseKey>) {
        let atom = literal.atom() as usize;
        self.values[atom] = Some(literal.polarity());
        self.levels[atom] = self.decision_level();
        self.reasons[atom] = reason;
        self.literals.push(literal);
    }

    /// Removes each assignment above `level`, returning the removed literals.
    pub fn backtrack(&mut self, level: u32) -> Vec<Literal> {
        if self.decision_level() <= level {
            return Vec::default();
        }
        let start = self.level_starts[level as usize];
        let removed = self.literals.split_off(start);
        for literal in &removed {
            let atom = literal.atom() as usize;
            self.values[atom] = None;
            self.reasons[atom] = None;
        }
        self.level_starts.truncate(level as usize);
        self.q_head = self.q_head.min(self.literals.len());
        removed
    }
}
