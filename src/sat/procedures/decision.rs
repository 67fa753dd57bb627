/*!
Methods for choosing the value of an atom.

# Overview

The atom chosen is the most active atom without a value, taken from the activity heap.
As atoms are only returned to the heap on a backjump, atoms with a value may be found on the heap and are discarded.

With some probability, set by [random_decision_bias](crate::config::sat::SatConfig::random_decision_bias), an arbitrary atom without a value is chosen instead.

The value is the saved phase of the atom if phase saving is enabled, and otherwise is chosen with probability given by [polarity_lean](crate::config::sat::SatConfig::polarity_lean).
*/

use crate::sat::{
    literal::{Atom, Literal},
    SatContext,
};

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// A decision, as a literal, or None if every atom has a value.
    pub fn make_decision(&mut self) -> Option<Literal> {
        let atom = match self.random_atom() {
            Some(atom) => atom,
            None => self.most_active_atom()?,
        };

        let polarity = match self.config.phase_saving.value {
            true => self.phases[atom as usize],
            false => self.rng.random_bool(self.config.polarity_lean.value),
        };

        self.counters.total_decisions += 1;
        Some(Literal::new(atom, polarity))
    }

    fn most_active_atom(&mut self) -> Option<Atom> {
        while let Some(index) = self.activity.pop_max() {
            if self.trail.value_of_atom(index as Atom).is_none() {
                return Some(index as Atom);
            }
        }
        None
    }

    fn random_atom(&mut self) -> Option<Atom> {
        let bias = self.config.random_decision_bias.value;
        let count = self.trail.atom_count();
        if bias <= 0.0 || count == 0 {
            return None;
        }

        // The rng is taken to avoid a borrow of the context.
        let mut rng = std::mem::take(&mut self.rng);
        let mut chosen = None;
        if rng.random_bool(bias) {
            let start = rng.random_range(0..count);
            chosen = (0..count)
                .map(|offset| ((start + offset) % count) as Atom)
                .find(|atom| self.trail.value_of_atom(*atom).is_none());
        }
        self.rng = rng;
        chosen
    }
}
