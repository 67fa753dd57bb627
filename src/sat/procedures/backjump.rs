/*!
Backjumping, to some lower decision level.

Each atom unassigned by the backjump returns to the activity heap, and if phase saving is enabled the value of the atom is noted as the phase of the atom.
*/

use crate::{misc::log::targets, sat::SatContext};

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// Removes each assignment made above `level`.
    pub fn backjump(&mut self, level: u32) {
        if self.trail.decision_level() <= level {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {level}", self.trail.decision_level());

        for literal in self.trail.backtrack(level) {
            let atom = literal.atom() as usize;
            self.phases[atom] = literal.polarity();
            self.activity.activate(atom);
        }
    }
}
