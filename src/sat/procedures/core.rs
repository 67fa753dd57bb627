/*!
Failed assumptions.

When an assumption is found to be false, the implication graph is traversed backwards from the negation of the assumption.
Each decision met is some assumption, as assumptions are decided before any free decision, and the assumptions met together with the false assumption cannot all be true.

Literals assigned at level zero are ignored, as these follow from the clauses of the context alone.
*/

use crate::{
    misc::log::targets,
    sat::{literal::Literal, SatContext},
    types::err::ErrorKind,
};

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// The assumptions which, together with `assumption`, conflict with the clauses of the context.
    pub fn failed_assumptions_from(&mut self, assumption: Literal) -> Result<Vec<Literal>, ErrorKind> {
        let mut core = vec![assumption];
        if self.trail.decision_level() == 0 || self.trail.level_of(assumption.atom()) == 0 {
            return Ok(core);
        }

        let mut seen = std::mem::take(&mut self.seen);
        seen.resize(self.trail.atom_count(), false);
        seen[assumption.atom() as usize] = true;

        let first = self.trail.level_starts[0];
        for index in (first..self.trail.literals.len()).rev() {
            let literal = self.trail.literals[index];
            let atom = literal.atom();
            if !seen[atom as usize] {
                continue;
            }

            match self.trail.reason_of(atom) {
                None => core.push(literal),

                Some(key) => {
                    for reason_literal in &self.clause_db.get(key)?[1..] {
                        if self.trail.level_of(reason_literal.atom()) > 0 {
                            seen[reason_literal.atom() as usize] = true;
                        }
                    }
                }
            }
            seen[atom as usize] = false;
        }
        self.seen = seen;

        core.dedup();
        log::trace!(target: targets::ANALYSIS, "Failed assumptions: {core:?}");
        Ok(core)
    }
}
