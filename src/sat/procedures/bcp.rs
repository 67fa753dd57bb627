/*!
Boolean constraint propagation.

See [SatContext::bcp] for the relevant context method.

# Overview

Each literal on the trail which has not been propagated is taken in turn, and the clauses watching the negation of the literal are examined.
For each clause, one of:
- The blocker, or the other watched literal, is true, and nothing is done.
- Some unwatched literal is not false, and the watch moves to that literal.
- The other watched literal has no value, and is assigned true with the clause as the reason.
- The other watched literal is false, and the clause is a conflict.

# Complications

The watch list under examination is taken from the database for the duration of the examination, and returned after.
This keeps the borrow of the list separate from the borrow of the clauses, and from pushes to the watch lists of other literals.
No watch is pushed to the taken list during the examination, as a new watch is only placed on a literal which is not false, and the negation of a propagated literal is false.
*/

use crate::{
    misc::log::targets,
    sat::{
        clause_db::{ClauseKey, Watch},
        SatContext,
    },
};

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// Propagates each queued literal, returning the key of a conflicting clause if a conflict is found.
    ///
    /// On a conflict the queue is cleared.
    pub fn bcp(&mut self) -> Option<ClauseKey> {
        while self.trail.q_head < self.trail.literals.len() {
            let literal = self.trail.literals[self.trail.q_head];
            self.trail.q_head += 1;
            self.counters.propagations += 1;

            let falsified = literal.negate();
            let mut watches = std::mem::take(&mut self.clause_db.watches[falsified.index()]);
            let mut kept = 0;
            let mut conflict = None;

            let mut index = 0;
            while index < watches.len() {
                let watch = watches[index];
                index += 1;

                if self.trail.value_of(watch.blocker) == Some(true) {
                    watches[kept] = watch;
                    kept += 1;
                    continue;
                }

                let clause = &mut self.clause_db.clauses[watch.key.0 as usize].literals;
                if clause[0] == falsified {
                    clause.swap(0, 1);
                }
                let other = clause[0];

                if other != watch.blocker && self.trail.value_of(other) == Some(true) {
                    watches[kept] = Watch {
                        key: watch.key,
                        blocker: other,
                    };
                    kept += 1;
                    continue;
                }

                let mut moved = false;
                for position in 2..clause.len() {
                    if self.trail.value_of(clause[position]) != Some(false) {
                        clause.swap(1, position);
                        self.clause_db.watches[clause[1].index()].push(Watch {
                            key: watch.key,
                            blocker: other,
                        });
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue;
                }

                watches[kept] = Watch {
                    key: watch.key,
                    blocker: other,
                };
                kept += 1;

                match self.trail.value_of(other) {
                    Some(false) => {
                        log::trace!(target: targets::PROPAGATION, "Conflict on {} from {literal}", watch.key);
                        conflict = Some(watch.key);
                        while index < watches.len() {
                            watches[kept] = watches[index];
                            kept += 1;
                            index += 1;
                        }
                        break;
                    }

                    Some(true) => {}

                    None => {
                        log::trace!(target: targets::PROPAGATION, "{other} from {}", watch.key);
                        self.trail.assign(other, Some(watch.key));
                    }
                }
            }

            watches.truncate(kept);
            self.clause_db.watches[falsified.index()] = watches;

            if conflict.is_some() {
                self.trail.q_head = self.trail.literals.len();
                return conflict;
            }
        }
        None
    }
}
