/*!
The clause database, and the watch lists of each literal.

Each clause of two or more literals watches its first two literals.
A clause is found in the watch list of a literal when the literal is one of the first two literals of the clause, and the list is inspected when the literal is falsified.

Each watch carries a *blocker*, some literal of the clause which, if true, shows the clause is satisfied without inspecting the clause.

Unit clauses are not stored, as these are assigned directly at level zero.

Clauses may be [collected](ClauseDB::collect), after which the key of the clause is free to be reused by a later clause.
*/

use super::literal::{Atom, Literal};
use crate::types::err::{ErrorKind, SatError};

/// A key to a stored clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClauseKey(pub(crate) u32);

impl std::fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A watch on a clause from some literal.
#[derive(Clone, Copy, Debug)]
pub struct Watch {
    pub key: ClauseKey,
    pub blocker: Literal,
}

pub(crate) struct StoredClause {
    pub literals: Vec<Literal>,
    pub learnt: bool,
}

/// The clause database.
#[derive(Default)]
pub struct ClauseDB {
    pub(crate) clauses: Vec<StoredClause>,
    pub(crate) watches: Vec<Vec<Watch>>,
    original_count: usize,
    learnt_count: usize,

    /// Keys of collected clauses.
    free: Vec<ClauseKey>,
}

impl ClauseDB {
    /// Ensures watch lists exist for both literals of `atom`.
    pub fn ensure_atom(&mut self, atom: Atom) {
        let required = 2 * (atom as usize + 1);
        if self.watches.len() < required {
            self.watches.resize_with(required, Vec::default);
        }
    }

    /// Stores a clause of at least two literals, watching the first two.
    pub fn store(&mut self, literals: Vec<Literal>, learnt: bool) -> ClauseKey {
        let key = match self.free.pop() {
            Some(key) => key,
            None => {
                self.clauses.push(StoredClause {
                    literals: Vec::default(),
                    learnt,
                });
                ClauseKey(self.clauses.len() as u32 - 1)
            }
        };
        self.watches[literals[0].index()].push(Watch {
            key,
            blocker: literals[1],
        });
        self.watches[literals[1].index()].push(Watch {
            key,
            blocker: literals[0],
        });

        log::trace!(target: crate::misc::log::targets::CLAUSE_DB, "{key}: {literals:?}");

        match learnt {
            true => self.learnt_count += 1,
            false => self.original_count += 1,
        }
        self.clauses[key.0 as usize] = StoredClause { literals, learnt };
        key
    }

    /// Removes each clause for which `satisfied` holds, unless `kept` holds of the key of the clause.
    ///
    /// The watches of each removed clause are dropped, and a count of removed clauses is returned.
    pub fn collect(
        &mut self,
        satisfied: impl Fn(&[Literal]) -> bool,
        kept: impl Fn(ClauseKey) -> bool,
    ) -> usize {
        let mut removed = 0;
        for (index, clause) in self.clauses.iter_mut().enumerate() {
            let key = ClauseKey(index as u32);
            // Collected clauses are empty, and every stored clause has two or more literals.
            if clause.literals.is_empty() || kept(key) || !satisfied(&clause.literals) {
                continue;
            }
            clause.literals = Vec::default();
            self.free.push(key);
            removed += 1;
        }

        if removed > 0 {
            let clauses = &self.clauses;
            for list in self.watches.iter_mut() {
                list.retain(|watch| !clauses[watch.key.0 as usize].literals.is_empty());
            }
            log::trace!(target: crate::misc::log::targets::CLAUSE_DB, "Collected {removed} clauses");
        }
        removed
    }

    /// A count of clauses currently stored.
    pub fn live_count(&self) -> usize {
        self.clauses.len() - self.free.len()
    }

    /// The literals of the clause stored at `key`.
    pub fn get(&self, key: ClauseKey) -> Result<&[Literal], ErrorKind> {
        match self.clauses.get(key.0 as usize) {
            Some(clause) if !clause.literals.is_empty() => Ok(&clause.literals),
            _ => Err(SatError::MissingClause.into()),
        }
    }

    /// True if the clause at `key` was learnt during a solve.
    pub fn is_learnt(&self, key: ClauseKey) -> bool {
        self.clauses
            .get(key.0 as usize)
            .is_some_and(|clause| clause.learnt)
    }

    /// A count of clauses ever added to the database, not counting unit clauses.
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// A count of clauses learnt during solves, not counting unit clauses.
    pub fn learnt_count(&self) -> usize {
        self.learnt_count
    }
}
