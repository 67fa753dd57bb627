/*!
Terms, and the store in which terms are interned.

A [Term] is a small copyable handle to a [Node] interned in a [TermStore].
Interning is structural, so building the same term twice gives the same handle:

```rust
# use otter_omt::terms::TermStore;
let store = TermStore::default();
let x = store.int_var("x").unwrap();
let five = store.int(5).unwrap();

assert_eq!(store.le(x, five).unwrap(), store.le(x, five).unwrap());
assert_ne!(store.le(x, five).unwrap(), store.le(five, x).unwrap());
```

A store is shared by each [environment](crate::environment) created from it, and a store handle may be cloned freely.
Terms of one store are rejected by another with an [invalid handle](crate::types::err::HandleError::ForeignTerm) error.

Integer and real arithmetic may be mixed, and the result of mixed arithmetic is real.
Products are permitted between any numeric terms, though the [bundled oracle](crate::oracle::SmtOracle) only decides products with at most one non-constant factor.
*/

mod builder;
mod display;
mod node;
mod sort;

pub use node::{Node, Op};
pub use sort::Sort;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use crate::types::err::{ErrorKind, HandleError, TypeError};

/// A source of distinct store identifiers.
static STORE_COUNT: AtomicU32 = AtomicU32::new(0);

/// A handle to an interned term.
///
/// Terms are ordered by the store they belong to, and then by creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    store: u32,
    index: u32,
}

impl Term {
    /// The position of the term in its store.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// The interned nodes of a store.
#[derive(Default)]
struct TermTable {
    nodes: Vec<Node>,
    interned: HashMap<Node, u32>,
    symbols: HashMap<String, u32>,
}

/// A shared store of terms.
#[derive(Clone)]
pub struct TermStore {
    id: u32,
    table: Arc<Mutex<TermTable>>,
}

impl Default for TermStore {
    fn default() -> Self {
        TermStore {
            id: STORE_COUNT.fetch_add(1, Ordering::Relaxed),
            table: Arc::new(Mutex::new(TermTable::default())),
        }
    }
}

impl std::fmt::Debug for TermStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermStore({})", self.id)
    }
}

impl TermStore {
    /// Lock the table.
    ///
    /// Each lock is held for the duration of a single operation, and no operation panics while holding the lock, so a poisoned lock is recovered.
    fn table(&self) -> MutexGuard<'_, TermTable> {
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True if `other` is a handle to the same store.
    pub fn same_store(&self, other: &TermStore) -> bool {
        self.id == other.id
    }

    /// An error unless `term` belongs to the store.
    pub fn check(&self, term: Term) -> Result<(), ErrorKind> {
        if term.store != self.id {
            return Err(HandleError::ForeignTerm.into());
        }
        match term.index() < self.table().nodes.len() {
            true => Ok(()),
            false => Err(HandleError::UnknownTerm.into()),
        }
    }

    /// A copy of the node of `term`.
    pub fn node(&self, term: Term) -> Result<Node, ErrorKind> {
        if term.store != self.id {
            return Err(HandleError::ForeignTerm.into());
        }
        match self.table().nodes.get(term.index()) {
            Some(node) => Ok(node.clone()),
            None => Err(HandleError::UnknownTerm.into()),
        }
    }

    /// The sort of `term`.
    pub fn sort(&self, term: Term) -> Result<Sort, ErrorKind> {
        if term.store != self.id {
            return Err(HandleError::ForeignTerm.into());
        }
        match self.table().nodes.get(term.index()) {
            Some(node) => Ok(node.sort),
            None => Err(HandleError::UnknownTerm.into()),
        }
    }

    /// The count of terms in the store.
    pub fn count(&self) -> usize {
        self.table().nodes.len()
    }

    /// Declares a symbol `name` of sort `sort`, or returns the existing symbol of the same name and sort.
    pub fn declare(&self, name: &str, sort: Sort) -> Result<Term, ErrorKind> {
        if sort.width() == Some(0) {
            return Err(TypeError::ZeroWidth.into());
        }

        let mut table = self.table();
        if let Some(&index) = table.symbols.get(name) {
            let declared = table.nodes[index as usize].sort;
            return match declared == sort {
                true => Ok(Term {
                    store: self.id,
                    index,
                }),
                false => Err(TypeError::Redeclaration {
                    name: name.to_string(),
                    declared,
                    requested: sort,
                }
                .into()),
            };
        }

        let node = Node {
            op: Op::Symbol(name.to_string()),
            args: Vec::default(),
            sort,
        };
        let term = Self::intern_locked(self.id, &mut table, node);
        table.symbols.insert(name.to_string(), term.index);
        Ok(term)
    }

    /// Declares a symbol of sort `sort` with a name not yet used, `base` if possible and otherwise `base_n` for the least fresh `n`.
    pub fn fresh_symbol(&self, base: &str, sort: Sort) -> Result<Term, ErrorKind> {
        let name = {
            let table = self.table();
            match table.symbols.contains_key(base) {
                false => base.to_string(),
                true => (0..)
                    .map(|n| format!("{base}_{n}"))
                    .find(|name| !table.symbols.contains_key(name))
                    .unwrap_or_default(),
            }
        };
        self.declare(&name, sort)
    }

    /// The symbol declared with `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Term> {
        self.table().symbols.get(name).map(|&index| Term {
            store: self.id,
            index,
        })
    }

    /// The name of `term`, if `term` is a symbol.
    pub fn name_of(&self, term: Term) -> Option<String> {
        match self.node(term) {
            Ok(Node {
                op: Op::Symbol(name),
                ..
            }) => Some(name),
            _ => None,
        }
    }

    /// True if no symbol occurs in `term`.
    pub fn is_ground(&self, term: Term) -> Result<bool, ErrorKind> {
        let mut todo = vec![term];
        while let Some(next) = todo.pop() {
            let node = self.node(next)?;
            if let Op::Symbol(_) = node.op {
                return Ok(false);
            }
            todo.extend(node.args);
        }
        Ok(true)
    }

    /// Every declared symbol, in order of declaration.
    pub fn symbols(&self) -> Vec<(String, Term, Sort)> {
        let table = self.table();
        let mut symbols = table
            .symbols
            .iter()
            .map(|(name, &index)| {
                (
                    name.clone(),
                    Term {
                        store: self.id,
                        index,
                    },
                    table.nodes[index as usize].sort,
                )
            })
            .collect::<Vec<_>>();
        symbols.sort_by_key(|(_, term, _)| *term);
        symbols
    }

    /// Interns `op` applied to `args`, inferring the sort of the result.
    pub(crate) fn make(&self, op: Op, args: Vec<Term>) -> Result<Term, ErrorKind> {
        let mut table = self.table();
        let mut sorts = Vec::with_capacity(args.len());
        for arg in &args {
            if arg.store != self.id {
                return Err(HandleError::ForeignTerm.into());
            }
            match table.nodes.get(arg.index()) {
                Some(node) => sorts.push(node.sort),
                None => return Err(HandleError::UnknownTerm.into()),
            }
        }
        let sort = node::infer(&op, &sorts)?;
        Ok(Self::intern_locked(self.id, &mut table, Node { op, args, sort }))
    }

    /// Interns a constant of the given sort.
    pub(crate) fn make_constant(&self, op: Op, sort: Sort) -> Term {
        let mut table = self.table();
        Self::intern_locked(
            self.id,
            &mut table,
            Node {
                op,
                args: Vec::default(),
                sort,
            },
        )
    }

    fn intern_locked(id: u32, table: &mut TermTable, node: Node) -> Term {
        if let Some(&index) = table.interned.get(&node) {
            return Term { store: id, index };
        }
        let index = table.nodes.len() as u32;
        table.nodes.push(node.clone());
        table.interned.insert(node, index);
        Term { store: id, index }
    }
}
