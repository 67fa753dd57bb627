/*!
Enumeration of the assignments to some important atoms which extend to a model of the hard constraints.

Each assignment is blocked by a clause once found, and the blocking clauses are asserted within a checkpoint which is closed when the enumeration ends.
So, the hard constraints of the environment are unchanged by an enumeration.

Objectives play no part in an enumeration.

# Example

```rust
# use otter_omt::config::Config;
# use otter_omt::environment::Environment;
# use otter_omt::reports::Report;
let mut env = Environment::from_config(Config::default()).unwrap();
let store = env.terms().clone();

let p = store.bool_var("p").unwrap();
let q = store.bool_var("q").unwrap();
env.assert_hard(store.or(&[p, q]).unwrap()).unwrap();

let mut count = 0;
let report = env.all_sat(&[p, q], &mut |_| {
    count += 1;
    true
});

assert_eq!(report, Ok(Report::Satisfiable));
assert_eq!(count, 3);
```
*/

use std::time::Instant;

use super::GenericEnvironment;
use crate::{
    misc::log::targets,
    oracle::{checkpointed, Oracle, SatResult},
    reports::Report,
    terms::{Sort, Term},
    types::err::ErrorKind,
};

/// A callback given each assignment found by an enumeration, as pairs of an important atom and its value.
///
/// The enumeration continues while the callback returns true.
pub type CallbackAssignment<'a> = dyn FnMut(&[(Term, bool)]) -> bool + 'a;

impl<O: Oracle> GenericEnvironment<O> {
    /// Enumerates each assignment to the `important` atoms which extends to a model of the hard constraints.
    ///
    /// - [Unsatisfiable](Report::Unsatisfiable) if no assignment was found.
    /// - [Unknown](Report::Unknown) if the enumeration was interrupted or the oracle failed, though assignments found before remain reported.
    /// - [Satisfiable](Report::Satisfiable) otherwise, including when the enumeration was stopped by `callback`.
    ///
    /// # Errors
    /// - If an important term is not boolean, or belongs to another store.
    pub fn all_sat(
        &mut self,
        important: &[Term],
        callback: &mut CallbackAssignment<'_>,
    ) -> Result<Report, ErrorKind> {
        let store = self.oracle.terms().clone();
        for term in important {
            store.sort(*term)?.expect(Sort::Bool)?;
        }

        let start = Instant::now();
        let deadline = self
            .config
            .time_limit
            .value
            .and_then(|limit| start.checked_add(limit));
        let terminate_callback = &mut self.callback_terminate;
        let mut terminate = || {
            deadline.is_some_and(|deadline| Instant::now() >= deadline)
                || terminate_callback.as_mut().is_some_and(|callback| callback())
        };

        let mut found = 0;
        let result = checkpointed(&mut self.oracle, |oracle| loop {
            match oracle.check_sat(&[], &mut terminate)? {
                SatResult::Unsat => {
                    return Ok(match found {
                        0 => Report::Unsatisfiable,
                        _ => Report::Satisfiable,
                    })
                }
                SatResult::Unknown => return Ok(Report::Unknown),
                SatResult::Sat => {}
            }

            let model = oracle.get_model()?;
            let mut assignment = Vec::with_capacity(important.len());
            let mut blocking = Vec::with_capacity(important.len());
            for term in important {
                let value = model.satisfies(&store, *term)?;
                assignment.push((*term, value));
                blocking.push(match value {
                    true => store.not(*term)?,
                    false => *term,
                });
            }
            found += 1;
            log::trace!(target: targets::ENVIRONMENT, "Assignment {found}: {assignment:?}");

            if !callback(&assignment) {
                return Ok(Report::Satisfiable);
            }
            oracle.assert_hard(store.or(&blocking)?)?;
        });

        match result {
            Ok(report) => {
                log::info!(target: targets::ENVIRONMENT, "Enumerated {found} assignments: {report}");
                Ok(report)
            }
            Err(error) if crate::search::is_oracle_failure(&error) => {
                log::warn!(target: targets::ENVIRONMENT, "Oracle failure: {error}");
                Ok(Report::Unknown)
            }
            Err(error) => Err(error),
        }
    }
}
