//! Boxed optimization, each objective in isolation.

use crate::{
    objective::{Prepared, SearchState},
    oracle::Oracle,
    search::{self, Session},
    types::err::ErrorKind,
};

/// Optimizes each of `tasks` independently.
///
/// As each search retracts any assertion made during the search, the optimum of one objective does not bound another.
pub fn solve<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    tasks: &[Prepared],
) -> Result<Vec<SearchState>, ErrorKind> {
    let mut states = Vec::with_capacity(tasks.len());
    for task in tasks {
        states.push(search::optimize(session, task)?);
    }
    Ok(states)
}
