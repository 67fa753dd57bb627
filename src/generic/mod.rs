//! Generic structures, not specific to optimization.

pub mod index_heap;
pub mod luby;
pub mod random;
