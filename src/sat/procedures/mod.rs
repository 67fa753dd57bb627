//! Procedures of the SAT core, each implemented as methods on a [SatContext](crate::sat::SatContext).

pub mod analysis;
pub mod backjump;
pub mod bcp;
pub mod core;
pub mod decision;
pub mod solve;
