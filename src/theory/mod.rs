//! Theory solvers of the bundled oracle.
//!
//! - [arith], a bounded simplex over linear integer and real arithmetic, with support for optimization.
//! - [bv], the lowering of a fragment of bit-vectors to bounded integers.

pub mod arith;
pub mod bv;
