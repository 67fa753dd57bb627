//! A library for the optimization of objectives modulo theories, with support for incremental solves.
//!
//! otter_omt minimizes and maximizes terms over linear integer and real arithmetic and bit-vectors, subject to hard constraints, through repeated calls to a decision oracle.
//! Multiple objectives may be combined by a boxed, lexicographic, or Pareto priority, and weighted soft constraints may be minimized as MaxSMT objectives.
//!
//! # Orientation
//!
//! The library is designed around the core structure of an [environment].
//!
//! Environments are built with a [configuration](config), and own a [decision oracle](oracle) over a shared [store of terms](terms).
//! Hard and soft constraints are asserted within checkpoints, and [objectives](objective) are created from goals, asserted, and then optimized by a solve.
//!
//! Internally, and at a high-level, a solve is viewed in terms of a [search](search) for the optimum of each objective, within a [combination](combination) of the objectives.
//! Each search step is a single check of the oracle, with a bound on the objective asserted within a checkpoint.
//!
//! Useful starting points, then, may be:
//! - The [search] module to inspect the dynamics of a search.
//! - The [objective] module for the semantics of bounds and values.
//! - The [oracle] module for the interface between optimization and decision.
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Examples
//!
//! + Maximize the least of two distinct values, with a binary search.
//!
//! ```rust
//! # use otter_omt::config::Config;
//! # use otter_omt::environment::Environment;
//! # use otter_omt::numeric::rational;
//! # use otter_omt::objective::{Goal, ObjectiveValue, SearchStatus};
//! # use otter_omt::reports::Report;
//! let config = Config::from_options([("opt.strategy", "bin")]).unwrap();
//! let mut env = Environment::from_config(config).unwrap();
//! let store = env.terms().clone();
//!
//! let x = store.int_var("x").unwrap();
//! let y = store.int_var("y").unwrap();
//! for v in [x, y] {
//!     env.assert_hard(store.ge(v, store.int(0).unwrap()).unwrap()).unwrap();
//!     env.assert_hard(store.le(v, store.int(10).unwrap()).unwrap()).unwrap();
//! }
//! env.assert_hard(store.distinct(&[x, y]).unwrap()).unwrap();
//!
//! let objective = env.create_objective(Goal::max_min(&[x, y])).unwrap();
//! env.assert_objective(objective).unwrap();
//!
//! assert_eq!(env.solve().unwrap(), Report::Satisfiable);
//! assert_eq!(env.objective_status(objective).unwrap(), SearchStatus::SatOptimal);
//! assert_eq!(env.objective_value(objective).unwrap(), ObjectiveValue::exactly(rational(9)));
//! ```
//!
//! + Minimize the weight of violated soft constraints.
//!
//! ```rust
//! # use otter_omt::config::Config;
//! # use otter_omt::environment::Environment;
//! # use otter_omt::numeric::rational;
//! # use otter_omt::objective::{Goal, ObjectiveValue};
//! let mut env = Environment::from_config(Config::default()).unwrap();
//! let store = env.terms().clone();
//!
//! let p = store.bool_var("p").unwrap();
//! env.assert_soft(p, rational(2), "cost").unwrap();
//! let cost = env.assert_soft(store.not(p).unwrap(), rational(3), "cost").unwrap();
//!
//! let objective = env.create_objective(Goal::minimize(cost)).unwrap();
//! env.assert_objective(objective).unwrap();
//! env.solve().unwrap();
//! assert_eq!(env.objective_value(objective).unwrap(), ObjectiveValue::exactly(rational(2)));
//! ```
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - The trace of each search can be found with `RUST_LOG=search=trace …`, or `RUST_LOG=search=info …` with the `opt.verbose` option.
//! - Logs of the [SAT core](crate::sat) can be filtered with `RUST_LOG=propagation …` and so on.

#![allow(mixed_script_confusables)]
#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]

pub mod config;
pub mod environment;
pub mod objective;
pub mod reports;
pub mod types;

pub mod combination;
pub mod maxsmt;
pub mod search;

pub mod model;
pub mod numeric;
pub mod terms;

pub mod oracle;
pub mod sat;
pub mod theory;

pub mod generic;

pub mod misc;
