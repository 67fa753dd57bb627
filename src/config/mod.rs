/*!
Configuration of an environment.

All configuration for an [environment](crate::environment) is contained within a [Config], fixed when the environment is created.
Options are stored as [ConfigOption]s, which note the key of the option and the range of permitted values.

Options may be set directly on the struct, or through [set](Config::set) with the string keys:

| Key | Values |
|---|---|
| `model_generation` | `true`, `false` |
| `opt.strategy` | `lin`, `bin`, `ada` |
| `opt.priority` | `box`, `lex`, `par` |
| `opt.par.mode` | `incremental` |
| `opt.maxsmt_engine` | `omt`, `maxres` |
| `opt.abort_interval` | a count of search steps, `0` for no limit |
| `opt.abort_tolerance` | a relative error, `0` for none |
| `opt.bin.first_step_linear` | `true`, `false` |
| `opt.bin.max_consecutive` | a count of binary steps, `0` for no limit |
| `opt.bin.pivot_position` | a rational strictly between `0` and `1` |
| `opt.soft_timeout` | `true`, `false` |
| `opt.verbose` | `true`, `false` |
| `time_limit` | seconds, `0` for none |

Options of the SAT core of the bundled oracle are prefixed by `sat.`, see [SatConfig].

In either case, a malformed configuration is rejected by [validate](Config::validate) when an environment is created.

# Example

```rust
# use otter_omt::config::{Config, SearchStrategy};
let config = Config::from_options([("opt.strategy", "bin"), ("opt.bin.pivot_position", "0.25")]).unwrap();
assert_eq!(config.strategy.value, SearchStrategy::Binary);

let mut config = Config::default();
assert!(config.set("opt.strategy", "quadratic").is_err());
```
*/

mod config_option;
pub use config_option::ConfigOption;

mod maxsmt;
pub use maxsmt::MaxSMTEngine;

mod priority;
pub use priority::{ParetoMode, Priority};

pub mod sat;
pub use sat::SatConfig;

mod strategy;
pub use strategy::SearchStrategy;

use std::{str::FromStr, time::Duration};

use num::{One, Zero};

use crate::{
    numeric::{self, Rational},
    types::err::{self, ErrorKind},
};

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// Retain models of objectives for inspection after a solve.
    pub model_generation: ConfigOption<bool>,

    /// The search strategy for each objective.
    pub strategy: ConfigOption<SearchStrategy>,

    /// How multiple objectives are combined.
    pub priority: ConfigOption<Priority>,

    /// How Pareto points are enumerated.
    pub pareto_mode: ConfigOption<ParetoMode>,

    /// The engine used for groups of soft constraints.
    pub maxsmt_engine: ConfigOption<MaxSMTEngine>,

    /// A budget of search steps for each objective, after which the search stops with an approximate result.
    pub abort_interval: ConfigOption<u32>,

    /// A relative error, at or below which the search stops with an approximate result.
    pub abort_tolerance: ConfigOption<f64>,

    /// Make the first step of a binary search a linear step.
    pub bin_first_step_linear: ConfigOption<bool>,

    /// The count of consecutive unsatisfiable binary steps after which a linear step is made.
    pub bin_max_consecutive: ConfigOption<u32>,

    /// Where the pivot of a binary step falls between the lower and upper bound.
    pub bin_pivot_position: ConfigOption<Rational>,

    /// Treat an interrupted search with a model as an approximate result.
    pub soft_timeout: ConfigOption<bool>,

    /// Log the trace of each search at info level.
    pub verbose: ConfigOption<bool>,

    /// The time limit for a solve.
    pub time_limit: ConfigOption<Option<Duration>>,

    /// Configuration of the SAT core of the bundled oracle.
    pub sat: SatConfig,
}

impl Default for Config {
    /// The default configuration is a linear search of boxed objectives.
    fn default() -> Self {
        Config {
            model_generation: ConfigOption {
                name: "model_generation",
                min: false,
                max: true,
                value: false,
            },

            strategy: ConfigOption {
                name: "opt.strategy",
                min: SearchStrategy::MIN,
                max: SearchStrategy::MAX,
                value: SearchStrategy::Linear,
            },

            priority: ConfigOption {
                name: "opt.priority",
                min: Priority::MIN,
                max: Priority::MAX,
                value: Priority::Box,
            },

            pareto_mode: ConfigOption {
                name: "opt.par.mode",
                min: ParetoMode::MIN,
                max: ParetoMode::MAX,
                value: ParetoMode::Incremental,
            },

            maxsmt_engine: ConfigOption {
                name: "opt.maxsmt_engine",
                min: MaxSMTEngine::MIN,
                max: MaxSMTEngine::MAX,
                value: MaxSMTEngine::OMT,
            },

            abort_interval: ConfigOption {
                name: "opt.abort_interval",
                min: 0,
                max: u32::MAX,
                value: 0,
            },

            abort_tolerance: ConfigOption {
                name: "opt.abort_tolerance",
                min: 0.0,
                max: f64::MAX,
                value: 0.0,
            },

            bin_first_step_linear: ConfigOption {
                name: "opt.bin.first_step_linear",
                min: false,
                max: true,
                value: true,
            },

            bin_max_consecutive: ConfigOption {
                name: "opt.bin.max_consecutive",
                min: 0,
                max: u32::MAX,
                value: 2,
            },

            bin_pivot_position: ConfigOption {
                name: "opt.bin.pivot_position",
                min: Rational::zero(),
                max: Rational::one(),
                value: Rational::new(1.into(), 2.into()),
            },

            soft_timeout: ConfigOption {
                name: "opt.soft_timeout",
                min: false,
                max: true,
                value: false,
            },

            verbose: ConfigOption {
                name: "opt.verbose",
                min: false,
                max: true,
                value: false,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: None,
                max: Some(Duration::MAX),
                value: None,
            },

            sat: SatConfig::default(),
        }
    }
}

impl Config {
    /// A configuration from the default configuration, revised by each key/value pair.
    pub fn from_options<'a>(
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ErrorKind> {
        let mut config = Config::default();
        for (key, value) in options {
            config.set(key, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the option with `key` to the parsed `value`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ErrorKind> {
        let value = value.trim();
        match key {
            "model_generation" => set_parsed(&mut self.model_generation, value),
            "opt.strategy" => set_parsed(&mut self.strategy, value),
            "opt.priority" => set_parsed(&mut self.priority, value),
            "opt.par.mode" => set_parsed(&mut self.pareto_mode, value),
            "opt.maxsmt_engine" => set_parsed(&mut self.maxsmt_engine, value),
            "opt.abort_interval" => set_parsed(&mut self.abort_interval, value),
            "opt.abort_tolerance" => set_parsed(&mut self.abort_tolerance, value),
            "opt.bin.first_step_linear" => set_parsed(&mut self.bin_first_step_linear, value),
            "opt.bin.max_consecutive" => set_parsed(&mut self.bin_max_consecutive, value),
            "opt.bin.pivot_position" => match numeric::parse_rational(value) {
                Some(position) => Ok(self.bin_pivot_position.set(position)?),
                None => Err(invalid(&self.bin_pivot_position, value)),
            },
            "opt.soft_timeout" => set_parsed(&mut self.soft_timeout, value),
            "opt.verbose" => set_parsed(&mut self.verbose, value),
            "time_limit" => match value.parse::<f64>() {
                Ok(seconds) if seconds == 0.0 => Ok(self.time_limit.set(None)?),
                Ok(seconds) if seconds > 0.0 => match Duration::try_from_secs_f64(seconds) {
                    Ok(limit) => Ok(self.time_limit.set(Some(limit))?),
                    Err(_) => Err(invalid(&self.time_limit, value)),
                },
                _ => Err(invalid(&self.time_limit, value)),
            },
            "sat.luby" => set_parsed(&mut self.sat.luby_u, value),
            "sat.polarity_lean" => set_parsed(&mut self.sat.polarity_lean, value),
            "sat.random_decision_bias" => set_parsed(&mut self.sat.random_decision_bias, value),
            "sat.phase_saving" => set_parsed(&mut self.sat.phase_saving, value),
            "sat.restart" => set_parsed(&mut self.sat.restart, value),
            "sat.activity_decay" => set_parsed(&mut self.sat.activity_decay, value),
            _ => Err(err::ConfigError::UnknownOption(key.to_string()).into()),
        }
    }

    /// Checks each option is within range, and that the combination of options is supported.
    pub fn validate(&self) -> Result<(), ErrorKind> {
        check_range(&self.model_generation)?;
        check_range(&self.strategy)?;
        check_range(&self.priority)?;
        check_range(&self.maxsmt_engine)?;
        check_range(&self.abort_interval)?;
        check_range(&self.abort_tolerance)?;
        check_range(&self.bin_max_consecutive)?;
        check_range(&self.time_limit)?;
        check_range(&self.sat.luby_u)?;
        check_range(&self.sat.polarity_lean)?;
        check_range(&self.sat.random_decision_bias)?;
        check_range(&self.sat.activity_decay)?;

        // The pivot must fall strictly between the bounds.
        let position = &self.bin_pivot_position;
        if position.value <= position.min || position.value >= position.max {
            return Err(err::ConfigError::OutOfRange {
                option: position.name,
            }
            .into());
        }

        if self.pareto_mode.value != ParetoMode::Incremental {
            return Err(err::ConfigError::UnsupportedParetoMode.into());
        }

        Ok(())
    }
}

fn invalid<T>(option: &ConfigOption<T>, value: &str) -> ErrorKind {
    err::ConfigError::InvalidValue {
        option: option.name,
        value: value.to_string(),
    }
    .into()
}

fn set_parsed<T: FromStr + Clone + PartialOrd>(
    option: &mut ConfigOption<T>,
    value: &str,
) -> Result<(), ErrorKind> {
    match value.parse::<T>() {
        Ok(parsed) => Ok(option.set(parsed)?),
        Err(_) => Err(invalid(option, value)),
    }
}

fn check_range<T: Clone + PartialOrd>(option: &ConfigOption<T>) -> Result<(), ErrorKind> {
    match option.in_range(&option.value) {
        true => Ok(()),
        false => Err(err::ConfigError::OutOfRange {
            option: option.name,
        }
        .into()),
    }
}
