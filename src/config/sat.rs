//! Configuration of the SAT core of the bundled oracle.

use super::ConfigOption;
use crate::generic::luby::LubyRepresentation;

/// Representation for the probability of choosing `true` when freely choosing the value of an atom.
pub type PolarityLean = f64;

/// Representation for the probability of choosing a random atom when making a decision.
pub type RandomDecisionBias = f64;

/// Representation for the multiplicative decay of atom activity.
pub type ActivityDecay = f64;

/// The configuration of a [SatContext](crate::sat::SatContext).
#[derive(Clone, Debug)]
pub struct SatConfig {
    /// The `u` value to multiply the luby sequence by when determining whether to perform a restart.
    pub luby_u: ConfigOption<LubyRepresentation>,

    /// The probability of assigning positive polarity to an atom when freely choosing an atom.
    pub polarity_lean: ConfigOption<PolarityLean>,

    /// The probability of choosing an arbitrary atom over the most active atom.
    pub random_decision_bias: ConfigOption<RandomDecisionBias>,

    /// Default to the last set value of an atom when choosing a value for the atom.
    pub phase_saving: ConfigOption<bool>,

    /// Permit (scheduled) restarts.
    pub restart: ConfigOption<bool>,

    /// The decay applied to atom activity after each conflict.
    pub activity_decay: ConfigOption<ActivityDecay>,
}

impl Default for SatConfig {
    fn default() -> Self {
        SatConfig {
            luby_u: ConfigOption {
                name: "luby",
                min: 1,
                max: LubyRepresentation::MAX,
                value: 128,
            },

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            phase_saving: ConfigOption {
                name: "phase_saving",
                min: false,
                max: true,
                value: true,
            },

            restart: ConfigOption {
                name: "restart",
                min: false,
                max: true,
                value: true,
            },

            activity_decay: ConfigOption {
                name: "activity_decay",
                min: f64::EPSILON,
                max: 1.0,
                value: 0.95,
            },
        }
    }
}
