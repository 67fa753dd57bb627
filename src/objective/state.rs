use super::{ObjectiveValue, Sense};
use crate::{model::Model, numeric::Rational};

/// The status of the search for the optimum of an objective.
///
/// Within a solve a status only moves forward, from [Unknown](SearchStatus::Unknown) to one of the other statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// The search has not completed, for example as the solve was interrupted before a model was found.
    Unknown,

    /// No model within the bounds of the objective satisfies the hard constraints.
    Unsat,

    /// A model was found, and the search was interrupted.
    SatPartial,

    /// A model was found, and the search stopped early at a step budget or tolerance.
    SatApprox,

    /// The optimum was found.
    SatOptimal,
}

impl SearchStatus {
    /// True if some model within the bounds of the objective was found.
    pub fn is_sat(&self) -> bool {
        matches!(
            self,
            SearchStatus::SatPartial | SearchStatus::SatApprox | SearchStatus::SatOptimal
        )
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Unsat => write!(f, "unsat"),
            Self::SatPartial => write!(f, "sat_partial"),
            Self::SatApprox => write!(f, "sat_approx"),
            Self::SatOptimal => write!(f, "sat_optimal"),
        }
    }
}

/// The kind of a search step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// A check for a model better than the best model found.
    Linear,

    /// A check for a model better than a pivot between the bounds.
    Binary,

    /// A check of the soft constraints of a group, relaxed by the cores found so far.
    Relaxation,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Binary => write!(f, "binary"),
            Self::Relaxation => write!(f, "relaxation"),
        }
    }
}

/// The outcome of a search step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A better model was found.
    Improved,

    /// No better model exists.
    Refuted,

    /// The check was interrupted or failed.
    Interrupted,
}

/// A record of a search step, with bounds as the values of the objective after the step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,

    /// The pivot of a binary step, as a value of the objective.
    pub pivot: Option<Rational>,

    pub outcome: StepOutcome,

    pub lower: ObjectiveValue,
    pub upper: ObjectiveValue,
}

/// The state of the search for the optimum of an objective.
///
/// Bounds are kept in terms of *cost*, the value of the objective for minimization and the negated value for maximization.
/// So, the search always lowers the upper bound and raises the lower bound, and [value](SearchState::value) and [interval](SearchState::interval) give the bounds as values of the objective.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub status: SearchStatus,

    pub(crate) sense: Sense,

    /// A bound below every cost within the bounds of the objective.
    pub(crate) lower: ObjectiveValue,

    /// The cost of the best model found, or if `strict_upper` a bound above every cost within the bounds of the objective.
    pub(crate) upper: ObjectiveValue,

    /// True if no model with cost `upper` has been found.
    pub strict_upper: bool,

    /// The width of the initial interval, if finite.
    pub(crate) initial_width: Option<Rational>,

    pub steps: u32,
    pub linear_steps: u32,
    pub binary_steps: u32,

    /// Consecutive binary steps without a model.
    pub(crate) consecutive_refutations: u32,

    pub history: Vec<Step>,

    /// A model with cost `upper`, unless `strict_upper`.
    pub model: Option<Model>,
}

impl SearchState {
    /// A state with the cost interval `[lower, upper)`.
    pub(crate) fn new(sense: Sense, lower: ObjectiveValue, upper: ObjectiveValue) -> Self {
        let initial_width = match (&lower, &upper) {
            (ObjectiveValue::Finite(l), ObjectiveValue::Finite(u)) => Some(&u.real - &l.real),
            _ => None,
        };
        SearchState {
            status: SearchStatus::Unknown,
            sense,
            lower,
            upper,
            strict_upper: true,
            initial_width,
            steps: 0,
            linear_steps: 0,
            binary_steps: 0,
            consecutive_refutations: 0,
            history: Vec::default(),
            model: None,
        }
    }

    /// A state with the single point `cost`, witnessed by `model`.
    pub(crate) fn point(sense: Sense, cost: ObjectiveValue, model: Model) -> Self {
        let mut state = SearchState::new(sense, cost.clone(), cost);
        state.status = SearchStatus::SatOptimal;
        state.strict_upper = false;
        state.model = Some(model);
        state
    }

    /// True if a model has been found.
    pub fn witnessed(&self) -> bool {
        !self.strict_upper
    }

    /// Converts a cost to a value of the objective.
    pub(crate) fn to_value(&self, cost: &ObjectiveValue) -> ObjectiveValue {
        match self.sense {
            Sense::Minimize => cost.clone(),
            Sense::Maximize => cost.negated(),
        }
    }

    /// The value of the objective.
    ///
    /// This is the value of the best model found, or the bound of the objective if no model was found.
    pub fn value(&self) -> ObjectiveValue {
        self.to_value(&self.upper)
    }

    /// The least and greatest values the optimum may take.
    pub fn interval(&self) -> (ObjectiveValue, ObjectiveValue) {
        let lower = self.to_value(&self.lower);
        let upper = self.to_value(&self.upper);
        match self.sense {
            Sense::Minimize => (lower, upper),
            Sense::Maximize => (upper, lower),
        }
    }

    /// Records a step, with the current bounds.
    pub(crate) fn record(&mut self, kind: StepKind, pivot: Option<Rational>, outcome: StepOutcome) {
        let pivot = pivot.map(|cost| match self.sense {
            Sense::Minimize => cost,
            Sense::Maximize => -cost,
        });
        let (lower, upper) = self.interval();
        self.history.push(Step {
            kind,
            pivot,
            outcome,
            lower,
            upper,
        });
    }

    /// Improves the upper bound to `cost`, witnessed by `model`.
    pub(crate) fn improve(&mut self, cost: ObjectiveValue, model: Model) {
        self.upper = cost;
        self.strict_upper = false;
        self.model = Some(model);
    }

    /// The interval, formatted for logs.
    pub(crate) fn interval_string(&self) -> String {
        let (lower, upper) = self.interval();
        format!("[ {lower}, {upper} ]")
    }
}
