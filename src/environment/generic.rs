use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::SlotMap;

use super::{callbacks::CallbackTerminate, Counters};
use crate::{
    combination::ParetoRun,
    config::{Config, Priority},
    maxsmt::{Soft, SoftGroup},
    misc::log::targets,
    model::Model,
    numeric::Rational,
    objective::{Goal, ObjectiveKey, SearchState, Target, Window},
    oracle::Oracle,
    terms::{Sort, Term, TermStore},
    types::err::ErrorKind,
};

/// A source of distinct environment identifiers.
static ENVIRONMENT_COUNT: AtomicU32 = AtomicU32::new(0);

/// An objective, as stored in an environment.
pub(super) struct ObjectiveEntry {
    pub goal: Goal,

    /// The objective, as written in logs.
    pub label: String,

    pub target: Target,

    /// Formulas defining the target, for MinMax and MaxMin objectives.
    pub definitions: Vec<Term>,

    pub window: Window,

    /// The checkpoint depth at which the objective was created.
    pub created_at: usize,

    /// The checkpoint depth at which the objective was asserted, if asserted.
    pub asserted_at: Option<usize>,

    /// True if the checkpoint within which the objective was created has been closed.
    pub stale: bool,

    /// The state of the most recent search, since the objective was asserted.
    pub state: Option<SearchState>,
}

/// An environment, generic over a [decision oracle](Oracle).
///
/// # Example
///
/// ```rust
/// # use otter_omt::environment::GenericEnvironment;
/// # use otter_omt::oracle::SmtOracle;
/// # use otter_omt::config::Config;
/// # use otter_omt::terms::TermStore;
/// let config = Config::default();
/// let oracle = SmtOracle::new(TermStore::default(), config.sat.clone()).unwrap();
/// let environment = GenericEnvironment::with_oracle(config, oracle).unwrap();
/// ```
pub struct GenericEnvironment<O: Oracle> {
    pub(super) id: u32,

    /// The configuration of the environment.
    pub config: Config,

    /// Counters related to solves of the environment.
    pub counters: Counters,

    pub(super) oracle: O,

    pub(super) objectives: SlotMap<ObjectiveKey, ObjectiveEntry>,

    /// Asserted objectives, in order of assertion.
    pub(super) asserted: Vec<ObjectiveKey>,

    /// Groups of soft constraints, in order of creation.
    pub(super) groups: Vec<SoftGroup>,

    /// The enumeration of Pareto-optimal points.
    pub(super) pareto: ParetoRun,

    /// The current model.
    pub(super) model: Option<Model>,

    /// Terminates solves, if true.
    pub(super) callback_terminate: Option<Box<CallbackTerminate>>,
}

impl<O: Oracle> GenericEnvironment<O> {
    /// An environment using `oracle`, with `config` validated.
    pub fn with_oracle(config: Config, oracle: O) -> Result<Self, ErrorKind> {
        config.validate()?;
        let id = ENVIRONMENT_COUNT.fetch_add(1, Ordering::Relaxed);
        log::debug!(target: targets::ENVIRONMENT, "Environment {id} created");

        Ok(GenericEnvironment {
            id,
            config,
            counters: Counters::default(),
            oracle,
            objectives: SlotMap::with_key(),
            asserted: Vec::default(),
            groups: Vec::default(),
            pareto: ParetoRun::default(),
            model: None,
            callback_terminate: None,
        })
    }

    /// The store of terms of the environment.
    pub fn terms(&self) -> &TermStore {
        self.oracle.terms()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// A count of open checkpoints.
    pub fn depth(&self) -> usize {
        self.oracle.depth()
    }

    /// Restarts Pareto enumeration.
    pub(super) fn reset_pareto(&mut self) {
        if !self.pareto.points().is_empty() || self.pareto.is_exhausted() {
            log::trace!(target: targets::PARETO, "Enumeration reset");
        }
        self.pareto = ParetoRun::default();
    }

    /// Opens a checkpoint.
    pub fn push(&mut self) -> Result<(), ErrorKind> {
        self.oracle.push()?;
        self.reset_pareto();
        Ok(())
    }

    /// Closes the most recent checkpoint.
    ///
    /// - Each hard and soft constraint asserted within the checkpoint is retracted.
    /// - Each objective asserted within the checkpoint is de-asserted, and results of the objective are dropped.
    /// - Each objective created within the checkpoint is stale, and any further use of the objective is an error.
    pub fn pop(&mut self) -> Result<(), ErrorKind> {
        self.oracle.pop()?;
        let depth = self.oracle.depth();

        for (_, entry) in self.objectives.iter_mut() {
            if entry.created_at > depth {
                entry.stale = true;
            }
            if entry.stale || entry.asserted_at.is_some_and(|asserted| asserted > depth) {
                entry.asserted_at = None;
                entry.state = None;
            }
        }
        let objectives = &self.objectives;
        self.asserted
            .retain(|key| objectives.get(*key).is_some_and(|entry| entry.asserted_at.is_some()));

        for group in &mut self.groups {
            group.retain_to(depth);
        }

        self.reset_pareto();
        log::debug!(target: targets::ENVIRONMENT, "Pop to {depth}");
        Ok(())
    }

    /// Asserts a boolean term within the current checkpoint.
    pub fn assert_hard(&mut self, term: Term) -> Result<(), ErrorKind> {
        self.oracle.assert_hard(term)?;
        self.reset_pareto();
        Ok(())
    }

    /// Asserts a boolean term as a soft constraint of `group`, with `weight` the cost of violating the constraint.
    ///
    /// The real symbol of the group is returned, see [maxsmt](crate::maxsmt).
    /// The first soft constraint of a group declares the symbol, and it is an error if `group` names a symbol of another sort.
    pub fn assert_soft(&mut self, term: Term, weight: Rational, group: &str) -> Result<Term, ErrorKind> {
        let store = self.oracle.terms().clone();
        store.sort(term)?.expect(Sort::Bool)?;

        let index = match self.groups.iter().position(|known| known.name == group) {
            Some(index) => index,
            None => {
                let symbol = store.declare(group, Sort::Real)?;
                self.groups.push(SoftGroup::new(group, symbol));
                self.groups.len() - 1
            }
        };

        let soft_group = &mut self.groups[index];
        soft_group.softs.push(Soft {
            term,
            weight,
            depth: self.oracle.depth(),
        });
        let symbol = soft_group.symbol;

        self.reset_pareto();
        Ok(symbol)
    }

    /// The groups of soft constraints, in order of creation.
    pub fn soft_groups(&self) -> &[SoftGroup] {
        &self.groups
    }

    /// Sets the priority of later solves.
    pub fn set_priority(&mut self, priority: Priority) {
        self.config.priority.value = priority;
        self.reset_pareto();
    }
}
