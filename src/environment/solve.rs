//! Solves, and the models of an environment.

use std::time::Instant;

use super::GenericEnvironment;
use crate::{
    combination::{boxed, lexicographic, pareto, ParetoPoint},
    config::Priority,
    misc::log::targets,
    model::Model,
    objective::{Objective, Prepared, SearchState, SearchStatus},
    oracle::{Oracle, SatResult},
    reports::Report,
    search::{self, Session},
    types::err::{ErrorKind, StateError},
};

/// The result of the checkpointed part of a solve.
struct Outcome {
    report: Report,
    states: Vec<SearchState>,

    /// A model of the hard constraints, if no objective is asserted.
    model: Option<Model>,
}

impl Outcome {
    fn uniform(report: Report, tasks: &[Prepared], status: SearchStatus) -> Self {
        Outcome {
            report,
            states: tasks
                .iter()
                .map(|task| crate::combination::unsearched(task, status))
                .collect(),
            model: None,
        }
    }
}

impl<O: Oracle> GenericEnvironment<O> {
    /// Optimizes the asserted objectives, under the configured [priority](crate::config::Priority).
    ///
    /// - [Unsatisfiable](Report::Unsatisfiable) if the hard constraints are unsatisfiable, or each Pareto-optimal point has been found.
    /// - [Unknown](Report::Unknown) if the status of some objective is unknown, e.g. as the solve was interrupted or the oracle failed.
    /// - [Satisfiable](Report::Satisfiable) otherwise.
    ///
    /// The status, value, and interval of each objective may then be read, and with model generation the current model is the model of the last objective with a model.
    ///
    /// The checkpoint depth of the environment is unchanged by a solve.
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        let start = Instant::now();
        let depth = self.oracle.depth();
        self.counters.solves += 1;

        let (definitions, tasks) = self.prepare()?;
        let priority = self.config.priority.value;
        log::info!(target: targets::ENVIRONMENT, "Solve {} of {} objectives, {priority}", self.counters.solves, tasks.len());

        let deadline = self.config.time_limit.value.and_then(|limit| start.checked_add(limit));
        let callback = &mut self.callback_terminate;
        let mut terminate = || {
            deadline.is_some_and(|deadline| Instant::now() >= deadline)
                || callback.as_mut().is_some_and(|callback| callback())
        };

        let mut session = Session {
            oracle: &mut self.oracle,
            config: &self.config,
            terminate: &mut terminate,
        };
        let pareto_run = &mut self.pareto;

        let result = session.checkpointed(|session| {
            for definition in definitions {
                session.oracle.assert_hard(definition)?;
            }

            let model = match session.oracle.check_sat(&[], &mut *session.terminate)? {
                SatResult::Sat => session.oracle.get_model()?,
                SatResult::Unsat => {
                    return Ok(Outcome::uniform(Report::Unsatisfiable, &tasks, SearchStatus::Unsat));
                }
                SatResult::Unknown => {
                    return Ok(Outcome::uniform(Report::Unknown, &tasks, SearchStatus::Unknown));
                }
            };

            if tasks.is_empty() {
                return Ok(Outcome {
                    report: Report::Satisfiable,
                    states: Vec::default(),
                    model: Some(model),
                });
            }

            let states = match priority {
                Priority::Box => boxed::solve(session, &tasks)?,
                Priority::Lexicographic => lexicographic::solve(session, &tasks)?,
                Priority::Pareto => pareto::solve(session, &tasks, pareto_run)?,
            };

            let report = if states.iter().any(|state| state.status == SearchStatus::Unknown) {
                Report::Unknown
            } else if priority == Priority::Pareto && pareto_run.is_exhausted() {
                Report::Unsatisfiable
            } else {
                Report::Satisfiable
            };

            Ok(Outcome {
                report,
                states,
                model: None,
            })
        });

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) if search::is_oracle_failure(&error) => {
                log::warn!(target: targets::ENVIRONMENT, "Oracle failure: {error}");
                Outcome::uniform(Report::Unknown, &tasks, SearchStatus::Unknown)
            }
            Err(error) => return Err(error),
        };

        if self.oracle.depth() != depth {
            return Err(StateError::UnbalancedCheckpoints.into());
        }

        let report = outcome.report;
        self.record(outcome);
        self.counters.time += start.elapsed();
        log::info!(target: targets::ENVIRONMENT, "Solve {}: {report}", self.counters.solves);
        Ok(report)
    }

    /// Stores the states and model of a solve.
    fn record(&mut self, outcome: Outcome) {
        let Outcome {
            report,
            states,
            model,
        } = outcome;
        let generation = self.config.model_generation.value;

        self.model = match generation {
            true => model,
            false => None,
        };

        if self.config.priority.value == Priority::Pareto && report == Report::Satisfiable {
            self.counters.pareto_points += 1;
        }

        for (key, mut state) in self.asserted.clone().into_iter().zip(states) {
            if state.steps > 0 {
                self.counters.searches += 1;
                self.counters.steps += state.steps as usize;
            }
            if !generation {
                state.model = None;
            } else if let Some(model) = &state.model {
                self.model = Some(model.clone());
            }
            if let Some(entry) = self.objectives.get_mut(key) {
                log::info!(target: targets::ENVIRONMENT, "{} - {}: {}", entry.label, state.status, state.value());
                entry.state = Some(state);
            }
        }
    }

    /// Sets the current model to the model of `objective`.
    ///
    /// # Errors
    /// - Without model generation.
    /// - If no model was found for the objective by the most recent solve.
    pub fn load_objective_model(&mut self, objective: Objective) -> Result<(), ErrorKind> {
        if !self.config.model_generation.value {
            return Err(StateError::ModelGenerationDisabled.into());
        }
        let model = match &self.entry(objective)?.state {
            Some(SearchState {
                model: Some(model), ..
            }) => model.clone(),
            _ => return Err(StateError::NoModel.into()),
        };
        self.model = Some(model);
        Ok(())
    }

    /// The current model.
    pub fn model(&self) -> Result<&Model, ErrorKind> {
        if !self.config.model_generation.value {
            return Err(StateError::ModelGenerationDisabled.into());
        }
        self.model.as_ref().ok_or(StateError::NoModel.into())
    }

    /// The Pareto-optimal points found since the enumeration began.
    pub fn pareto_points(&self) -> &[ParetoPoint] {
        self.pareto.points()
    }
}
