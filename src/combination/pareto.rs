/*!
Pareto optimization, by guided improvement.

A point is Pareto-optimal if no model improves the cost of one objective without worsening the cost of another.
Each solve gives one point, as follows:

1. A model is found which satisfies the hard constraints, the bounds of each objective, and each block.
   If there is no such model, the points are exhausted.
2. While some model *dominates* the current model, with each cost at most and some cost below the current cost, the current model is replaced by the dominating model.
3. The costs of the current model are a Pareto-optimal point.
   The point is blocked, by requiring some cost below the cost of the point.

Blocks persist across solves in a [ParetoRun], until the run is reset by a change to the assertions, checkpoints, or objectives of the environment.

Note, enumeration terminates only if there are finitely many Pareto-optimal points, and each improvement chain is finite.
For example, maximizing a real `x` with `x < 3` has no Pareto-optimal point, and improvement continues until interrupted.
*/

use super::unsearched;
use crate::{
    misc::log::targets,
    model::Model,
    numeric::Rational,
    objective::{ObjectiveValue, Prepared, SearchState, SearchStatus},
    oracle::{Oracle, SatResult},
    search::Session,
    terms::{Term, TermStore},
    types::err::ErrorKind,
};

/// A Pareto-optimal point.
#[derive(Clone, Debug)]
pub struct ParetoPoint {
    /// The value of each objective, in the order asserted.
    pub values: Vec<ObjectiveValue>,

    pub model: Model,
}

/// The points found by the solves of an enumeration.
#[derive(Clone, Debug, Default)]
pub struct ParetoRun {
    /// Formulas excluding each point found, and each point the point dominates.
    blocks: Vec<Term>,

    points: Vec<ParetoPoint>,

    exhausted: bool,
}

impl ParetoRun {
    /// The points found, in order.
    pub fn points(&self) -> &[ParetoPoint] {
        &self.points
    }

    /// True if every point has been found.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// The result of a check for a dominating model.
enum Improvement {
    Better(Model),
    Optimal,
    Interrupted,
}

/// The cost of each task in `model`.
fn costs(store: &TermStore, tasks: &[Prepared], model: &Model) -> Result<Vec<Rational>, ErrorKind> {
    tasks
        .iter()
        .map(|task| task.target.model_cost(store, model))
        .collect()
}

/// The formula satisfied by models which dominate `costs`.
fn dominating(store: &TermStore, tasks: &[Prepared], costs: &[Rational]) -> Result<Term, ErrorKind> {
    let mut at_most = Vec::with_capacity(tasks.len());
    let mut below = Vec::with_capacity(tasks.len());
    for (task, cost) in tasks.iter().zip(costs) {
        at_most.push(task.target.at_most(store, cost)?);
        below.push(task.target.below(store, &cost.clone().into())?);
    }
    at_most.push(store.or(&below)?);
    store.and(&at_most)
}

/// The formula excluding every model dominated by `costs`, including models at `costs`.
fn block(store: &TermStore, tasks: &[Prepared], costs: &[Rational]) -> Result<Term, ErrorKind> {
    let mut below = Vec::with_capacity(tasks.len());
    for (task, cost) in tasks.iter().zip(costs) {
        below.push(task.target.below(store, &cost.clone().into())?);
    }
    store.or(&below)
}

/// The window of each task, as formulas.
fn windows(store: &TermStore, tasks: &[Prepared]) -> Result<Vec<Term>, ErrorKind> {
    let mut formulas = Vec::default();
    for task in tasks {
        if let Some(lower) = task.window.lower.real() {
            formulas.push(task.target.at_least(store, lower)?);
        }
        if let ObjectiveValue::Finite(upper) = &task.window.upper {
            formulas.push(task.target.below(store, upper)?);
        }
    }
    Ok(formulas)
}

/// Finds the next Pareto-optimal point of `tasks`, if any.
///
/// A state is returned for each task.
/// On a point, each state is the cost of the point.
pub fn solve<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    tasks: &[Prepared],
    run: &mut ParetoRun,
) -> Result<Vec<SearchState>, ErrorKind> {
    let unsat = |tasks: &[Prepared]| {
        tasks
            .iter()
            .map(|task| unsearched(task, SearchStatus::Unsat))
            .collect::<Vec<_>>()
    };

    if run.exhausted || tasks.iter().any(|task| task.window.is_empty(task.target.domain)) {
        run.exhausted = true;
        return Ok(unsat(tasks));
    }

    let store = session.oracle.terms().clone();
    let level = session.trace_level();

    session.checkpointed(|session| {
        for formula in windows(&store, tasks)? {
            session.oracle.assert_hard(formula)?;
        }
        for block in &run.blocks {
            session.oracle.assert_hard(*block)?;
        }

        let mut model = match session.oracle.check_sat(&[], &mut *session.terminate)? {
            SatResult::Sat => session.oracle.get_model()?,
            SatResult::Unsat => {
                log::log!(target: targets::PARETO, level, "exhausted after {} points", run.points.len());
                run.exhausted = true;
                return Ok(unsat(tasks));
            }
            SatResult::Unknown => {
                return Ok(tasks
                    .iter()
                    .map(|task| unsearched(task, SearchStatus::Unknown))
                    .collect());
            }
        };
        let mut current = costs(&store, tasks, &model)?;
        let mut improvements = 0;

        loop {
            let dominating = dominating(&store, tasks, &current)?;
            let improvement = session.checkpointed(|session| {
                session.oracle.assert_hard(dominating)?;
                match session.oracle.check_sat(&[], &mut *session.terminate)? {
                    SatResult::Sat => Ok(Improvement::Better(session.oracle.get_model()?)),
                    SatResult::Unsat => Ok(Improvement::Optimal),
                    SatResult::Unknown => Ok(Improvement::Interrupted),
                }
            })?;

            match improvement {
                Improvement::Better(better) => {
                    improvements += 1;
                    current = costs(&store, tasks, &better)?;
                    model = better;
                }

                Improvement::Optimal => break,

                Improvement::Interrupted => {
                    let status = match session.config.soft_timeout.value {
                        true => SearchStatus::SatApprox,
                        false => SearchStatus::SatPartial,
                    };
                    return Ok(tasks
                        .iter()
                        .zip(&current)
                        .map(|(task, cost)| {
                            let mut state = unsearched(task, status);
                            state.improve(ObjectiveValue::exactly(cost.clone()), model.clone());
                            state
                        })
                        .collect());
                }
            }
        }

        let values = tasks
            .iter()
            .zip(&current)
            .map(|(task, cost)| ObjectiveValue::exactly(task.target.cost(cost.clone())))
            .collect::<Vec<_>>();
        log::log!(
            target: targets::PARETO,
            level,
            "point {} after {improvements} improvements: ({})",
            run.points.len() + 1,
            values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );

        run.blocks.push(block(&store, tasks, &current)?);
        run.points.push(ParetoPoint {
            values,
            model: model.clone(),
        });

        Ok(tasks
            .iter()
            .zip(&current)
            .map(|(task, cost)| {
                SearchState::point(
                    task.target.sense,
                    ObjectiveValue::exactly(cost.clone()),
                    model.clone(),
                )
            })
            .collect())
    })
}
