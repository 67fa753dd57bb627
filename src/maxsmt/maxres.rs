/*!
Core-guided minimization of violated weight.

Each soft constraint is assumed in a check of the oracle.
While the check is unsatisfiable, a core `φ₁, …, φₖ` of the soft constraints is relaxed:

- The least weight `w` of the core is added to the lower bound, and the weight of each constraint in the core is reduced by `w`.
- For each `i < k` the constraint `φᵢ₊₁ ∨ (φ₁ ∧ … ∧ φᵢ)` is added with weight `w`.

As at least one constraint of a core is violated, the cost of any assignment to the relaxed constraints plus the lower bound is the cost of the assignment to the original constraints.
So, the first model of the relaxed constraints is optimal, with cost the lower bound.
A core without soft constraints is a refutation of the hard constraints, within the bounds of the objective.
*/

use std::collections::BTreeMap;

use num::Zero;

use super::normalize;
use crate::{
    misc::log::targets,
    numeric::{format_rational, Rational},
    objective::{ObjectiveValue, Prepared, SearchState, SearchStatus, StepKind, StepOutcome},
    oracle::{self, Oracle, SatResult},
    search::Session,
    terms::{Term, TermStore},
    types::err::ErrorKind,
};

/// Minimizes the violated weight of `softs`, with the target of `task` the symbol of the group.
pub fn minimize<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
    softs: &[(Term, Rational)],
) -> Result<SearchState, ErrorKind> {
    let level = session.trace_level();
    let target = &task.target;
    let mut state = SearchState::new(
        target.sense,
        task.window.lower.clone(),
        task.window.upper.clone(),
    );

    log::log!(target: targets::MAXSMT, level, "{} - maxres start: {}", task.label, state.interval_string());

    if task.window.is_empty(target.domain) {
        state.status = SearchStatus::Unsat;
        return Ok(state);
    }

    let store = session.oracle.terms().clone();
    let normalized = normalize(&store, softs)?;

    let mut window = Vec::default();
    if let Some(lower) = task.window.lower.real() {
        window.push(target.at_least(&store, lower)?);
    }
    if let ObjectiveValue::Finite(upper) = &task.window.upper {
        window.push(target.below(&store, upper)?);
    }

    let Session {
        oracle,
        terminate,
        config,
    } = session;

    let outcome = oracle::checkpointed(&mut **oracle, |oracle| {
        for bound in window {
            oracle.assert_hard(bound)?;
        }

        let mut softs = normalized.softs;
        let mut lower_bound = normalized.offset;

        loop {
            let assumptions = softs.keys().copied().collect::<Vec<_>>();
            state.steps += 1;
            log::log!(target: targets::MAXSMT, level, "{} - relaxation step: {}, {} soft", task.label, state.steps, assumptions.len());

            match oracle.check_sat(&assumptions, &mut **terminate)? {
                SatResult::Sat => {
                    let model = oracle.get_model()?;
                    let cost = target.model_cost(&store, &model)?;
                    if cost != lower_bound {
                        log::warn!(target: targets::MAXSMT, "{} - model cost {} differs from bound {}", task.label, format_rational(&cost), format_rational(&lower_bound));
                    }
                    state.improve(ObjectiveValue::exactly(cost.clone()), model);
                    state.lower = ObjectiveValue::exactly(cost);
                    state.status = SearchStatus::SatOptimal;
                    state.record(StepKind::Relaxation, None, StepOutcome::Improved);
                    return Ok(());
                }

                SatResult::Unknown => {
                    state.status = SearchStatus::Unknown;
                    state.record(StepKind::Relaxation, None, StepOutcome::Interrupted);
                    return Ok(());
                }

                SatResult::Unsat => {
                    let core = oracle.unsat_core()?;
                    let weight = relax(&store, &mut softs, &core)?;
                    if weight.is_zero() {
                        state.lower = state.upper.clone();
                        state.status = SearchStatus::Unsat;
                        state.record(StepKind::Relaxation, None, StepOutcome::Refuted);
                        return Ok(());
                    }

                    lower_bound += &weight;
                    log::log!(target: targets::MAXSMT, level, "{} - core of {}, weight {}", task.label, core.len(), format_rational(&weight));

                    let raised = ObjectiveValue::exactly(lower_bound.clone());
                    if raised > state.lower {
                        state.lower = raised;
                    }
                    state.record(StepKind::Relaxation, None, StepOutcome::Refuted);

                    let interval = config.abort_interval.value;
                    if interval > 0 && state.steps >= interval {
                        state.status = SearchStatus::Unknown;
                        return Ok(());
                    }
                }
            }
        }
    });

    match outcome {
        Ok(()) => {}
        Err(error) if crate::search::is_oracle_failure(&error) => {
            log::warn!(target: targets::MAXSMT, "{} - oracle failure: {error}", task.label);
            state.status = SearchStatus::Unknown;
        }
        Err(error) => return Err(error),
    }

    log::log!(target: targets::MAXSMT, level, "{} - maxres end: {}", task.label, state.status);
    Ok(state)
}

/// Relaxes `core` within `softs`, returning the weight added to the lower bound.
///
/// The weight is zero if and only if no soft constraint is in the core.
fn relax(
    store: &TermStore,
    softs: &mut BTreeMap<Term, Rational>,
    core: &[Term],
) -> Result<Rational, ErrorKind> {
    let mut members = Vec::with_capacity(core.len());
    for term in core {
        if let Some(weight) = softs.get(term) {
            if !members.iter().any(|(member, _)| member == term) {
                members.push((*term, weight.clone()));
            }
        }
    }

    let Some(least) = members.iter().map(|(_, weight)| weight).min().cloned() else {
        return Ok(Rational::zero());
    };

    for (term, weight) in &members {
        let residual = weight - &least;
        match residual.is_zero() {
            true => softs.remove(term),
            false => softs.insert(*term, residual),
        };
    }

    let mut conjunction = members[0].0;
    for (index, (next, _)) in members.iter().enumerate().skip(1) {
        let relaxed = store.or(&[*next, conjunction])?;
        *softs.entry(relaxed).or_insert_with(Rational::zero) += &least;
        if index + 1 < members.len() {
            conjunction = store.and(&[conjunction, *next])?;
        }
    }

    Ok(least)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::rational;

    #[test]
    fn relaxation_of_a_core() {
        let store = TermStore::default();
        let a = store.bool_var("a").unwrap();
        let b = store.bool_var("b").unwrap();
        let c = store.bool_var("c").unwrap();

        let mut softs = BTreeMap::from([(a, rational(1)), (b, rational(3)), (c, rational(2))]);
        let least = relax(&store, &mut softs, &[a, b, c]).unwrap();
        assert_eq!(least, rational(1));

        assert!(!softs.contains_key(&a));
        assert_eq!(softs.get(&b), Some(&rational(2)));
        assert_eq!(softs.get(&c), Some(&rational(1)));

        let first = store.or(&[b, a]).unwrap();
        let second = store.or(&[c, store.and(&[a, b]).unwrap()]).unwrap();
        assert_eq!(softs.get(&first), Some(&rational(1)));
        assert_eq!(softs.get(&second), Some(&rational(1)));
    }
}
