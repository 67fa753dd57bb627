/*!
The solve procedure.

# Overview

A loop of:
- [Propagation](crate::sat::procedures::bcp), and on a conflict [analysis](crate::sat::procedures::analysis) followed by a [backjump](crate::sat::procedures::backjump) and assertion of the learnt clause.
- Otherwise, a decision on the next assumption, or if each assumption holds a [free decision](crate::sat::procedures::decision).

The loop ends when:
- Every atom has a value, and the clauses are satisfiable.
- A conflict is found at level zero, and the clauses are unsatisfiable.
- Some assumption is false, and the clauses are unsatisfiable given the assumptions.
- The terminate predicate returns true, and the result is unknown.

Restarts are scheduled by the luby sequence, scaled by [luby_u](crate::config::sat::SatConfig::luby_u).

Each assumption takes a level of its own, and a level is opened without an assignment if an assumption already holds, so the assumption at index `i` is always decided at level `i + 1`.
*/

use crate::{
    generic::luby::Luby,
    misc::log::targets,
    reports::Report,
    sat::{literal::Literal, ContextState, SatContext},
    types::err::ErrorKind,
};

impl<R: rand::Rng + std::default::Default> SatContext<R> {
    /// Determines the satisfiability of the clauses of the context given `assumptions`.
    ///
    /// `terminate` is polled on each iteration, and the solve ends with an unknown result if it returns true.
    pub fn solve_given(
        &mut self,
        assumptions: &[Literal],
        terminate: &mut dyn FnMut() -> bool,
    ) -> Result<Report, ErrorKind> {
        self.counters.solves += 1;
        self.failed.clear();
        self.backjump(0);

        if self.state == ContextState::Unsatisfiable {
            return Ok(Report::Unsatisfiable);
        }
        self.state = ContextState::Input;

        for assumption in assumptions {
            while self.trail.atom_count() <= assumption.atom() as usize {
                self.fresh_atom();
            }
        }

        if self.bcp().is_some() {
            self.state = ContextState::Unsatisfiable;
            return Ok(Report::Unsatisfiable);
        }

        let mut luby = Luby::default();
        let mut fresh_conflicts: u64 = 0;
        let mut restart_limit = self.restart_limit(&mut luby);

        loop {
            self.counters.total_iterations += 1;
            if terminate() {
                log::info!(target: targets::PROPAGATION, "Solve terminated by callback");
                self.backjump(0);
                return Ok(Report::Unknown);
            }

            if let Some(conflict) = self.bcp() {
                self.counters.total_conflicts += 1;
                fresh_conflicts += 1;

                if self.trail.decision_level() == 0 {
                    self.state = ContextState::Unsatisfiable;
                    return Ok(Report::Unsatisfiable);
                }

                let analysis = self.conflict_analysis(conflict)?;
                self.backjump(analysis.level);

                let asserted = analysis.clause[0];
                match analysis.clause.len() {
                    1 => self.trail.assign(asserted, None),
                    _ => {
                        let key = self.clause_db.store(analysis.clause, true);
                        self.trail.assign(asserted, Some(key));
                    }
                }
                self.decay_activity();
                continue;
            }

            if self.config.restart.value && fresh_conflicts >= restart_limit {
                self.backjump(0);
                self.counters.restarts += 1;
                fresh_conflicts = 0;
                restart_limit = self.restart_limit(&mut luby);
                continue;
            }

            let mut decision = None;
            while (self.trail.decision_level() as usize) < assumptions.len() {
                let assumption = assumptions[self.trail.decision_level() as usize];
                match self.trail.value_of(assumption) {
                    Some(true) => self.trail.new_level(),

                    Some(false) => {
                        self.failed = self.failed_assumptions_from(assumption)?;
                        self.backjump(0);
                        return Ok(Report::Unsatisfiable);
                    }

                    None => {
                        decision = Some(assumption);
                        break;
                    }
                }
            }

            let decision = match decision {
                Some(assumption) => assumption,
                None => match self.make_decision() {
                    Some(literal) => literal,
                    None => {
                        self.state = ContextState::Satisfiable;
                        return Ok(Report::Satisfiable);
                    }
                },
            };

            self.trail.new_level();
            self.trail.assign(decision, None);
        }
    }

    fn restart_limit(&self, luby: &mut Luby) -> u64 {
        let element = luby.next().unwrap_or(u32::MAX) as u64;
        element * self.config.luby_u.value as u64
    }
}
