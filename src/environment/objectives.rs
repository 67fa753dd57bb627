//! Creation, assertion, and inspection of objectives.

use super::{generic::ObjectiveEntry, GenericEnvironment};
use crate::{
    config::MaxSMTEngine,
    misc::log::targets,
    model::Model,
    numeric::Rational,
    objective::{
        Domain, Goal, Objective, ObjectiveKind, ObjectiveValue, Prepared, SearchState,
        SearchStatus, Target, Window,
    },
    oracle::Oracle,
    terms::{Sort, Term, TermStore},
    types::err::{ErrorKind, HandleError, StateError, TermError, TypeError},
};

/// The value of a ground bound, checked against the sort of the objective.
fn bound_value(store: &TermStore, bound: Term, sort: Sort, signed: bool) -> Result<Rational, ErrorKind> {
    if !store.is_ground(bound)? {
        return Err(TermError::NotGround.into());
    }

    let bound_sort = store.sort(bound)?;
    let compatible = match sort {
        Sort::BitVector(_) => bound_sort == sort,
        _ => sort.is_numeric() && bound_sort.is_numeric(),
    };
    if !compatible {
        return Err(TypeError::Incompatible(sort, bound_sort).into());
    }

    Model::default().eval_rational(store, bound, signed)
}

/// The sort shared by the terms of an objective.
fn objective_sort(store: &TermStore, terms: &[Term]) -> Result<Sort, ErrorKind> {
    let Some((first, rest)) = terms.split_first() else {
        return Err(TermError::EmptyObjective.into());
    };
    let mut sort = store.sort(*first)?;
    for term in rest {
        sort = sort.join(store.sort(*term)?)?;
    }
    Ok(sort)
}

impl<O: Oracle> GenericEnvironment<O> {
    /// The entry of `objective`, if `objective` is a live objective of the environment.
    pub(super) fn entry(&self, objective: Objective) -> Result<&ObjectiveEntry, ErrorKind> {
        if objective.environment != self.id {
            return Err(HandleError::ForeignObjective.into());
        }
        match self.objectives.get(objective.key) {
            None => Err(HandleError::DestroyedObjective.into()),
            Some(entry) if entry.stale => Err(StateError::StaleObjective.into()),
            Some(entry) => Ok(entry),
        }
    }

    fn entry_mut(&mut self, objective: Objective) -> Result<&mut ObjectiveEntry, ErrorKind> {
        self.entry(objective)?;
        self.objectives
            .get_mut(objective.key)
            .ok_or(HandleError::DestroyedObjective.into())
    }

    fn handle(&self, key: crate::objective::ObjectiveKey) -> Objective {
        Objective {
            environment: self.id,
            key,
        }
    }

    /// Creates an objective from `goal`.
    ///
    /// The objective has no effect on a solve until [asserted](GenericEnvironment::assert_objective).
    /// Bounds of the goal are evaluated when the objective is created.
    ///
    /// # Errors
    /// - An objective without terms, or a minimization or maximization of more than one term.
    /// - Terms of boolean or floating point sort, or of incompatible sorts.
    /// - Bounds which contain a symbol, or are incompatible with the sort of the objective.
    pub fn create_objective(&mut self, goal: Goal) -> Result<Objective, ErrorKind> {
        let store = self.oracle.terms().clone();

        if matches!(goal.kind, ObjectiveKind::Minimize | ObjectiveKind::Maximize) && goal.terms.len() > 1 {
            return Err(TermError::Arity.into());
        }
        let sort = objective_sort(&store, &goal.terms)?;
        let domain = Domain::of(sort, goal.signed)?;
        let signed = domain.is_signed();
        let sense = goal.sense();

        let lower = match goal.lower {
            Some(bound) => Some(bound_value(&store, bound, sort, signed)?),
            None => None,
        };
        let upper = match goal.upper {
            Some(bound) => Some(bound_value(&store, bound, sort, signed)?),
            None => None,
        };

        let (term, definitions) = match goal.kind {
            ObjectiveKind::Minimize | ObjectiveKind::Maximize => (goal.terms[0], Vec::default()),

            ObjectiveKind::MinMax | ObjectiveKind::MaxMin => {
                let base = match goal.kind {
                    ObjectiveKind::MinMax => "minmax",
                    _ => "maxmin",
                };
                let symbol = store.fresh_symbol(base, sort)?;
                let mut definitions = Vec::with_capacity(goal.terms.len() + 1);
                let mut equalities = Vec::with_capacity(goal.terms.len());
                for term in &goal.terms {
                    let bounding = match goal.kind {
                        ObjectiveKind::MinMax => store.ordered(*term, symbol, false, signed)?,
                        _ => store.ordered(symbol, *term, false, signed)?,
                    };
                    definitions.push(bounding);
                    equalities.push(store.eq(symbol, *term)?);
                }
                definitions.push(store.or(&equalities)?);
                (symbol, definitions)
            }
        };

        let label = match goal.terms.as_slice() {
            [single] if definitions.is_empty() => format!("obj({})", store.display(*single)?),
            terms => {
                let mut written = Vec::with_capacity(terms.len());
                for term in terms {
                    written.push(store.display(*term)?);
                }
                format!("obj({} {})", goal.kind, written.join(" "))
            }
        };

        let target = Target { term, sense, domain };
        let window = Window::from_values(&target, lower, upper);
        log::debug!(target: targets::ENVIRONMENT, "{label} created with window [ {}, {} )", window.lower, window.upper);

        let entry = ObjectiveEntry {
            goal,
            label,
            target,
            definitions,
            window,
            created_at: self.oracle.depth(),
            asserted_at: None,
            stale: false,
            state: None,
        };
        let key = self.objectives.insert(entry);
        Ok(self.handle(key))
    }

    /// Asserts `objective`, to be optimized by each later solve.
    ///
    /// Asserting an asserted objective has no effect.
    pub fn assert_objective(&mut self, objective: Objective) -> Result<(), ErrorKind> {
        let depth = self.oracle.depth();
        let entry = self.entry_mut(objective)?;
        if entry.asserted_at.is_some() {
            return Ok(());
        }
        entry.asserted_at = Some(depth);
        self.asserted.push(objective.key);
        self.reset_pareto();
        Ok(())
    }

    /// Destroys `objective`, after which any use of the handle is an error.
    pub fn destroy_objective(&mut self, objective: Objective) -> Result<(), ErrorKind> {
        if objective.environment != self.id {
            return Err(HandleError::ForeignObjective.into());
        }
        match self.objectives.remove(objective.key) {
            Some(_) => {
                self.asserted.retain(|key| *key != objective.key);
                self.reset_pareto();
                Ok(())
            }
            None => Err(HandleError::DestroyedObjective.into()),
        }
    }

    /// The asserted objectives, in order of assertion.
    pub fn objectives(&self) -> Vec<Objective> {
        self.asserted.iter().map(|key| self.handle(*key)).collect()
    }

    pub fn objective_goal(&self, objective: Objective) -> Result<&Goal, ErrorKind> {
        Ok(&self.entry(objective)?.goal)
    }

    /// The state of the most recent search for the optimum of `objective`.
    pub fn objective_state(&self, objective: Objective) -> Result<&SearchState, ErrorKind> {
        match &self.entry(objective)?.state {
            Some(state) => Ok(state),
            None => Err(StateError::NoValue.into()),
        }
    }

    /// The status of the most recent search for the optimum of `objective`, and [Unknown](SearchStatus::Unknown) if no search has been made.
    pub fn objective_status(&self, objective: Objective) -> Result<SearchStatus, ErrorKind> {
        match &self.entry(objective)?.state {
            Some(state) => Ok(state.status),
            None => Ok(SearchStatus::Unknown),
        }
    }

    /// The value of the best model found for `objective`.
    ///
    /// It is an error if no model was found.
    pub fn objective_value(&self, objective: Objective) -> Result<ObjectiveValue, ErrorKind> {
        match &self.entry(objective)?.state {
            Some(state) if state.witnessed() => Ok(state.value()),
            _ => Err(StateError::NoValue.into()),
        }
    }

    /// The least and greatest values the optimum of `objective` may take, given the most recent search.
    pub fn objective_interval(
        &self,
        objective: Objective,
    ) -> Result<(ObjectiveValue, ObjectiveValue), ErrorKind> {
        Ok(self.objective_state(objective)?.interval())
    }

    /// The asserted objectives, prepared for search, with the definitions to be asserted before any search.
    pub(super) fn prepare(&self) -> Result<(Vec<Term>, Vec<Prepared>), ErrorKind> {
        let store = self.oracle.terms();

        let mut definitions = Vec::default();
        for group in &self.groups {
            definitions.push(group.definition(store)?);
        }

        let mut tasks = Vec::with_capacity(self.asserted.len());
        for key in &self.asserted {
            let Some(entry) = self.objectives.get(*key) else {
                continue;
            };
            definitions.extend(entry.definitions.iter().copied());

            let relaxation = match (self.config.maxsmt_engine.value, entry.goal.kind) {
                (MaxSMTEngine::MaxRes, ObjectiveKind::Minimize) => self
                    .groups
                    .iter()
                    .find(|group| group.symbol == entry.target.term)
                    .map(|group| group.weighted()),
                _ => None,
            };

            tasks.push(Prepared {
                label: entry.label.clone(),
                target: entry.target.clone(),
                window: entry.window.clone(),
                relaxation,
            });
        }

        Ok((definitions, tasks))
    }
}
