//! The choice between a linear and a binary step.

use super::{binary, Session};
use crate::{
    config::SearchStrategy,
    numeric::Rational,
    objective::{Domain, SearchState},
    oracle::Oracle,
};

/// The next step of a search.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Plan {
    Linear,
    Binary(Rational),
}

/// Plans the next step of a search, given the strategy of the session.
pub(super) fn plan<O: Oracle + ?Sized>(
    session: &Session<'_, O>,
    state: &SearchState,
    domain: Domain,
) -> Plan {
    let config = session.config;
    let first = state.steps == 0;

    let linear_first = match session.strategy() {
        SearchStrategy::Linear => return Plan::Linear,
        SearchStrategy::Binary => {
            first && (config.bin_first_step_linear.value || !state.upper.is_finite())
        }
        SearchStrategy::Adaptive => first || !state.lower.is_finite(),
    };
    if linear_first {
        return Plan::Linear;
    }

    let limit = config.bin_max_consecutive.value;
    if limit > 0 && state.consecutive_refutations >= limit {
        return Plan::Linear;
    }

    match binary::pivot(
        &state.lower,
        &state.upper,
        &config.bin_pivot_position.value,
        domain,
    ) {
        Some(pivot) => Plan::Binary(pivot),
        None => Plan::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        numeric::{ratio, rational},
        objective::{ObjectiveValue, Sense},
        oracle::SmtOracle,
        terms::TermStore,
    };

    fn plan_with(config: &Config, state: &SearchState) -> Plan {
        let mut oracle = SmtOracle::new(TermStore::default(), config.sat.clone()).unwrap();
        let mut never = || false;
        let session = Session {
            oracle: &mut oracle,
            config,
            terminate: &mut never,
        };
        plan(&session, state, Domain::Int)
    }

    fn window(lower: i64, upper: i64) -> SearchState {
        SearchState::new(
            Sense::Minimize,
            ObjectiveValue::exactly(rational(lower)),
            ObjectiveValue::exactly(rational(upper)),
        )
    }

    #[test]
    fn first_steps() {
        let mut config = Config::default();
        config.strategy.value = SearchStrategy::Binary;
        assert_eq!(plan_with(&config, &window(23, 100)), Plan::Linear);

        config.bin_first_step_linear.value = false;
        assert_eq!(
            plan_with(&config, &window(23, 100)),
            Plan::Binary(ratio(123, 2))
        );

        config.strategy.value = SearchStrategy::Adaptive;
        assert_eq!(plan_with(&config, &window(23, 100)), Plan::Linear);
    }

    #[test]
    fn consecutive_refutations() {
        let mut config = Config::default();
        config.strategy.value = SearchStrategy::Binary;

        let mut state = window(0, 100);
        state.steps = 3;
        state.consecutive_refutations = 2;
        assert_eq!(plan_with(&config, &state), Plan::Linear);

        config.bin_max_consecutive.value = 0;
        assert_eq!(plan_with(&config, &state), Plan::Binary(rational(50)));
    }

    #[test]
    fn adaptive_without_lower_bound() {
        let mut config = Config::default();
        config.strategy.value = SearchStrategy::Adaptive;

        let mut state = SearchState::new(
            Sense::Minimize,
            ObjectiveValue::MinusInfinity,
            ObjectiveValue::exactly(rational(10)),
        );
        state.steps = 1;
        assert_eq!(plan_with(&config, &state), Plan::Linear);

        config.strategy.value = SearchStrategy::Binary;
        assert_eq!(plan_with(&config, &state), Plan::Binary(rational(0)));
    }
}
