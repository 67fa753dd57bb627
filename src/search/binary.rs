//! Binary steps, asking for a model below a pivot between the bounds.

use num::{One, Zero};

use super::{
    driver::{self, Probe},
    Session,
};
use crate::{
    misc::log::targets,
    numeric::{self, Rational},
    objective::{Domain, ObjectiveValue, Prepared, SearchState, StepKind, StepOutcome},
    oracle::Oracle,
    types::err::ErrorKind,
};

/// A pivot strictly between `lower` and `upper`, if one exists.
///
/// The pivot is at `position` between finite bounds.
/// With no lower bound the pivot is `0` if `upper` is positive, and `2·upper - 1` otherwise.
/// For integral domains the pivot must exclude some integer on each side.
pub(super) fn pivot(
    lower: &ObjectiveValue,
    upper: &ObjectiveValue,
    position: &Rational,
    domain: Domain,
) -> Option<Rational> {
    let upper_real = upper.real()?;

    let pivot = match lower {
        ObjectiveValue::Finite(lower) => &lower.real + position * (upper_real - &lower.real),
        ObjectiveValue::MinusInfinity if upper_real > &Rational::zero() => Rational::zero(),
        ObjectiveValue::MinusInfinity => upper_real * Rational::from_integer(2.into()) - Rational::one(),
        ObjectiveValue::PlusInfinity => return None,
    };

    let as_value = ObjectiveValue::exactly(pivot.clone());
    if !(lower < &as_value && &as_value < upper) {
        return None;
    }

    if domain.is_integral() {
        let ceiling = numeric::ceil(&pivot);
        if ceiling >= numeric::ceil(upper_real) {
            return None;
        }
        if let Some(lower) = lower.real() {
            if numeric::ceil(lower) >= ceiling {
                return None;
            }
        }
    }

    Some(pivot)
}

/// Makes a binary step at `pivot`, updating `state` with the outcome.
pub(super) fn step<O: Oracle + ?Sized>(
    session: &mut Session<'_, O>,
    task: &Prepared,
    state: &mut SearchState,
    pivot: Rational,
) -> Result<StepOutcome, ErrorKind> {
    state.steps += 1;
    state.binary_steps += 1;
    log::log!(target: targets::SEARCH, session.trace_level(), "{} - binary step: {}", task.label, state.binary_steps);
    log::log!(
        target: targets::SEARCH,
        session.trace_level(),
        "{} - pivot: {}",
        task.label,
        numeric::format_rational(&task.target.cost(pivot.clone()))
    );

    let pivot_value = ObjectiveValue::exactly(pivot.clone());
    let bound = driver::below(session, &task.target, &pivot_value)?;

    let outcome = match driver::probe(session, &task.target, bound)? {
        Probe::Improved(cost, model) => {
            state.consecutive_refutations = 0;
            state.improve(cost, model);
            driver::log_upper(session, task, state);
            StepOutcome::Improved
        }

        Probe::Refuted => {
            state.consecutive_refutations += 1;
            state.lower = pivot_value;
            driver::log_lower(session, task, state);
            StepOutcome::Refuted
        }

        Probe::Interrupted => StepOutcome::Interrupted,
    };

    state.record(StepKind::Binary, Some(pivot), outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{ratio, rational};

    fn value(n: i64) -> ObjectiveValue {
        ObjectiveValue::exactly(rational(n))
    }

    #[test]
    fn midpoint() {
        assert_eq!(
            pivot(&value(23), &value(100), &ratio(1, 2), Domain::Int),
            Some(ratio(123, 2))
        );
        assert_eq!(
            pivot(&value(0), &value(8), &ratio(1, 4), Domain::Real),
            Some(rational(2))
        );
    }

    #[test]
    fn no_room_between_integers() {
        // Only a cost of 4 lies within [4, 5).
        assert_eq!(pivot(&value(4), &value(5), &ratio(1, 2), Domain::Int), None);
        assert_eq!(
            pivot(&value(4), &value(5), &ratio(1, 2), Domain::Real),
            Some(ratio(9, 2))
        );
        assert_eq!(
            pivot(&value(4), &value(6), &ratio(1, 2), Domain::Int),
            Some(rational(5))
        );
        assert_eq!(
            pivot(&value(4), &value(7), &ratio(1, 2), Domain::Int),
            Some(ratio(11, 2))
        );
    }

    #[test]
    fn unbounded_below() {
        let unbounded = ObjectiveValue::MinusInfinity;
        assert_eq!(
            pivot(&unbounded, &value(7), &ratio(1, 2), Domain::Int),
            Some(rational(0))
        );
        assert_eq!(
            pivot(&unbounded, &value(-3), &ratio(1, 2), Domain::Int),
            Some(rational(-7))
        );
        assert_eq!(
            pivot(&unbounded, &ObjectiveValue::PlusInfinity, &ratio(1, 2), Domain::Int),
            None
        );
    }
}
