/*!
A bounded simplex, for deciding conjunctions of linear bounds and for optimizing a variable with respect to those bounds.

# Overview

The tableau holds rows `xᵢ = Σ aᵢⱼxⱼ`, with each *basic* variable `xᵢ` defined in terms of *nonbasic* variables `xⱼ`.
Each variable has a value, and an optional lower and upper bound, with values and bounds as [DeltaRational]s to allow strict bounds.

The invariants maintained are:
- Each row holds on the values of the variables.
- Each nonbasic variable is within its bounds.

A [check](Simplex::check) restores bounds on basic variables by pivoting, choosing the least violated basic variable and the least suitable nonbasic variable.
If no suitable nonbasic variable exists the row and the bounds of its variables are inconsistent, and the literals responsible for those bounds are returned as an explanation.

An [optimization](Simplex::optimize) moves from a feasible tableau towards an optimal value of some variable, again choosing the least suitable variable to enter and leave the basis.

# Bounds

Bounds are either *static*, given when a variable is created and held throughout, or *asserted* with some literal as a reason.
Asserted bounds are cleared with [reset_bounds](Simplex::reset_bounds), while values are kept as a starting point for the next check.
*/

use std::collections::BTreeMap;

use num::{One, Signed, Zero};

use super::{linear::add_to, BoundKind};
use crate::{
    misc::log::targets,
    numeric::{delta::DeltaRational, Rational},
    sat::literal::Literal,
};

/// The index of a variable of the tableau.
pub type VarId = usize;

/// The literals responsible for a conflict.
pub type Explanation = Vec<Literal>;

/// A bound on a variable, and the literal responsible for the bound if the bound is not static.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bound {
    pub value: DeltaRational,
    pub reason: Option<Literal>,
}

/// The result of an optimization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Optimum {
    Unbounded,
    Bounded(DeltaRational),
}

#[derive(Clone, Debug)]
struct Var {
    value: DeltaRational,
    lower: Option<Bound>,
    upper: Option<Bound>,
    static_lower: Option<DeltaRational>,
    static_upper: Option<DeltaRational>,
    is_int: bool,
    is_slack: bool,
    row: Option<usize>,
}

impl Var {
    fn fresh(is_int: bool, is_slack: bool) -> Self {
        Var {
            value: DeltaRational::default(),
            lower: None,
            upper: None,
            static_lower: None,
            static_upper: None,
            is_int,
            is_slack,
            row: None,
        }
    }

    fn below_lower(&self) -> bool {
        self.lower
            .as_ref()
            .is_some_and(|lower| self.value < lower.value)
    }

    fn above_upper(&self) -> bool {
        self.upper
            .as_ref()
            .is_some_and(|upper| self.value > upper.value)
    }

    fn may_increase(&self) -> bool {
        self.upper
            .as_ref()
            .map_or(true, |upper| self.value < upper.value)
    }

    fn may_decrease(&self) -> bool {
        self.lower
            .as_ref()
            .map_or(true, |lower| self.value > lower.value)
    }
}

#[derive(Clone, Debug)]
struct Row {
    basic: VarId,
    coefficients: BTreeMap<VarId, Rational>,
}

#[derive(Default)]
pub struct Simplex {
    vars: Vec<Var>,
    rows: Vec<Row>,

    /// A count of pivots made.
    pub pivots: usize,
}

impl Simplex {
    /// A fresh variable, with value zero and no bounds.
    pub fn new_var(&mut self, is_int: bool) -> VarId {
        self.vars.push(Var::fresh(is_int, false));
        self.vars.len() - 1
    }

    /// A fresh basic variable, defined as `Σ aⱼxⱼ` for the given coefficients.
    ///
    /// `is_int` notes the variable takes integral values on each integral assignment to the other variables.
    pub fn add_row(&mut self, coefficients: &BTreeMap<VarId, Rational>, is_int: bool) -> VarId {
        let mut row = BTreeMap::default();
        for (var, coefficient) in coefficients {
            match self.vars[*var].row {
                Some(index) => {
                    for (nonbasic, a) in &self.rows[index].coefficients {
                        add_to(&mut row, *nonbasic, a * coefficient);
                    }
                }
                None => add_to(&mut row, *var, coefficient.clone()),
            }
        }

        let slack = self.vars.len();
        let mut var = Var::fresh(is_int, true);
        var.value = self.row_value(&row);
        var.row = Some(self.rows.len());
        self.vars.push(var);
        self.rows.push(Row {
            basic: slack,
            coefficients: row,
        });
        slack
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn value(&self, var: VarId) -> &DeltaRational {
        &self.vars[var].value
    }

    /// True if the variable was given as integral on creation.
    pub fn is_int(&self, var: VarId) -> bool {
        self.vars[var].is_int
    }

    /// True if the variable was created by [add_row](Simplex::add_row).
    pub fn is_slack(&self, var: VarId) -> bool {
        self.vars[var].is_slack
    }

    /// Sets a static bound on `var`.
    pub fn set_static(&mut self, var: VarId, kind: BoundKind, value: Rational) {
        let value = DeltaRational::from(value);
        match kind {
            BoundKind::Lower => self.vars[var].static_lower = Some(value.clone()),
            BoundKind::Upper => self.vars[var].static_upper = Some(value.clone()),
        }
        let bound = Bound {
            value,
            reason: None,
        };
        match kind {
            BoundKind::Lower => self.vars[var].lower = Some(bound),
            BoundKind::Upper => self.vars[var].upper = Some(bound),
        }
        self.settle(var);
    }

    /// Removes each asserted bound, leaving static bounds.
    pub fn reset_bounds(&mut self) {
        for var in self.vars.iter_mut() {
            var.lower = var.static_lower.clone().map(|value| Bound {
                value,
                reason: None,
            });
            var.upper = var.static_upper.clone().map(|value| Bound {
                value,
                reason: None,
            });
        }
    }

    /// Asserts a bound on `var`, returning an explanation if the bound conflicts with the opposing bound of `var`.
    pub fn assert_bound(
        &mut self,
        var: VarId,
        kind: BoundKind,
        value: DeltaRational,
        reason: Literal,
    ) -> Result<(), Explanation> {
        let entry = &self.vars[var];
        let (same, opposing) = match kind {
            BoundKind::Upper => (&entry.upper, &entry.lower),
            BoundKind::Lower => (&entry.lower, &entry.upper),
        };

        if let Some(existing) = same {
            let redundant = match kind {
                BoundKind::Upper => existing.value <= value,
                BoundKind::Lower => existing.value >= value,
            };
            if redundant {
                return Ok(());
            }
        }

        if let Some(opposing) = opposing {
            let conflict = match kind {
                BoundKind::Upper => value < opposing.value,
                BoundKind::Lower => value > opposing.value,
            };
            if conflict {
                let mut explanation = vec![reason];
                explanation.extend(opposing.reason);
                return Err(explanation);
            }
        }

        let bound = Bound {
            value,
            reason: Some(reason),
        };
        match kind {
            BoundKind::Upper => self.vars[var].upper = Some(bound),
            BoundKind::Lower => self.vars[var].lower = Some(bound),
        }
        self.settle(var);
        Ok(())
    }

    /// Moves a nonbasic variable within its bounds.
    fn settle(&mut self, var: VarId) {
        if self.vars[var].row.is_some() {
            return;
        }
        let entry = &self.vars[var];
        if entry.below_lower() {
            if let Some(lower) = &entry.lower {
                let target = lower.value.clone();
                self.update(var, target);
            }
        } else if entry.above_upper() {
            if let Some(upper) = &entry.upper {
                let target = upper.value.clone();
                self.update(var, target);
            }
        }
    }

    fn row_value(&self, row: &BTreeMap<VarId, Rational>) -> DeltaRational {
        let mut value = DeltaRational::default();
        for (var, coefficient) in row {
            value = &value + &self.vars[*var].value.scale(coefficient);
        }
        value
    }

    /// Sets the value of a nonbasic variable, and updates each basic variable.
    fn update(&mut self, var: VarId, value: DeltaRational) {
        let difference = &value - &self.vars[var].value;
        for row in &self.rows {
            if let Some(coefficient) = row.coefficients.get(&var) {
                let basic = &mut self.vars[row.basic];
                basic.value = &basic.value + &difference.scale(coefficient);
            }
        }
        self.vars[var].value = value;
    }

    /// Exchanges the basic variable of `row_index` with `entering`.
    fn pivot(&mut self, row_index: usize, entering: VarId) {
        let leaving = self.rows[row_index].basic;
        let mut coefficients = std::mem::take(&mut self.rows[row_index].coefficients);
        let Some(a) = coefficients.remove(&entering) else {
            self.rows[row_index].coefficients = coefficients;
            return;
        };
        self.pivots += 1;

        let inverse = Rational::one() / &a;
        let mut definition: BTreeMap<VarId, Rational> = coefficients
            .into_iter()
            .map(|(var, coefficient)| (var, -(coefficient * &inverse)))
            .collect();
        definition.insert(leaving, inverse);

        for (index, row) in self.rows.iter_mut().enumerate() {
            if index == row_index {
                continue;
            }
            if let Some(coefficient) = row.coefficients.remove(&entering) {
                for (var, d) in &definition {
                    add_to(&mut row.coefficients, *var, &coefficient * d);
                }
            }
        }

        self.rows[row_index] = Row {
            basic: entering,
            coefficients: definition,
        };
        self.vars[leaving].row = None;
        self.vars[entering].row = Some(row_index);
    }

    /// Sets the value of the basic variable of `row_index` to `value` by adjusting `entering`, and pivots.
    fn pivot_and_update(&mut self, row_index: usize, entering: VarId, value: DeltaRational) {
        let leaving = self.rows[row_index].basic;
        let Some(a) = self.rows[row_index].coefficients.get(&entering).cloned() else {
            return;
        };

        let theta = (&value - &self.vars[leaving].value).scale(&(Rational::one() / a));
        self.vars[leaving].value = value;
        let entering_value = &self.vars[entering].value + &theta;
        self.vars[entering].value = entering_value;

        for (index, row) in self.rows.iter().enumerate() {
            if index == row_index {
                continue;
            }
            if let Some(coefficient) = row.coefficients.get(&entering) {
                let basic = &mut self.vars[row.basic];
                basic.value = &basic.value + &theta.scale(coefficient);
            }
        }

        self.pivot(row_index, entering);
    }

    /// Restores the bounds of each basic variable, or returns an explanation of why this is not possible.
    pub fn check(&mut self) -> Result<(), Explanation> {
        loop {
            let violation = self
                .rows
                .iter()
                .enumerate()
                .filter_map(|(index, row)| {
                    let basic = &self.vars[row.basic];
                    if basic.below_lower() {
                        Some((row.basic, index, true))
                    } else if basic.above_upper() {
                        Some((row.basic, index, false))
                    } else {
                        None
                    }
                })
                .min_by_key(|(basic, _, _)| *basic);

            let Some((basic, row_index, below)) = violation else {
                return Ok(());
            };

            let row = &self.rows[row_index];
            let entering = row
                .coefficients
                .iter()
                .find(|(var, a)| {
                    let var = &self.vars[**var];
                    match a.is_positive() == below {
                        true => var.may_increase(),
                        false => var.may_decrease(),
                    }
                })
                .map(|(var, _)| *var);

            match entering {
                Some(entering) => {
                    let target = match below {
                        true => self.vars[basic].lower.as_ref(),
                        false => self.vars[basic].upper.as_ref(),
                    }
                    .map(|bound| bound.value.clone())
                    .unwrap_or_default();
                    self.pivot_and_update(row_index, entering, target);
                }

                None => {
                    let explanation = self.explain(row_index, below);
                    log::trace!(target: targets::SIMPLEX, "Conflict on row of {basic}: {explanation:?}");
                    return Err(explanation);
                }
            }
        }
    }

    /// The reasons for the bounds which prevent the basic variable of `row_index` from reaching its bound.
    fn explain(&self, row_index: usize, below: bool) -> Explanation {
        let row = &self.rows[row_index];
        let basic = &self.vars[row.basic];

        let mut explanation = Vec::default();
        let violated = match below {
            true => &basic.lower,
            false => &basic.upper,
        };
        explanation.extend(violated.as_ref().and_then(|bound| bound.reason));

        for (var, a) in &row.coefficients {
            let var = &self.vars[*var];
            let blocking = match a.is_positive() == below {
                true => &var.upper,
                false => &var.lower,
            };
            explanation.extend(blocking.as_ref().and_then(|bound| bound.reason));
        }

        explanation.sort();
        explanation.dedup();
        explanation
    }

    /// Minimizes (or maximizes) the value of `var`, assuming the tableau is feasible.
    pub fn optimize(&mut self, var: VarId, minimize: bool) -> Optimum {
        loop {
            let objective: BTreeMap<VarId, Rational> = match self.vars[var].row {
                Some(index) => self.rows[index]
                    .coefficients
                    .iter()
                    .map(|(nonbasic, a)| match minimize {
                        true => (*nonbasic, a.clone()),
                        false => (*nonbasic, -a),
                    })
                    .collect(),
                None => {
                    let mut objective = BTreeMap::default();
                    let unit = match minimize {
                        true => Rational::one(),
                        false => -Rational::one(),
                    };
                    objective.insert(var, unit);
                    objective
                }
            };

            let entering = objective.iter().find_map(|(nonbasic, c)| {
                let entry = &self.vars[*nonbasic];
                if c.is_negative() && entry.may_increase() {
                    Some((*nonbasic, true))
                } else if c.is_positive() && entry.may_decrease() {
                    Some((*nonbasic, false))
                } else {
                    None
                }
            });

            let Some((entering, increase)) = entering else {
                return Optimum::Bounded(self.vars[var].value.clone());
            };

            let entry = &self.vars[entering];
            let mut best: Option<(DeltaRational, Option<(usize, VarId, DeltaRational)>)> =
                match increase {
                    true => entry
                        .upper
                        .as_ref()
                        .map(|upper| (&upper.value - &entry.value, None)),
                    false => entry
                        .lower
                        .as_ref()
                        .map(|lower| (&entry.value - &lower.value, None)),
                };

            for (index, row) in self.rows.iter().enumerate() {
                let Some(a) = row.coefficients.get(&entering) else {
                    continue;
                };
                let rate = match increase {
                    true => a.clone(),
                    false => -a,
                };
                let basic = &self.vars[row.basic];
                let limit = match rate.is_positive() {
                    true => basic.upper.as_ref().map(|upper| {
                        let step = (&upper.value - &basic.value).scale(&(Rational::one() / &rate));
                        (step, upper.value.clone())
                    }),
                    false => basic.lower.as_ref().map(|lower| {
                        let step = (&basic.value - &lower.value).scale(&(Rational::one() / -&rate));
                        (step, lower.value.clone())
                    }),
                };

                let Some((step, target)) = limit else {
                    continue;
                };

                let replace = match &best {
                    None => true,
                    Some((best_step, best_leaving)) => {
                        step < *best_step
                            || (step == *best_step
                                && best_leaving
                                    .as_ref()
                                    .is_some_and(|(_, leaving, _)| row.basic < *leaving))
                    }
                };
                if replace {
                    best = Some((step, Some((index, row.basic, target))));
                }
            }

            match best {
                None => return Optimum::Unbounded,

                Some((step, None)) => {
                    let value = match increase {
                        true => &self.vars[entering].value + &step,
                        false => &self.vars[entering].value - &step,
                    };
                    self.update(entering, value);
                }

                Some((_, Some((row_index, _, target)))) => {
                    self.pivot_and_update(row_index, entering, target);
                }
            }
        }
    }

    /// A positive rational δ₀ such that fixing δ to δ₀ respects each bound.
    pub fn delta_witness(&self) -> Rational {
        let mut witness = Rational::one();
        for var in &self.vars {
            if let Some(lower) = &var.lower {
                // lower.real + lower.delta·δ ≤ value.real + value.delta·δ
                if lower.value.real < var.value.real && lower.value.delta > var.value.delta {
                    let limit = (&var.value.real - &lower.value.real)
                        / (&lower.value.delta - &var.value.delta);
                    if limit < witness {
                        witness = limit;
                    }
                }
            }
            if let Some(upper) = &var.upper {
                if var.value.real < upper.value.real && var.value.delta > upper.value.delta {
                    let limit = (&upper.value.real - &var.value.real)
                        / (&var.value.delta - &upper.value.delta);
                    if limit < witness {
                        witness = limit;
                    }
                }
            }
        }
        witness
    }

    /// Each integral variable which is not a slack with a value which is not an integer.
    pub fn fractional_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.vars.iter().enumerate().filter_map(|(id, var)| {
            let integral = var.value.delta.is_zero() && var.value.real.is_integer();
            match var.is_int && !var.is_slack && !integral {
                true => Some(id),
                false => None,
            }
        })
    }
}
