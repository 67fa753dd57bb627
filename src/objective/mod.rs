/*!
Objectives.

An objective is declared by a [Goal], created within an [environment](crate::environment), and referred to by an [Objective] handle.

| Kind | Value |
|---|---|
| [Minimize](ObjectiveKind::Minimize) | the least value of the term |
| [Maximize](ObjectiveKind::Maximize) | the greatest value of the term |
| [MinMax](ObjectiveKind::MinMax) | the least value of the greatest of the terms |
| [MaxMin](ObjectiveKind::MaxMin) | the greatest value of the least of the terms |

# Bounds

A goal may have a lower and an upper bound, which must be ground terms of a sort compatible with the sort of the objective.
Bounds are evaluated once, when the objective is created.

For minimization the bounds give the window `[lower, upper)`, and for maximization the window `(lower, upper]`.
The inclusive side is asserted for the whole search, and the exclusive side is the initial bound of the search.
An empty window gives an [Unsat](SearchStatus::Unsat) status, without a check of the oracle.

Objectives over bit-vectors are read as unsigned, or as signed if the goal is [signed](Goal::signed), and the domain of the reading bounds the window.

```rust
# use otter_omt::objective::Goal;
# use otter_omt::terms::TermStore;
let store = TermStore::default();
let x = store.int_var("x").unwrap();
let goal = Goal::minimize(x).lower(store.int(23).unwrap()).upper(store.int(100).unwrap());
```

# Costs

Internally, each objective is reduced to a [Target] term and a [Sense], and searches are made over the *cost* of the target: the value of the target when minimizing, and the negated value when maximizing.
MinMax and MaxMin objectives are reduced to a fresh symbol `m`, with `m` at least (resp. at most) each term and equal to some term.
*/

mod state;
pub use state::{SearchState, SearchStatus, Step, StepKind, StepOutcome};

mod value;
pub use value::ObjectiveValue;

use num::{BigInt, One};

use crate::{
    model::Model,
    numeric::{self, delta::DeltaRational, Rational},
    oracle::{LocalGoal, LocalOptimum},
    terms::{Sort, Term, TermStore},
    theory::bv,
    types::err::{ErrorKind, TypeError},
};

slotmap::new_key_type! {
    /// The key of an objective within an environment.
    pub struct ObjectiveKey;
}

/// A handle to an objective of some environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Objective {
    pub(crate) environment: u32,
    pub(crate) key: ObjectiveKey,
}

/// The kind of an objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveKind {
    Minimize,
    Maximize,
    MinMax,
    MaxMin,
}

impl std::fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimize => write!(f, "minimize"),
            Self::Maximize => write!(f, "maximize"),
            Self::MinMax => write!(f, "minmax"),
            Self::MaxMin => write!(f, "maxmin"),
        }
    }
}

/// The declaration of an objective.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub kind: ObjectiveKind,

    /// The terms of the objective, a single term for minimization and maximization.
    pub terms: Vec<Term>,

    pub lower: Option<Term>,
    pub upper: Option<Term>,

    /// Read bit-vector terms as signed.
    pub signed: bool,
}

impl Goal {
    fn of(kind: ObjectiveKind, terms: Vec<Term>) -> Self {
        Goal {
            kind,
            terms,
            lower: None,
            upper: None,
            signed: false,
        }
    }

    pub fn minimize(term: Term) -> Self {
        Goal::of(ObjectiveKind::Minimize, vec![term])
    }

    pub fn maximize(term: Term) -> Self {
        Goal::of(ObjectiveKind::Maximize, vec![term])
    }

    /// Minimize the greatest of `terms`.
    pub fn min_max(terms: &[Term]) -> Self {
        Goal::of(ObjectiveKind::MinMax, terms.to_vec())
    }

    /// Maximize the least of `terms`.
    pub fn max_min(terms: &[Term]) -> Self {
        Goal::of(ObjectiveKind::MaxMin, terms.to_vec())
    }

    pub fn lower(mut self, bound: Term) -> Self {
        self.lower = Some(bound);
        self
    }

    pub fn upper(mut self, bound: Term) -> Self {
        self.upper = Some(bound);
        self
    }

    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub(crate) fn sense(&self) -> Sense {
        match self.kind {
            ObjectiveKind::Minimize | ObjectiveKind::MinMax => Sense::Minimize,
            ObjectiveKind::Maximize | ObjectiveKind::MaxMin => Sense::Maximize,
        }
    }
}

/// The direction of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// The values a target may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    Int,
    Real,
    BitVector { width: u32, signed: bool },
}

impl Domain {
    /// The domain of a term of `sort`, with bit-vectors read as `signed`.
    pub fn of(sort: Sort, signed: bool) -> Result<Self, ErrorKind> {
        match sort {
            Sort::Int => Ok(Domain::Int),
            Sort::Real => Ok(Domain::Real),
            Sort::BitVector(width) => Ok(Domain::BitVector { width, signed }),
            _ => Err(TypeError::UnsupportedObjective(sort).into()),
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, Domain::Real)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Domain::BitVector { signed: true, .. })
    }

    /// The least and greatest values of a bit-vector domain.
    fn limits(&self) -> Option<(BigInt, BigInt)> {
        match self {
            Domain::BitVector { width, signed } => Some(bv::domain(*width, *signed)),
            _ => None,
        }
    }
}

/// The term searched over, with the direction of the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub term: Term,
    pub sense: Sense,
    pub domain: Domain,
}

impl Target {
    pub fn goal(&self) -> LocalGoal {
        LocalGoal {
            term: self.term,
            minimize: self.sense == Sense::Minimize,
            signed: self.domain.is_signed(),
        }
    }

    /// The cost of a value of the target.
    pub fn cost(&self, value: Rational) -> Rational {
        match self.sense {
            Sense::Minimize => value,
            Sense::Maximize => -value,
        }
    }

    /// The cost of the target in `model`.
    pub fn model_cost(&self, store: &TermStore, model: &Model) -> Result<Rational, ErrorKind> {
        let value = model.eval_rational(store, self.term, self.domain.is_signed())?;
        Ok(self.cost(value))
    }

    /// The cost of a local optimum.
    pub fn local_cost(&self, optimum: LocalOptimum) -> ObjectiveValue {
        match (optimum, self.sense) {
            (LocalOptimum::Unbounded, _) => ObjectiveValue::MinusInfinity,
            (LocalOptimum::Bounded(value), Sense::Minimize) => ObjectiveValue::Finite(value),
            (LocalOptimum::Bounded(value), Sense::Maximize) => ObjectiveValue::Finite(-&value),
        }
    }

    /// The formula `cost < bound`.
    pub fn below(&self, store: &TermStore, bound: &DeltaRational) -> Result<Term, ErrorKind> {
        let positive = bound.delta > Rational::from_integer(0.into());
        match (self.domain.is_integral(), positive) {
            // Below r + δ is at most r.
            (true, true) => self.at_most(store, &Rational::from_integer(numeric::floor(&bound.real))),
            (false, true) => self.at_most(store, &bound.real),
            (true, false) => {
                let below = Rational::from_integer(numeric::ceil(&bound.real) - BigInt::one());
                self.at_most(store, &below)
            }
            (false, false) => match self.sense {
                Sense::Minimize => store.lt(self.term, store.rational(bound.real.clone())?),
                Sense::Maximize => store.gt(self.term, store.rational(-&bound.real)?),
            },
        }
    }

    /// The formula `cost ≤ bound`.
    pub fn at_most(&self, store: &TermStore, bound: &Rational) -> Result<Term, ErrorKind> {
        match self.sense {
            Sense::Minimize => self.value_at_most(store, bound),
            Sense::Maximize => self.value_at_least(store, &-bound),
        }
    }

    /// The formula `cost ≥ bound`.
    pub fn at_least(&self, store: &TermStore, bound: &Rational) -> Result<Term, ErrorKind> {
        match self.sense {
            Sense::Minimize => self.value_at_least(store, bound),
            Sense::Maximize => self.value_at_most(store, &-bound),
        }
    }

    fn value_at_most(&self, store: &TermStore, bound: &Rational) -> Result<Term, ErrorKind> {
        match self.domain {
            Domain::Real => store.le(self.term, store.rational(bound.clone())?),
            Domain::Int => store.le(self.term, store.int_big(numeric::floor(bound))?),
            Domain::BitVector { width, signed } => {
                let bound = numeric::floor(bound);
                let (least, greatest) = bv::domain(width, signed);
                if bound >= greatest {
                    store.tt()
                } else if bound < least {
                    store.ff()
                } else {
                    store.ordered(self.term, store.bv_big(bound, width)?, false, signed)
                }
            }
        }
    }

    fn value_at_least(&self, store: &TermStore, bound: &Rational) -> Result<Term, ErrorKind> {
        match self.domain {
            Domain::Real => store.ge(self.term, store.rational(bound.clone())?),
            Domain::Int => store.ge(self.term, store.int_big(numeric::ceil(bound))?),
            Domain::BitVector { width, signed } => {
                let bound = numeric::ceil(bound);
                let (least, greatest) = bv::domain(width, signed);
                if bound <= least {
                    store.tt()
                } else if bound > greatest {
                    store.ff()
                } else {
                    store.ordered(store.bv_big(bound, width)?, self.term, false, signed)
                }
            }
        }
    }
}

/// The window of costs within which a search takes place, `[lower, upper)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
    pub lower: ObjectiveValue,
    pub upper: ObjectiveValue,
}

impl Window {
    /// The window of a target, given bounds on the value of the target.
    pub fn from_values(target: &Target, lower: Option<Rational>, upper: Option<Rational>) -> Self {
        let (mut low, mut high) = match target.sense {
            Sense::Minimize => (
                lower.map_or(ObjectiveValue::MinusInfinity, ObjectiveValue::exactly),
                upper.map_or(ObjectiveValue::PlusInfinity, ObjectiveValue::exactly),
            ),
            Sense::Maximize => (
                upper.map_or(ObjectiveValue::MinusInfinity, |v| ObjectiveValue::exactly(-v)),
                lower.map_or(ObjectiveValue::PlusInfinity, |v| ObjectiveValue::exactly(-v)),
            ),
        };

        if let Some((least, greatest)) = target.domain.limits() {
            let (least, greatest) = (Rational::from_integer(least), Rational::from_integer(greatest));
            let one = Rational::one();
            let (domain_low, domain_high) = match target.sense {
                Sense::Minimize => (least, greatest + one),
                Sense::Maximize => (-greatest, -least + one),
            };
            low = low.max(ObjectiveValue::exactly(domain_low));
            high = high.min(ObjectiveValue::exactly(domain_high));
        }

        Window {
            lower: low,
            upper: high,
        }
    }

    /// True if no cost of `domain` falls within the window.
    pub fn is_empty(&self, domain: Domain) -> bool {
        match (&self.lower, &self.upper) {
            (ObjectiveValue::Finite(lower), ObjectiveValue::Finite(upper)) => {
                match domain.is_integral() {
                    true => Rational::from_integer(numeric::ceil(&lower.real)) >= upper.real,
                    false => lower >= upper,
                }
            }
            _ => false,
        }
    }
}

/// An objective, prepared for search.
#[derive(Clone, Debug)]
pub struct Prepared {
    /// The objective, as written in logs.
    pub label: String,

    pub target: Target,

    pub window: Window,

    /// The soft constraints of the group of the target, if the target is minimized by core-guided relaxation.
    pub relaxation: Option<Vec<(Term, Rational)>>,
}
