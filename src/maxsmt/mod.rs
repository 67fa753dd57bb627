/*!
Soft constraints, and the minimization of their violated weight.

Soft constraints are asserted to named *groups*.
Each group is represented by a real symbol named after the group, and within a solve the symbol is defined as the weight of the violated soft constraints of the group:

```text
group = ite(φ₁, 0, w₁) + … + ite(φₙ, 0, wₙ)
```

So, a group is an ordinary objective term, and the violated weight of a group is minimized by creating an objective over the symbol of the group.

With the [omt](crate::config::MaxSMTEngine::OMT) engine the symbol is minimized as any other term.
With the [maxres](crate::config::MaxSMTEngine::MaxRes) engine a minimized group symbol is instead minimized by [core-guided relaxation](maxres).
Both engines give the same optimum.

Weights may be any rational, and a soft constraint with a negative weight is read as the negated constraint with the absolute weight, offset by the (negative) weight.
*/

pub mod maxres;

use std::collections::BTreeMap;

use num::{Signed, Zero};

use crate::{
    numeric::Rational,
    terms::{Op, Term, TermStore},
    types::err::ErrorKind,
};

/// A soft constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Soft {
    pub term: Term,
    pub weight: Rational,

    /// The checkpoint depth at which the constraint was asserted.
    pub(crate) depth: usize,
}

/// A group of soft constraints.
#[derive(Clone, Debug)]
pub struct SoftGroup {
    pub name: String,

    /// The real symbol standing for the violated weight of the group.
    pub symbol: Term,

    pub softs: Vec<Soft>,
}

impl SoftGroup {
    pub fn new(name: &str, symbol: Term) -> Self {
        SoftGroup {
            name: name.to_string(),
            symbol,
            softs: Vec::default(),
        }
    }

    /// The formula defining the symbol of the group as the violated weight of the group.
    pub fn definition(&self, store: &TermStore) -> Result<Term, ErrorKind> {
        let zero = store.rational(Rational::zero())?;
        let mut summands = Vec::with_capacity(self.softs.len());
        for soft in &self.softs {
            summands.push(store.ite(soft.term, zero, store.rational(soft.weight.clone())?)?);
        }
        let sum = match summands.is_empty() {
            true => zero,
            false => store.add(&summands)?,
        };
        store.eq(self.symbol, sum)
    }

    /// Drops each soft constraint asserted above `depth`.
    pub(crate) fn retain_to(&mut self, depth: usize) {
        self.softs.retain(|soft| soft.depth <= depth);
    }

    /// The soft constraints, as pairs of term and weight.
    pub fn weighted(&self) -> Vec<(Term, Rational)> {
        self.softs
            .iter()
            .map(|soft| (soft.term, soft.weight.clone()))
            .collect()
    }
}

/// Soft constraints with positive weights on distinct non-constant terms, and the weight violated by any assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub offset: Rational,
    pub softs: BTreeMap<Term, Rational>,
}

/// Normalizes a collection of soft constraints.
///
/// - A negative weight `w` on `φ` adds `w` to the offset, and is read as `¬φ` with weight `-w`.
/// - Constraints on the same term are merged.
/// - A constraint on `false` adds to the offset, and constraints on `true` or with zero weight are dropped.
pub fn normalize(store: &TermStore, softs: &[(Term, Rational)]) -> Result<Normalized, ErrorKind> {
    let mut normalized = Normalized::default();

    for (term, weight) in softs {
        let (term, weight) = match weight.is_negative() {
            true => {
                normalized.offset += weight;
                (store.not(*term)?, -weight)
            }
            false => (*term, weight.clone()),
        };

        if weight.is_zero() {
            continue;
        }

        match store.node(term)?.op {
            Op::True => {}
            Op::False => normalized.offset += weight,
            _ => *normalized.softs.entry(term).or_insert_with(Rational::zero) += weight,
        }
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::rational;

    #[test]
    fn normal_form() {
        let store = TermStore::default();
        let p = store.bool_var("p").unwrap();
        let q = store.bool_var("q").unwrap();
        let ff = store.ff().unwrap();

        let normalized = normalize(
            &store,
            &[
                (p, rational(2)),
                (p, rational(3)),
                (q, rational(-4)),
                (ff, rational(1)),
                (ff, rational(-6)),
                (q, rational(0)),
            ],
        )
        .unwrap();

        // -4 from q, 1 from false, and -6 from false read as true.
        assert_eq!(normalized.offset, rational(-9));
        assert_eq!(normalized.softs.get(&p), Some(&rational(5)));
        assert_eq!(
            normalized.softs.get(&store.not(q).unwrap()),
            Some(&rational(4))
        );
        assert_eq!(normalized.softs.len(), 2);
    }

    #[test]
    fn empty_group() {
        let store = TermStore::default();
        let symbol = store.real_var("goal").unwrap();
        let group = SoftGroup::new("goal", symbol);
        assert_eq!(
            group.definition(&store).unwrap(),
            store
                .eq(symbol, store.rational(Rational::zero()).unwrap())
                .unwrap()
        );
    }
}
