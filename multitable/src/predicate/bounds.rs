use super::{CompareOp, Field, Predicate};
use crate::scope::upper_bound_of;
use crate::Value;
use std::ops::Bound;

/// Key range a predicate can possibly match, derived from its conjunctive identity leaves.
///
/// Only narrows, never widens: a document outside the bounds cannot satisfy the predicate,
/// a document inside still has to be evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBounds {
    pub lower: Bound<String>,
    pub upper: Bound<String>,
}

impl KeyBounds {
    pub fn unbounded() -> Self {
        KeyBounds { lower: Bound::Unbounded, upper: Bound::Unbounded }
    }

    pub fn of<T>(predicate: &Predicate<T>) -> Self {
        match predicate {
            Predicate::Eq { field: Field::Id, value: Value::Text(key) } => {
                KeyBounds { lower: Bound::Included(key.clone()), upper: Bound::Included(key.clone()) }
            }
            Predicate::Compare { field: Field::Id, op, value: Value::Text(key) } => match op {
                CompareOp::Gt => KeyBounds { lower: Bound::Excluded(key.clone()), upper: Bound::Unbounded },
                CompareOp::Gte => KeyBounds { lower: Bound::Included(key.clone()), upper: Bound::Unbounded },
                CompareOp::Lt => KeyBounds { lower: Bound::Unbounded, upper: Bound::Excluded(key.clone()) },
                CompareOp::Lte => KeyBounds { lower: Bound::Unbounded, upper: Bound::Included(key.clone()) },
                CompareOp::Ne => KeyBounds::unbounded(),
            },
            Predicate::StartsWith { field: Field::Id, value: Value::Text(prefix) } if !prefix.is_empty() => KeyBounds {
                lower: Bound::Included(prefix.clone()),
                upper: upper_bound_of(prefix).map_or(Bound::Unbounded, Bound::Excluded),
            },
            Predicate::And(children) => children.iter().map(KeyBounds::of).fold(KeyBounds::unbounded(), KeyBounds::intersect),
            _ => KeyBounds::unbounded(),
        }
    }

    pub fn intersect(self, other: KeyBounds) -> KeyBounds {
        KeyBounds { lower: tighter_lower(self.lower, other.lower), upper: tighter_upper(self.upper, other.upper) }
    }

    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
            (Bound::Included(lo), Bound::Excluded(hi)) | (Bound::Excluded(lo), Bound::Included(hi)) | (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
            _ => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        let above = match &self.lower {
            Bound::Included(lo) => key >= lo.as_str(),
            Bound::Excluded(lo) => key > lo.as_str(),
            Bound::Unbounded => true,
        };
        let below = match &self.upper {
            Bound::Included(hi) => key <= hi.as_str(),
            Bound::Excluded(hi) => key < hi.as_str(),
            Bound::Unbounded => true,
        };
        above && below
    }

    pub fn as_range(&self) -> (Bound<&str>, Bound<&str>) {
        (self.lower.as_ref().map(String::as_str), self.upper.as_ref().map(String::as_str))
    }
}

fn tighter_lower(a: Bound<String>, b: Bound<String>) -> Bound<String> {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other,
        (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.max(y)),
        (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.max(y)),
        (Bound::Included(inc), Bound::Excluded(exc)) | (Bound::Excluded(exc), Bound::Included(inc)) => {
            if inc > exc { Bound::Included(inc) } else { Bound::Excluded(exc) }
        }
    }
}

fn tighter_upper(a: Bound<String>, b: Bound<String>) -> Bound<String> {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other,
        (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.min(y)),
        (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.min(y)),
        (Bound::Included(inc), Bound::Excluded(exc)) | (Bound::Excluded(exc), Bound::Included(inc)) => {
            if inc < exc { Bound::Included(inc) } else { Bound::Excluded(exc) }
        }
    }
}
