use super::{Field, Predicate};
use crate::{Entity, Value};
use std::cmp::Ordering;

fn field_value<T: Entity>(document: &T, field: &Field) -> Option<Value> {
    match field {
        Field::Id => Some(Value::Text(document.id().as_str().to_string())),
        Field::Named(name) => document.value_of(name),
    }
}

// Missing fields and mismatched value kinds never match.
fn on_present<T: Entity>(document: &T, field: &Field, f: impl FnOnce(&Value) -> bool) -> bool {
    match field_value(document, field) {
        Some(value) => f(&value),
        None => false,
    }
}

fn on_text(actual: &Value, expected: &Value, f: impl FnOnce(&str, &str) -> bool) -> bool {
    match (actual.as_text(), expected.as_text()) {
        (Some(a), Some(b)) => f(a, b),
        _ => false,
    }
}

impl<T: Entity> Predicate<T> {
    /// Evaluates the predicate against a document exactly as stored, prefixed identity included.
    pub fn matches(&self, document: &T) -> bool {
        match self {
            Predicate::Eq { field, value } => {
                on_present(document, field, |actual| actual.compare(value) == Some(Ordering::Equal))
            }
            Predicate::Compare { field, op, value } => {
                on_present(document, field, |actual| actual.compare(value).is_some_and(|ord| op.matches(ord)))
            }
            Predicate::StartsWith { field, value } => {
                on_present(document, field, |actual| on_text(actual, value, |a, b| a.starts_with(b)))
            }
            Predicate::EndsWith { field, value } => {
                on_present(document, field, |actual| on_text(actual, value, |a, b| a.ends_with(b)))
            }
            Predicate::Contains { field, value } => {
                on_present(document, field, |actual| on_text(actual, value, |a, b| a.contains(b)))
            }
            Predicate::And(children) => children.iter().all(|child| child.matches(document)),
            Predicate::Or(children) => children.iter().any(|child| child.matches(document)),
            Predicate::Not(inner) => !inner.matches(document),
            Predicate::Opaque(opaque) => opaque.test(document),
        }
    }
}
