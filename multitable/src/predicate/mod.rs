//! Closed predicate algebra over entity fields.
//!
//! Leaves are tagged by field role, [`Field::Id`] for the identity and [`Field::Named`] for every
//! other field, so a table scope can rewrite identity leaves by pattern matching alone.
//! Predicates are immutable, rewriting builds a new tree.

mod bounds;
mod eval;

pub use bounds::KeyBounds;

use crate::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Named(Cow<'static, str>),
}

impl Field {
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Field::Named(name.into())
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Field::Id)
    }
}

impl From<&'static str> for Field {
    fn from(name: &'static str) -> Self {
        Field::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Named(Cow::Owned(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Id => f.write_str("<id>"),
            Field::Named(name) => f.write_str(name),
        }
    }
}

/// Ordering comparison of a field against a constant, `field.cmp(value)` must satisfy the op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }
}

/// Caller supplied test the rewriter never looks into, it sees the stored document as is.
pub struct Opaque<T> {
    label: Cow<'static, str>,
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Opaque<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, document: &T) -> bool {
        (self.test)(document)
    }
}

impl<T> Clone for Opaque<T> {
    fn clone(&self) -> Self {
        Opaque { label: self.label.clone(), test: Arc::clone(&self.test) }
    }
}

impl<T> PartialEq for Opaque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && Arc::ptr_eq(&self.test, &other.test)
    }
}

impl<T> fmt::Debug for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.label).finish()
    }
}

pub enum Predicate<T> {
    Eq { field: Field, value: Value },
    Compare { field: Field, op: CompareOp, value: Value },
    StartsWith { field: Field, value: Value },
    EndsWith { field: Field, value: Value },
    Contains { field: Field, value: Value },
    And(Vec<Predicate<T>>),
    Or(Vec<Predicate<T>>),
    Not(Box<Predicate<T>>),
    Opaque(Opaque<T>),
}

impl<T> Predicate<T> {
    pub fn eq(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Predicate::Eq { field: field.into(), value: value.into() }
    }

    pub fn compare(field: impl Into<Field>, op: CompareOp, value: impl Into<Value>) -> Self {
        Predicate::Compare { field: field.into(), op, value: value.into() }
    }

    pub fn ne(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn lt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn gt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn starts_with(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Predicate::StartsWith { field: field.into(), value: value.into() }
    }

    pub fn ends_with(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Predicate::EndsWith { field: field.into(), value: value.into() }
    }

    pub fn contains(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Predicate::Contains { field: field.into(), value: value.into() }
    }

    pub fn and(predicates: Vec<Self>) -> Self {
        Predicate::And(predicates)
    }

    pub fn or(predicates: Vec<Self>) -> Self {
        Predicate::Or(predicates)
    }

    pub fn negate(predicate: Self) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn opaque<F>(label: impl Into<Cow<'static, str>>, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate::Opaque(Opaque { label: label.into(), test: Arc::new(test) })
    }

    /// Identity equality, the shape every lookup by key takes.
    pub fn id_eq(id: impl Into<Value>) -> Self {
        Self::eq(Field::Id, id)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Eq { field, value } => Predicate::Eq { field: field.clone(), value: value.clone() },
            Predicate::Compare { field, op, value } => Predicate::Compare { field: field.clone(), op: *op, value: value.clone() },
            Predicate::StartsWith { field, value } => Predicate::StartsWith { field: field.clone(), value: value.clone() },
            Predicate::EndsWith { field, value } => Predicate::EndsWith { field: field.clone(), value: value.clone() },
            Predicate::Contains { field, value } => Predicate::Contains { field: field.clone(), value: value.clone() },
            Predicate::And(children) => Predicate::And(children.clone()),
            Predicate::Or(children) => Predicate::Or(children.clone()),
            Predicate::Not(inner) => Predicate::Not(inner.clone()),
            Predicate::Opaque(opaque) => Predicate::Opaque(opaque.clone()),
        }
    }
}

impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Predicate::Eq { field: f1, value: v1 }, Predicate::Eq { field: f2, value: v2 }) => f1 == f2 && v1 == v2,
            (Predicate::Compare { field: f1, op: o1, value: v1 }, Predicate::Compare { field: f2, op: o2, value: v2 }) => {
                f1 == f2 && o1 == o2 && v1 == v2
            }
            (Predicate::StartsWith { field: f1, value: v1 }, Predicate::StartsWith { field: f2, value: v2 }) => f1 == f2 && v1 == v2,
            (Predicate::EndsWith { field: f1, value: v1 }, Predicate::EndsWith { field: f2, value: v2 }) => f1 == f2 && v1 == v2,
            (Predicate::Contains { field: f1, value: v1 }, Predicate::Contains { field: f2, value: v2 }) => f1 == f2 && v1 == v2,
            (Predicate::And(a), Predicate::And(b)) => a == b,
            (Predicate::Or(a), Predicate::Or(b)) => a == b,
            (Predicate::Not(a), Predicate::Not(b)) => a == b,
            (Predicate::Opaque(a), Predicate::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq { field, value } => write!(f, "{} == {:?}", field, value),
            Predicate::Compare { field, op, value } => write!(f, "{} {} {:?}", field, op.symbol(), value),
            Predicate::StartsWith { field, value } => write!(f, "{}.starts_with({:?})", field, value),
            Predicate::EndsWith { field, value } => write!(f, "{}.ends_with({:?})", field, value),
            Predicate::Contains { field, value } => write!(f, "{}.contains({:?})", field, value),
            Predicate::And(children) => f.debug_tuple("And").field(children).finish(),
            Predicate::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Predicate::Opaque(opaque) => opaque.fmt(f),
        }
    }
}

impl<T> BitAnd for Predicate<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match self {
            Predicate::And(mut children) => {
                children.push(rhs);
                Predicate::And(children)
            }
            lhs => Predicate::And(vec![lhs, rhs]),
        }
    }
}

impl<T> BitOr for Predicate<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match self {
            Predicate::Or(mut children) => {
                children.push(rhs);
                Predicate::Or(children)
            }
            lhs => Predicate::Or(vec![lhs, rhs]),
        }
    }
}

impl<T> Not for Predicate<T> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Predicate::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc;

    #[test]
    fn operators_flatten_chains() {
        let p: Predicate<Doc> = Predicate::id_eq("a") & Predicate::gt("gpa", 3.0) & Predicate::lt("gpa", 4.0);
        match p {
            Predicate::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected And, got {:?}", other),
        }
        let q: Predicate<Doc> = Predicate::id_eq("a") | Predicate::id_eq("b") | Predicate::id_eq("c");
        assert!(matches!(q, Predicate::Or(ref children) if children.len() == 3));
    }

    #[test]
    fn opaque_equality_is_by_closure_identity() {
        let p: Predicate<Doc> = Predicate::opaque("always", |_| true);
        let q = p.clone();
        let r: Predicate<Doc> = Predicate::opaque("always", |_| true);
        assert_eq!(p, q);
        assert_ne!(p, r);
    }

    #[test]
    fn field_roles() {
        assert!(Field::Id.is_id());
        assert!(!Field::from("gpa").is_id());
        assert_eq!(Field::named(String::from("gpa")), Field::from("gpa"));
        assert_eq!(Field::Id.to_string(), "<id>");
    }

    #[test]
    fn debug_renders_leaves_readably() {
        let p: Predicate<Doc> = !Predicate::compare(Field::Id, CompareOp::Gte, "T");
        assert_eq!(format!("{:?}", p), "Not(<id> >= Text(\"T\"))");
    }

    #[test]
    fn compare_op_matches_orderings() {
        assert!(CompareOp::Gte.matches(Ordering::Equal));
        assert!(CompareOp::Gte.matches(Ordering::Greater));
        assert!(!CompareOp::Lt.matches(Ordering::Equal));
        assert!(CompareOp::Ne.matches(Ordering::Less));
        assert!(!CompareOp::Ne.matches(Ordering::Equal));
    }
}
