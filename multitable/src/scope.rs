//! Key scoping of one logical table inside a shared collection.
//!
//! Every key of table `Name` is stored as `Name|<id>`. All such keys, and only those, sort in the
//! half open range `[Name|, Name})`, the upper bound being the prefix with its last character
//! replaced by the next code point.

use crate::predicate::{Field, Predicate};
use crate::{Entity, ScopeError, Value};

pub const SEPARATOR: char = '|';

/// Smallest string greater than every string starting with `prefix`, `None` when the last
/// character of `prefix` is `char::MAX` or `prefix` is empty.
pub fn upper_bound_of(prefix: &str) -> Option<String> {
    let mut chars = prefix.chars();
    let last = chars.next_back()?;
    let next = match last {
        '\u{D7FF}' => '\u{E000}',
        c => char::from_u32(c as u32 + 1)?,
    };
    let mut bound = String::with_capacity(prefix.len() + next.len_utf8());
    bound.push_str(chars.as_str());
    bound.push(next);
    Some(bound)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableScope {
    table: String,
    prefix: String,
    upper_bound: String,
}

impl TableScope {
    pub fn new(table: &str) -> Result<Self, ScopeError> {
        if table.is_empty() {
            return Err(ScopeError::EmptyTableName);
        }
        if table.contains(SEPARATOR) {
            return Err(ScopeError::SeparatorInTableName(table.to_string()));
        }
        let prefix = format!("{}{}", table, SEPARATOR);
        let upper_bound = upper_bound_of(&prefix).ok_or_else(|| ScopeError::UpperBoundOverflow(prefix.clone()))?;
        Ok(TableScope { table: table.to_string(), prefix, upper_bound })
    }

    pub fn of<T: Entity>() -> Result<&'static TableScope, ScopeError> {
        T::scope()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upper_bound(&self) -> &str {
        &self.upper_bound
    }

    pub fn contains(&self, key: &str) -> bool {
        self.prefix.as_str() <= key && key < self.upper_bound.as_str()
    }

    /// Prefixes `id` unless it already carries the prefix.
    pub fn append_prefix(&self, id: &str) -> String {
        if id.starts_with(&self.prefix) {
            id.to_string()
        } else {
            format!("{}{}", self.prefix, id)
        }
    }

    pub fn strip_prefix<'a>(&self, id: &'a str) -> &'a str {
        id.strip_prefix(self.prefix.as_str()).unwrap_or(id)
    }

    pub fn prefix_entity<T: Entity>(&self, entity: &mut T) {
        if !entity.id().as_str().starts_with(&self.prefix) {
            let prefixed = self.append_prefix(entity.id().as_str());
            *entity.id_mut() = prefixed.into();
        }
    }

    pub fn strip_entity<T: Entity>(&self, entity: &mut T) {
        if entity.id().as_str().starts_with(&self.prefix) {
            let stripped = self.strip_prefix(entity.id().as_str()).to_string();
            *entity.id_mut() = stripped.into();
        }
    }

    /// `prefix <= id < upper_bound`, every document of this table and nothing else.
    pub fn range_predicate<T>(&self) -> Predicate<T> {
        Predicate::gte(Field::Id, self.prefix.as_str()) & Predicate::lt(Field::Id, self.upper_bound.as_str())
    }

    /// Restricts `predicate` to this table, see [`TableScope::rewrite`].
    pub fn scope<T>(&self, predicate: &Predicate<T>) -> Predicate<T> {
        self.range_predicate() & self.rewrite(predicate)
    }

    /// Copy of `predicate` whose identity constants carry the table prefix.
    ///
    /// Only text constants of identity equality, comparison and `starts_with` leaves change.
    /// Other leaves, `ends_with`/`contains` on the identity included, are kept as written.
    pub fn rewrite<T>(&self, predicate: &Predicate<T>) -> Predicate<T> {
        match predicate {
            Predicate::Eq { field: Field::Id, value } => Predicate::Eq { field: Field::Id, value: self.prefix_value(value) },
            Predicate::Compare { field: Field::Id, op, value } => {
                Predicate::Compare { field: Field::Id, op: *op, value: self.prefix_value(value) }
            }
            Predicate::StartsWith { field: Field::Id, value } => {
                Predicate::StartsWith { field: Field::Id, value: self.prefix_value(value) }
            }
            Predicate::And(children) => Predicate::And(children.iter().map(|child| self.rewrite(child)).collect()),
            Predicate::Or(children) => Predicate::Or(children.iter().map(|child| self.rewrite(child)).collect()),
            Predicate::Not(inner) => Predicate::Not(Box::new(self.rewrite(inner))),
            other => other.clone(),
        }
    }

    fn prefix_value(&self, value: &Value) -> Value {
        match value {
            Value::Text(text) => Value::Text(self.append_prefix(text)),
            other => other.clone(),
        }
    }
}
