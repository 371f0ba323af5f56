use crate::{Identity, ScopeError, TableScope, Value};

/// A record stored in a shared collection under its own table prefix.
///
/// Usually derived with `#[derive(Entity)]`, which marks the identity field with `#[pk]`.
pub trait Entity: Send + Sync + 'static {
    /// Table name, the key prefix is derived from it.
    const TABLE: &'static str;

    fn id(&self) -> &Identity;

    fn id_mut(&mut self) -> &mut Identity;

    /// Value of a non-identity field, `None` when the entity has no such field.
    fn value_of(&self, field: &str) -> Option<Value>;

    /// Scope of this entity's table, computed once per type.
    fn scope() -> Result<&'static TableScope, ScopeError>;
}

/// Expands to a per-type cached `TableScope` lookup, the body of [`Entity::scope`].
#[macro_export]
macro_rules! entity_scope {
    ($table:expr) => {{
        static SCOPE: $crate::once_cell::sync::OnceCell<::std::result::Result<$crate::TableScope, $crate::ScopeError>> =
            $crate::once_cell::sync::OnceCell::new();
        SCOPE.get_or_init(|| $crate::TableScope::new($table)).as_ref().map_err(::std::clone::Clone::clone)
    }};
}
