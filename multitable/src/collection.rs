use crate::{Entity, Predicate};
use async_trait::async_trait;
use std::sync::Arc;

/// One physical collection shared by every table, the storage capability a repository needs.
///
/// Filters and documents are passed as stored, prefixed identities included. Implementations
/// report failures through their own error type, repositories hand it back to callers unchanged.
#[async_trait]
pub trait Collection<T: Entity>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn find(&self, filter: &Predicate<T>) -> Result<Vec<T>, Self::Error>;

    async fn insert_one(&self, document: &T) -> Result<(), Self::Error>;

    /// Replaces the first document matching `filter`, no match is not an error.
    async fn replace_one(&self, filter: &Predicate<T>, replacement: &T) -> Result<(), Self::Error>;

    /// Returns true iff exactly one document was removed.
    async fn delete_one(&self, filter: &Predicate<T>) -> Result<bool, Self::Error>;

    async fn delete_many(&self, filter: &Predicate<T>) -> Result<u64, Self::Error>;
}

#[async_trait]
impl<T: Entity, C: Collection<T> + ?Sized> Collection<T> for Arc<C> {
    type Error = C::Error;

    async fn find(&self, filter: &Predicate<T>) -> Result<Vec<T>, Self::Error> {
        (**self).find(filter).await
    }

    async fn insert_one(&self, document: &T) -> Result<(), Self::Error> {
        (**self).insert_one(document).await
    }

    async fn replace_one(&self, filter: &Predicate<T>, replacement: &T) -> Result<(), Self::Error> {
        (**self).replace_one(filter, replacement).await
    }

    async fn delete_one(&self, filter: &Predicate<T>) -> Result<bool, Self::Error> {
        (**self).delete_one(filter).await
    }

    async fn delete_many(&self, filter: &Predicate<T>) -> Result<u64, Self::Error> {
        (**self).delete_many(filter).await
    }
}
