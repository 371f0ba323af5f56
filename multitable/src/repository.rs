use crate::{info, warn, Collection, Entity, Predicate, ScopeError, TableScope};
use std::marker::PhantomData;

/// CRUD over the logical table of `T` inside a collection shared with other tables.
///
/// Callers see bare identities, the collection only ever sees prefixed ones. Every operation
/// hands adapter errors back unchanged.
///
/// `insert_or_update` reads then writes without any lock, two concurrent calls for the same
/// identity may both insert. [`crate::RedbCollection`] rejects the second with
/// [`crate::AppError::DuplicateKey`].
pub struct Repository<T, C> {
    collection: C,
    scope: &'static TableScope,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> Clone for Repository<T, C>
where
    C: Clone,
{
    fn clone(&self) -> Self {
        Repository { collection: self.collection.clone(), scope: self.scope, _marker: PhantomData }
    }
}

impl<T, C> Repository<T, C>
where
    T: Entity,
    C: Collection<T>,
{
    pub fn new(collection: C) -> Result<Self, ScopeError> {
        let scope = T::scope()?;
        Ok(Repository { collection, scope, _marker: PhantomData })
    }

    pub fn scope(&self) -> &'static TableScope {
        self.scope
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub async fn get_by_id(&self, id: impl AsRef<str>) -> Result<Option<T>, C::Error> {
        let prefixed = self.scope.append_prefix(id.as_ref());
        let mut found = self.collection.find(&Predicate::id_eq(prefixed.as_str())).await?;
        if found.len() > 1 {
            warn!("{} documents share identity {}, returning the first", found.len(), prefixed);
        }
        if found.is_empty() {
            return Ok(None);
        }
        let mut entity = found.swap_remove(0);
        self.scope.strip_entity(&mut entity);
        Ok(Some(entity))
    }

    pub async fn get_all(&self) -> Result<Vec<T>, C::Error> {
        let found = self.collection.find(&self.scope.range_predicate()).await?;
        Ok(self.strip_all(found))
    }

    /// Documents of this table matching `predicate`, identity constants written without prefix.
    pub async fn find_where(&self, predicate: &Predicate<T>) -> Result<Vec<T>, C::Error> {
        let found = self.collection.find(&self.scope.scope(predicate)).await?;
        Ok(self.strip_all(found))
    }

    /// Inserts `entity` or replaces the stored document with the same identity.
    pub async fn insert_or_update(&self, mut entity: T) -> Result<T, C::Error> {
        self.scope.prefix_entity(&mut entity);
        let existing = self.get_by_id(entity.id().as_str()).await?;
        match existing {
            None => self.collection.insert_one(&entity).await?,
            Some(_) => {
                let filter = Predicate::id_eq(entity.id().as_str());
                self.collection.replace_one(&filter, &entity).await?
            }
        }
        self.scope.strip_entity(&mut entity);
        Ok(entity)
    }

    pub async fn delete_by_id(&self, id: impl AsRef<str>) -> Result<bool, C::Error> {
        let prefixed = self.scope.append_prefix(id.as_ref());
        self.collection.delete_one(&Predicate::id_eq(prefixed)).await
    }

    pub async fn delete(&self, entity: &T) -> Result<bool, C::Error> {
        self.delete_by_id(entity.id().as_str()).await
    }

    pub async fn delete_all(&self) -> Result<u64, C::Error> {
        let deleted = self.collection.delete_many(&self.scope.range_predicate()).await?;
        info!("Deleted {} documents of table {}", deleted, self.scope.table());
        Ok(deleted)
    }

    fn strip_all(&self, mut found: Vec<T>) -> Vec<T> {
        for entity in found.iter_mut() {
            self.scope.strip_entity(entity);
        }
        found
    }
}
