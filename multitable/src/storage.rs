//! Shared collection backed by a single redb table.
//!
//! Keys are the stored (prefixed) identities, values are JSON documents. redb keeps keys in
//! ordinal order, so a table scope maps to one contiguous key range and every filter is served
//! by a range scan over [`KeyBounds`] followed by client side evaluation.

use crate::retry::retry_with_delay;
use crate::{info, AppError, Collection, Entity, KeyBounds, Predicate, StoreSettings};
use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

type Documents<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

#[derive(Clone)]
pub struct RedbCollection {
    db: Arc<Database>,
    name: Arc<str>,
}

impl RedbCollection {
    pub fn new(db: Arc<Database>, name: &str) -> Self {
        RedbCollection { db, name: Arc::from(name) }
    }

    pub async fn open(settings: &StoreSettings) -> Result<Self, AppError> {
        let db_file = settings.db_file();
        if let Some(dir) = db_file.parent() {
            fs::create_dir_all(dir)?;
        }
        info!("Opening collection {} at {:?}", settings.collection, db_file);
        let cache_size = settings.cache_size_mb * 1024 * 1024;
        let attempts = settings.open_attempts.max(1);
        let db = retry_with_delay("Opening database", attempts, settings.open_retry_delay, || {
            let path = db_file.clone();
            async move {
                tokio::task::spawn_blocking(move || -> Result<Database, AppError> {
                    Ok(Database::builder().set_cache_size(cache_size).create(path)?)
                })
                .await?
            }
        })
        .await?;
        Ok(RedbCollection::new(Arc::new(db), &settings.collection))
    }

    /// Fresh database under the system temp dir, unique per call.
    pub async fn temp(name: &str) -> Result<Self, AppError> {
        let db_path: PathBuf = std::env::temp_dir().join("multitable").join(format!("{}_{}", name, rand::random::<u64>()));
        let settings = StoreSettings::new(db_path.to_string_lossy(), name);
        Self::open(&settings).await
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Number of documents across all tables.
    pub async fn len(&self) -> Result<u64, AppError> {
        let (db, name) = (Arc::clone(&self.db), Arc::clone(&self.name));
        tokio::task::spawn_blocking(move || -> Result<u64, AppError> {
            let tx = db.begin_read()?;
            match tx.open_table(Documents::new(&name)) {
                Ok(table) => Ok(table.len()?),
                Err(TableError::TableDoesNotExist(_)) => Ok(0),
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }

    pub async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len().await? == 0)
    }

    /// Raw document bytes under `key`, for inspecting what was physically stored.
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let (db, name, key) = (Arc::clone(&self.db), Arc::clone(&self.name), key.to_string());
        tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>, AppError> {
            let tx = db.begin_read()?;
            let table = match tx.open_table(Documents::new(&name)) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            Ok(table.get(key.as_str())?.map(|guard| guard.value().to_vec()))
        })
        .await?
    }

    /// Stores raw bytes under `key`, bypassing any table scope.
    pub async fn put_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let (db, name, key) = (Arc::clone(&self.db), Arc::clone(&self.name), key.to_string());
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let tx = db.begin_write()?;
            {
                let mut table = tx.open_table(Documents::new(&name))?;
                table.insert(key.as_str(), bytes.as_slice())?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?
    }
}

/// Matching documents with their keys in key order; rows not decodable as `T` never match.
fn scan<T, R>(table: &R, filter: &Predicate<T>, limit: Option<usize>) -> Result<Vec<(String, T)>, AppError>
where
    T: Entity + DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let bounds = KeyBounds::of(filter);
    let mut results = Vec::new();
    if bounds.is_empty() {
        return Ok(results);
    }
    for entry in table.range::<&str>(bounds.as_range())? {
        let (key, value) = entry?;
        let document: T = match serde_json::from_slice(value.value()) {
            Ok(document) => document,
            Err(_) => continue,
        };
        if filter.matches(&document) {
            results.push((key.value().to_string(), document));
            if limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }
        }
    }
    Ok(results)
}

#[async_trait]
impl<T> Collection<T> for RedbCollection
where
    T: Entity + Serialize + DeserializeOwned,
{
    type Error = AppError;

    async fn find(&self, filter: &Predicate<T>) -> Result<Vec<T>, AppError> {
        let (db, name, filter) = (Arc::clone(&self.db), Arc::clone(&self.name), filter.clone());
        tokio::task::spawn_blocking(move || -> Result<Vec<T>, AppError> {
            let tx = db.begin_read()?;
            let table = match tx.open_table(Documents::new(&name)) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };
            Ok(scan(&table, &filter, None)?.into_iter().map(|(_, document)| document).collect())
        })
        .await?
    }

    async fn insert_one(&self, document: &T) -> Result<(), AppError> {
        let (db, name) = (Arc::clone(&self.db), Arc::clone(&self.name));
        let key = document.id().as_str().to_string();
        let bytes = serde_json::to_vec(document)?;
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let tx = db.begin_write()?;
            {
                let mut table = tx.open_table(Documents::new(&name))?;
                if table.get(key.as_str())?.is_some() {
                    return Err(AppError::DuplicateKey(key));
                }
                table.insert(key.as_str(), bytes.as_slice())?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?
    }

    async fn replace_one(&self, filter: &Predicate<T>, replacement: &T) -> Result<(), AppError> {
        let (db, name, filter) = (Arc::clone(&self.db), Arc::clone(&self.name), filter.clone());
        let new_key = replacement.id().as_str().to_string();
        let bytes = serde_json::to_vec(replacement)?;
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let tx = db.begin_write()?;
            {
                let mut table = tx.open_table(Documents::new(&name))?;
                let matched = scan(&table, &filter, Some(1))?.into_iter().next();
                if let Some((key, _)) = matched {
                    if key != new_key {
                        return Err(AppError::IdentityChanged { from: key, to: new_key });
                    }
                    table.insert(key.as_str(), bytes.as_slice())?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await?
    }

    async fn delete_one(&self, filter: &Predicate<T>) -> Result<bool, AppError> {
        let (db, name, filter) = (Arc::clone(&self.db), Arc::clone(&self.name), filter.clone());
        tokio::task::spawn_blocking(move || -> Result<bool, AppError> {
            let tx = db.begin_write()?;
            let removed = {
                let mut table = tx.open_table(Documents::new(&name))?;
                match scan(&table, &filter, Some(1))?.into_iter().next() {
                    Some((key, _)) => table.remove(key.as_str())?.is_some(),
                    None => false,
                }
            };
            tx.commit()?;
            Ok(removed)
        })
        .await?
    }

    async fn delete_many(&self, filter: &Predicate<T>) -> Result<u64, AppError> {
        let (db, name, filter) = (Arc::clone(&self.db), Arc::clone(&self.name), filter.clone());
        tokio::task::spawn_blocking(move || -> Result<u64, AppError> {
            let tx = db.begin_write()?;
            let mut removed = 0;
            {
                let mut table = tx.open_table(Documents::new(&name))?;
                let keys = scan(&table, &filter, None)?;
                for (key, _) in keys {
                    if table.remove(key.as_str())?.is_some() {
                        removed += 1;
                    }
                }
            }
            tx.commit()?;
            Ok(removed)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, Identity, ScopeError, TableScope, Value};
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Book {
        id: Identity,
        pages: u32,
    }

    impl Entity for Book {
        const TABLE: &'static str = "Book";
        fn id(&self) -> &Identity { &self.id }
        fn id_mut(&mut self) -> &mut Identity { &mut self.id }
        fn value_of(&self, field: &str) -> Option<Value> {
            match field {
                "pages" => Some(Value::from(self.pages)),
                _ => None,
            }
        }
        fn scope() -> Result<&'static TableScope, ScopeError> {
            crate::entity_scope!(Self::TABLE)
        }
    }

    fn book(id: &str, pages: u32) -> Book {
        Book { id: Identity::from(id), pages }
    }

    #[tokio::test]
    async fn zero_open_attempts_still_opens_once() {
        let db_path = std::env::temp_dir().join("multitable").join(format!("attempts_{}", rand::random::<u64>()));
        let mut settings = StoreSettings::new(db_path.to_string_lossy(), "documents");
        settings.open_attempts = 0;
        let collection = RedbCollection::open(&settings).await.unwrap();
        assert_eq!(collection.name(), "documents");
        assert!(collection.database().begin_read().is_ok());
        assert!(collection.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn reading_a_fresh_collection_is_empty() {
        let collection = RedbCollection::temp("fresh").await.unwrap();
        let found = Collection::<Book>::find(&collection, &Predicate::gte("pages", 0)).await.unwrap();
        assert!(found.is_empty());
        assert!(collection.is_empty().await.unwrap());
        assert_eq!(collection.get_raw("Book|x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_keys() {
        let collection = RedbCollection::temp("dup").await.unwrap();
        collection.insert_one(&book("Book|Dune", 412)).await.unwrap();
        let err = collection.insert_one(&book("Book|Dune", 500)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(ref key) if key == "Book|Dune"));
        assert_eq!(collection.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_scans_only_the_bounded_range_and_evaluates_the_rest() {
        let collection = RedbCollection::temp("find").await.unwrap();
        for (id, pages) in [("Book|Dune", 412), ("Book|Emma", 474), ("Book|Ulysses", 730)] {
            collection.insert_one(&book(id, pages)).await.unwrap();
        }
        let filter = Predicate::gte(Field::Id, "Book|E") & Predicate::gt("pages", 500);
        let found = Collection::<Book>::find(&collection, &filter).await.unwrap();
        assert_eq!(found, vec![book("Book|Ulysses", 730)]);

        let none = Collection::<Book>::find(&collection, &(Predicate::id_eq("Book|Dune") & Predicate::id_eq("Book|Emma"))).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn rows_of_another_shape_never_match() {
        let collection = RedbCollection::temp("shape").await.unwrap();
        collection.put_raw("Book|Broken", b"{\"title\":\"no pages\"}".to_vec()).await.unwrap();
        collection.insert_one(&book("Book|Dune", 412)).await.unwrap();
        let found = Collection::<Book>::find(&collection, &Predicate::starts_with(Field::Id, "Book|")).await.unwrap();
        assert_eq!(found, vec![book("Book|Dune", 412)]);
    }

    #[tokio::test]
    async fn replace_keeps_the_key_and_refuses_to_move_it() {
        let collection = RedbCollection::temp("replace").await.unwrap();
        collection.insert_one(&book("Book|Dune", 412)).await.unwrap();
        collection.replace_one(&Predicate::id_eq("Book|Dune"), &book("Book|Dune", 896)).await.unwrap();
        let found = Collection::<Book>::find(&collection, &Predicate::id_eq("Book|Dune")).await.unwrap();
        assert_eq!(found, vec![book("Book|Dune", 896)]);

        let err = collection.replace_one(&Predicate::id_eq("Book|Dune"), &book("Book|Emma", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::IdentityChanged { .. }));

        collection.replace_one(&Predicate::id_eq("Book|Missing"), &book("Book|Missing", 1)).await.unwrap();
        assert_eq!(collection.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_one_and_many_report_what_was_removed() {
        let collection = RedbCollection::temp("delete").await.unwrap();
        for (id, pages) in [("Book|Dune", 412), ("Book|Emma", 474), ("Book|Ulysses", 730)] {
            collection.insert_one(&book(id, pages)).await.unwrap();
        }
        assert!(Collection::<Book>::delete_one(&collection, &Predicate::id_eq("Book|Emma")).await.unwrap());
        assert!(!Collection::<Book>::delete_one(&collection, &Predicate::id_eq("Book|Emma")).await.unwrap());
        assert_eq!(Collection::<Book>::delete_many(&collection, &Predicate::gt("pages", 0)).await.unwrap(), 2);
        assert!(collection.is_empty().await.unwrap());
    }
}
