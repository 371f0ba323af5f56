//! multitable stores several logical tables in one physical collection.
//!
//! Every document of table `Name` is keyed `Name|<id>`. A [`Repository`] prefixes identities on
//! the way in, strips them on the way out and rewrites caller predicates so that identity
//! constants carry the prefix and the scan is confined to the table's key range.
//!
//! Any store implementing [`Collection`] can back a repository, [`RedbCollection`] keeps JSON
//! documents in a single [Redb](https://github.com/cberner/redb) table.

extern crate self as multitable;

pub mod collection;
pub mod entity;
pub mod error;
pub mod identity;
pub mod logger;
pub mod predicate;
pub mod repository;
pub mod retry;
pub mod scope;
pub mod settings;
pub mod storage;
pub mod value;

pub use async_trait;
pub use collection::Collection;
pub use entity::Entity;
pub use error::{AppError, ScopeError};
pub use identity::Identity;
pub use macros::Entity;
pub use once_cell;
pub use predicate::{CompareOp, Field, KeyBounds, Opaque, Predicate};
pub use redb;
pub use repository::Repository;
pub use retry::retry_with_delay;
pub use scope::TableScope;
pub use serde;
pub use serde_json;
pub use settings::{load_config, load_settings, StoreSettings};
pub use storage::RedbCollection;
pub use value::Value;
