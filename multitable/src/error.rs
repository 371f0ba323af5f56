use config::ConfigError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum AppError {

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Join: {0}")]
    JoinError(#[from] JoinError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Identity of a replaced document cannot change from {from} to {to}")]
    IdentityChanged { from: String, to: String },
}

/// Raised when a table name cannot delimit its own key range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("table name {0:?} contains the key separator")]
    SeparatorInTableName(String),

    #[error("prefix {0:?} has no upper bound, its last character is the highest code point")]
    UpperBoundOverflow(String),
}
