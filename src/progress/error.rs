//! Error types for progression operations

/// Failure of the persistence layer. The cause is kept opaque to callers of
/// the progression API; it is only ever displayed or logged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("ledger record could not be encoded or decoded: {0}")]
    Record(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the progression core
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("no active user")]
    NoActiveUser,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("username can be changed again in {days_remaining} day(s)")]
    CooldownActive { days_remaining: i64 },

    #[error("an account with email '{0}' already exists")]
    AccountExists(String),

    #[error("no account found for '{0}'")]
    AccountNotFound(String),

    #[error("username must not be blank")]
    InvalidUsername,

    #[error("invalid badge catalog: {0}")]
    InvalidCatalog(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

pub type ProgressResult<T> = std::result::Result<T, ProgressError>;
