//! Ledger persistence
//!
//! The progression core only needs keyed read/modify/write access to ledgers
//! and a consistent snapshot of all of them. Two backends are provided:
//! - [`SqliteStore`]: durable, `~/.questlog/ledger.db` by default
//! - [`MemoryStore`]: process-local, for tests and embedding

mod db;
mod memory;
mod record;

pub use db::SqliteStore;
pub use memory::MemoryStore;
pub use record::{decode, encode, LedgerRecord};

use crate::domain::Ledger;
use crate::progress::{ProgressResult, StoreError};

/// Mutation applied to a single ledger inside [`LedgerStore::update`]
pub type LedgerMutation<'a> = &'a mut dyn FnMut(&mut Ledger) -> ProgressResult<()>;

/// Durable keyed storage of ledgers
pub trait LedgerStore: Send + Sync {
    /// Load and normalize the ledger for `identity`
    fn get(&self, identity: &str) -> Result<Option<Ledger>, StoreError>;

    /// Create or overwrite the ledger for `identity`
    fn put(&self, identity: &str, ledger: &Ledger) -> Result<(), StoreError>;

    /// Store a new ledger; returns false without writing if `identity` exists
    fn insert_new(&self, identity: &str, ledger: &Ledger) -> Result<bool, StoreError>;

    /// Snapshot of every ledger in registration order
    fn list_all(&self) -> Result<Vec<Ledger>, StoreError>;

    /// Atomically read, mutate and write one ledger.
    ///
    /// Returns `Ok(None)` if no ledger exists for `identity`. If `mutate`
    /// fails nothing is written and its error is returned.
    fn update(&self, identity: &str, mutate: LedgerMutation<'_>) -> ProgressResult<Option<Ledger>>;
}

/// Remembers which identity is signed in
pub trait SessionStore: Send + Sync {
    fn active_identity(&self) -> Result<Option<String>, StoreError>;

    fn set_active_identity(&self, identity: Option<&str>) -> Result<(), StoreError>;
}
