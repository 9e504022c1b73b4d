use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{LedgerMutation, LedgerStore, SessionStore};
use crate::domain::Ledger;
use crate::progress::{ProgressResult, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    ledgers: HashMap<String, Ledger>,
    /// Identities in registration order
    order: Vec<String>,
    active: Option<String>,
}

/// In-process ledger store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, identity: &str) -> Result<Option<Ledger>, StoreError> {
        Ok(self.state()?.ledgers.get(identity).cloned())
    }

    fn put(&self, identity: &str, ledger: &Ledger) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if state
            .ledgers
            .insert(identity.to_string(), ledger.clone())
            .is_none()
        {
            state.order.push(identity.to_string());
        }
        Ok(())
    }

    fn insert_new(&self, identity: &str, ledger: &Ledger) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        if state.ledgers.contains_key(identity) {
            return Ok(false);
        }
        state.ledgers.insert(identity.to_string(), ledger.clone());
        state.order.push(identity.to_string());
        Ok(true)
    }

    fn list_all(&self) -> Result<Vec<Ledger>, StoreError> {
        let state = self.state()?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.ledgers.get(id).cloned())
            .collect())
    }

    fn update(&self, identity: &str, mutate: LedgerMutation<'_>) -> ProgressResult<Option<Ledger>> {
        // The lock is held for the whole read-modify-write
        let mut state = self.state()?;
        let Some(current) = state.ledgers.get(identity) else {
            return Ok(None);
        };

        let mut working = current.clone();
        mutate(&mut working)?;
        state.ledgers.insert(identity.to_string(), working.clone());
        Ok(Some(working))
    }
}

impl SessionStore for MemoryStore {
    fn active_identity(&self) -> Result<Option<String>, StoreError> {
        Ok(self.state()?.active.clone())
    }

    fn set_active_identity(&self, identity: Option<&str>) -> Result<(), StoreError> {
        self.state()?.active = identity.map(str::to_string);
        Ok(())
    }
}
