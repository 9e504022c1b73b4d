//! Progression tracking for questlog
//!
//! Keeps one ledger per user: XP, daily streak, weekly XP buckets, category
//! tallies, completion history and unlocked badges. Ledgers live in a
//! [`LedgerStore`](crate::store::LedgerStore) (`~/.questlog/ledger.db` by default).
//!
//! # Architecture
//!
//! ```text
//!   completed quest
//!         │
//!         ▼
//! ┌──────────────────┐   evaluate   ┌────────────────┐
//! │ CompletionEngine │ ───────────▶ │  BadgeCatalog  │
//! └────────┬─────────┘              └────────────────┘
//!          │ update (atomic per user)
//!          ▼
//! ┌──────────────────┐   list_all   ┌────────────────┐
//! │   LedgerStore    │ ◀─────────── │  leaderboard   │
//! └────────▲─────────┘              └────────────────┘
//!          │ get / insert_new / update
//! ┌──────────────────┐
//! │ IdentityRegistry │
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let manager = ProgressManager::open(&Config::load(None)?)?;
//! manager.sign_up("ada@example.com", "ada", None)?;
//! let outcome = manager.complete_quest(&Quest::new("Morning jog", "Fitness", 20))?;
//! for badge in &outcome.new_badges {
//!     println!("Unlocked {}", badge.name);
//! }
//! ```

pub mod achievements;
pub mod calendar;
mod engine;
mod error;
mod identity;
mod leaderboard;

pub use achievements::{BadgeCatalog, BadgeDefinition, BadgeProgress, BadgeRule, StreakChange};
pub use engine::{CompletionEngine, CompletionOutcome};
pub use error::{ProgressError, ProgressResult, StoreError};
pub use identity::{IdentityRegistry, DEFAULT_RENAME_COOLDOWN_DAYS};
pub use leaderboard::{rank, Leaderboard, LeaderboardEntry, LeaderboardSource};

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::{Config, Settings};
use crate::domain::{CompletedQuest, Ledger, Quest};
use crate::store::{LedgerStore, SessionStore, SqliteStore};

/// Central entry point for progression operations
///
/// Ties a store, the badge catalog and settings together and resolves the
/// signed-in identity for operations that act on "the current user".
#[derive(Clone)]
pub struct ProgressManager<S = SqliteStore> {
    store: S,
    engine: CompletionEngine,
    settings: Settings,
}

impl ProgressManager<SqliteStore> {
    /// Open the database named by `config` with the standard badge catalog
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.database_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("Failed to open ledger db: {}", path.display()))?;
        Ok(Self::with_store(
            store,
            Arc::new(BadgeCatalog::standard()),
            config.settings.clone(),
        ))
    }
}

impl<S: LedgerStore + SessionStore> ProgressManager<S> {
    pub fn with_store(store: S, catalog: Arc<BadgeCatalog>, settings: Settings) -> Self {
        Self {
            store,
            engine: CompletionEngine::new(catalog),
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        self.engine.catalog()
    }

    /// Identity rules over this manager's store
    pub fn registry(&self) -> IdentityRegistry<'_> {
        IdentityRegistry::new(&self.store).with_cooldown_days(self.settings.rename_cooldown_days)
    }

    // ========================================
    // ACCOUNT OPERATIONS
    // ========================================

    /// Register and sign in a new identity
    pub fn sign_up(
        &self,
        email: &str,
        username: &str,
        profile_picture: Option<String>,
    ) -> ProgressResult<Ledger> {
        let ledger = self
            .registry()
            .sign_up(email, username, profile_picture, Utc::now())?;
        self.store.set_active_identity(Some(email))?;
        Ok(ledger)
    }

    /// Sign in an existing identity
    pub fn sign_in(&self, email: &str) -> ProgressResult<Ledger> {
        let ledger = self.registry().sign_in(email, Utc::now())?;
        self.store.set_active_identity(Some(email))?;
        tracing::info!("Signed in as {}", email);
        Ok(ledger)
    }

    pub fn sign_out(&self) -> ProgressResult<()> {
        self.store.set_active_identity(None)?;
        Ok(())
    }

    pub fn active_identity(&self) -> ProgressResult<Option<String>> {
        Ok(self.store.active_identity()?)
    }

    /// Ledger of the signed-in identity, if any
    pub fn current_user(&self) -> ProgressResult<Option<Ledger>> {
        match self.store.active_identity()? {
            Some(identity) => Ok(self.store.get(&identity)?),
            None => Ok(None),
        }
    }

    fn require_identity(&self) -> ProgressResult<String> {
        self.store
            .active_identity()?
            .ok_or(ProgressError::NoActiveUser)
    }

    // ========================================
    // PROGRESSION OPERATIONS
    // ========================================

    /// Complete a quest as the signed-in identity
    pub fn complete_quest(&self, quest: &Quest) -> ProgressResult<CompletionOutcome> {
        self.complete_quest_at(quest, Utc::now())
    }

    pub fn complete_quest_at(
        &self,
        quest: &Quest,
        now: DateTime<Utc>,
    ) -> ProgressResult<CompletionOutcome> {
        let identity = self.store.active_identity()?;
        self.engine
            .complete_quest(&self.store, identity.as_deref(), quest, now)
    }

    /// Rename the signed-in identity
    pub fn rename(&self, new_username: &str) -> ProgressResult<Ledger> {
        self.rename_at(new_username, Utc::now())
    }

    pub fn rename_at(&self, new_username: &str, now: DateTime<Utc>) -> ProgressResult<Ledger> {
        let identity = self.require_identity()?;
        self.registry().rename_user(&identity, new_username, now)
    }

    pub fn set_notifications(&self, enabled: bool) -> ProgressResult<Ledger> {
        self.update_current(|ledger| ledger.notifications_enabled = enabled)
    }

    pub fn set_profile_picture(&self, picture: Option<String>) -> ProgressResult<Ledger> {
        self.update_current(|ledger| ledger.profile_picture = picture.clone())
    }

    fn update_current(&self, mut apply: impl FnMut(&mut Ledger)) -> ProgressResult<Ledger> {
        let identity = self.require_identity()?;
        self.store
            .update(&identity, &mut |ledger| {
                apply(ledger);
                Ok(())
            })?
            .ok_or(ProgressError::NoActiveUser)
    }

    // ========================================
    // QUERIES
    // ========================================

    /// Ranked view over every registered ledger
    pub fn leaderboard(&self) -> ProgressResult<Leaderboard> {
        let ledgers = self.store.list_all()?;
        Ok(rank(&ledgers).truncate(self.settings.leaderboard_limit))
    }

    /// Badge unlock state for the signed-in identity
    pub fn badges(&self) -> ProgressResult<Vec<BadgeProgress>> {
        let ledger = self.current_user()?.ok_or(ProgressError::NoActiveUser)?;
        Ok(self.catalog().progress(&ledger))
    }

    /// Most recent completions first
    pub fn history(&self, limit: Option<usize>) -> ProgressResult<Vec<CompletedQuest>> {
        let ledger = self.current_user()?.ok_or(ProgressError::NoActiveUser)?;
        let limit = limit.unwrap_or(usize::MAX);
        Ok(ledger.quest_history.into_iter().rev().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> ProgressManager<MemoryStore> {
        ProgressManager::with_store(
            MemoryStore::new(),
            Arc::new(BadgeCatalog::standard()),
            Settings::default(),
        )
    }

    #[test]
    fn test_sign_up_signs_in() {
        let manager = manager();
        manager.sign_up("ada@example.com", "ada", None).unwrap();
        assert_eq!(
            manager.active_identity().unwrap().as_deref(),
            Some("ada@example.com")
        );
        manager.sign_out().unwrap();
        assert!(manager.current_user().unwrap().is_none());
    }

    #[test]
    fn test_operations_require_active_user() {
        let manager = manager();
        let quest = Quest::new("Jog", "Fitness", 10);
        assert!(matches!(
            manager.complete_quest(&quest),
            Err(ProgressError::NoActiveUser)
        ));
        assert!(matches!(
            manager.rename("someone"),
            Err(ProgressError::NoActiveUser)
        ));
        assert!(matches!(
            manager.set_notifications(false),
            Err(ProgressError::NoActiveUser)
        ));
        assert!(matches!(manager.badges(), Err(ProgressError::NoActiveUser)));
    }

    #[test]
    fn test_profile_setters() {
        let manager = manager();
        manager.sign_up("ada@example.com", "ada", None).unwrap();
        let ledger = manager.set_notifications(false).unwrap();
        assert!(!ledger.notifications_enabled);
        let ledger = manager
            .set_profile_picture(Some("avatar.png".into()))
            .unwrap();
        assert_eq!(ledger.profile_picture.as_deref(), Some("avatar.png"));
        assert!(!ledger.notifications_enabled);
    }

    #[test]
    fn test_history_newest_first() {
        let manager = manager();
        manager.sign_up("ada@example.com", "ada", None).unwrap();
        manager.complete_quest(&Quest::new("One", "Fitness", 5)).unwrap();
        manager.complete_quest(&Quest::new("Two", "Social", 5)).unwrap();

        let history = manager.history(Some(1)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Two");
    }

    #[test]
    fn test_leaderboard_limit() {
        let settings = Settings {
            leaderboard_limit: Some(2),
            ..Settings::default()
        };
        let manager = ProgressManager::with_store(
            MemoryStore::new(),
            Arc::new(BadgeCatalog::standard()),
            settings,
        );
        assert_eq!(manager.leaderboard().unwrap().entries.len(), 2);
    }
}
