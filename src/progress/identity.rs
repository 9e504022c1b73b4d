//! Identity registry: account creation, username uniqueness and rename cooldown
//!
//! Uniqueness is checked against a snapshot of all ledgers. It is best-effort
//! unless the store serializes concurrent signups and renames.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::calendar::day_of;
use super::error::{ProgressError, ProgressResult};
use crate::domain::Ledger;
use crate::store::LedgerStore;

/// Default days between username changes
pub const DEFAULT_RENAME_COOLDOWN_DAYS: i64 = 7;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Username and account rules over a ledger store
pub struct IdentityRegistry<'a> {
    store: &'a dyn LedgerStore,
    cooldown_days: i64,
}

impl<'a> IdentityRegistry<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            cooldown_days: DEFAULT_RENAME_COOLDOWN_DAYS,
        }
    }

    pub fn with_cooldown_days(mut self, days: i64) -> Self {
        self.cooldown_days = days.max(0);
        self
    }

    /// True unless another identity already uses `candidate`, compared
    /// case-insensitively. A blank candidate is always available.
    pub fn is_username_available(
        &self,
        candidate: &str,
        excluding: Option<&str>,
    ) -> ProgressResult<bool> {
        if candidate.is_empty() {
            return Ok(true);
        }
        let wanted = candidate.to_lowercase();
        let taken = self
            .store
            .list_all()?
            .iter()
            .any(|ledger| {
                ledger.username.to_lowercase() == wanted
                    && Some(ledger.email.as_str()) != excluding
            });
        Ok(!taken)
    }

    pub fn exists(&self, identity: &str) -> ProgressResult<bool> {
        Ok(self.store.get(identity)?.is_some())
    }

    /// Register a new identity with a zeroed ledger
    pub fn sign_up(
        &self,
        email: &str,
        username: &str,
        profile_picture: Option<String>,
        now: DateTime<Utc>,
    ) -> ProgressResult<Ledger> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProgressError::InvalidUsername);
        }
        if self.exists(email)? {
            return Err(ProgressError::AccountExists(email.to_string()));
        }
        if !self.is_username_available(username, None)? {
            return Err(ProgressError::UsernameTaken(username.to_string()));
        }

        let mut ledger = Ledger::new(email, username);
        ledger.profile_picture = profile_picture;
        ledger.username_last_changed = Some(now);

        if !self.store.insert_new(email, &ledger)? {
            return Err(ProgressError::AccountExists(email.to_string()));
        }
        info!("Registered {} as '{}'", email, username);
        Ok(ledger)
    }

    /// Load an existing identity, clearing last week's buckets if a new week
    /// has started since its last activity
    pub fn sign_in(&self, email: &str, now: DateTime<Utc>) -> ProgressResult<Ledger> {
        let today = day_of(now);
        self.store
            .update(email, &mut |ledger| {
                ledger.roll_week(today);
                Ok(())
            })?
            .ok_or_else(|| ProgressError::AccountNotFound(email.to_string()))
    }

    /// Change the username of `identity`
    pub fn rename_user(
        &self,
        identity: &str,
        new_username: &str,
        now: DateTime<Utc>,
    ) -> ProgressResult<Ledger> {
        let new_username = new_username.trim();
        if new_username.is_empty() {
            return Err(ProgressError::InvalidUsername);
        }

        let current = self.store.get(identity)?.ok_or(ProgressError::NoActiveUser)?;
        self.check_cooldown(&current, now)?;
        if !self.is_username_available(new_username, Some(identity))? {
            return Err(ProgressError::UsernameTaken(new_username.to_string()));
        }

        let updated = self
            .store
            .update(identity, &mut |ledger| {
                // Re-check inside the write in case another rename landed
                self.check_cooldown(ledger, now)?;
                ledger.username = new_username.to_string();
                ledger.username_last_changed = Some(now);
                Ok(())
            })?
            .ok_or(ProgressError::NoActiveUser)?;

        info!(
            "{} renamed '{}' -> '{}'",
            identity, current.username, updated.username
        );
        Ok(updated)
    }

    /// Days until `ledger` may rename again, or `None` if it may rename now
    pub fn cooldown_remaining(&self, ledger: &Ledger, now: DateTime<Utc>) -> Option<i64> {
        let changed = ledger.username_last_changed?;
        let elapsed = now - changed;
        if elapsed >= Duration::days(self.cooldown_days) {
            return None;
        }
        // Whole days elapsed, rounded up
        let elapsed_ms = elapsed.num_milliseconds();
        let days_elapsed = (elapsed_ms + MS_PER_DAY - 1).div_euclid(MS_PER_DAY);
        Some((self.cooldown_days - days_elapsed).clamp(0, self.cooldown_days))
    }

    fn check_cooldown(&self, ledger: &Ledger, now: DateTime<Utc>) -> ProgressResult<()> {
        match self.cooldown_remaining(ledger, now) {
            Some(days_remaining) => Err(ProgressError::CooldownActive { days_remaining }),
            None => Ok(()),
        }
    }
}
