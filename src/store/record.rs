//! Persisted ledger records and their normalization
//!
//! Ledgers are stored as one JSON document per identity. Older documents may
//! lack fields that later versions added:
//! - v1: identity, xp, streak, `lastQuestDate`, weekly buckets
//! - v2: badges, quest stats, notification flag, profile picture
//! - v3: quest history, `lastActivityDate`
//!
//! `normalize` fills every missing field with its zero value and stamps the
//! current version. It runs once, when a record is loaded.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::{CompletedQuest, Ledger, QuestStats, LEDGER_VERSION, WEEK_DAYS};
use crate::progress::StoreError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStats {
    total_quests: Option<u32>,
    categories: Option<BTreeMap<String, u32>>,
}

/// A ledger document of any schema version
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    version: Option<u32>,
    email: Option<String>,
    username: Option<String>,
    xp: Option<u64>,
    streak: Option<u32>,
    #[serde(alias = "lastQuestDate")]
    last_activity_date: Option<NaiveDate>,
    weekly_progress: Option<Vec<u64>>,
    username_last_changed: Option<DateTime<Utc>>,
    notifications_enabled: Option<bool>,
    profile_picture: Option<String>,
    unlocked_badges: Option<Vec<String>>,
    quest_stats: Option<StoredStats>,
    quest_history: Option<Vec<CompletedQuest>>,
}

impl LedgerRecord {
    pub fn version(&self) -> u32 {
        self.version.unwrap_or(1)
    }

    /// Bring the record up to the current schema. `identity` is the store key
    /// and wins over an email missing from the document.
    pub fn normalize(self, identity: &str) -> Ledger {
        let mut weekly_progress = [0u64; WEEK_DAYS];
        if let Some(stored) = self.weekly_progress {
            for (slot, value) in weekly_progress.iter_mut().zip(stored) {
                *slot = value;
            }
        }

        let mut unlocked_badges: Vec<String> = Vec::new();
        for id in self.unlocked_badges.unwrap_or_default() {
            if !unlocked_badges.contains(&id) {
                unlocked_badges.push(id);
            }
        }

        let stats = self.quest_stats.unwrap_or_default();

        Ledger {
            version: LEDGER_VERSION,
            email: self.email.unwrap_or_else(|| identity.to_string()),
            username: self.username.unwrap_or_default(),
            xp: self.xp.unwrap_or(0),
            streak: self.streak.unwrap_or(0),
            last_activity_date: self.last_activity_date,
            weekly_progress,
            username_last_changed: self.username_last_changed,
            notifications_enabled: self.notifications_enabled.unwrap_or(true),
            profile_picture: self.profile_picture,
            unlocked_badges,
            quest_stats: QuestStats {
                total_quests: stats.total_quests.unwrap_or(0),
                categories: stats.categories.unwrap_or_default(),
            },
            quest_history: self.quest_history.unwrap_or_default(),
        }
    }
}

/// Decode and normalize a stored document
pub fn decode(identity: &str, json: &str) -> Result<Ledger, StoreError> {
    let record: LedgerRecord = serde_json::from_str(json)?;
    if record.version() < LEDGER_VERSION {
        tracing::debug!(
            "Migrating ledger for {} from v{} to v{}",
            identity,
            record.version(),
            LEDGER_VERSION
        );
    }
    Ok(record.normalize(identity))
}

/// Encode a ledger for storage
pub fn encode(ledger: &Ledger) -> Result<String, StoreError> {
    Ok(serde_json::to_string(ledger)?)
}
