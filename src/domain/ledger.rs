use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::calendar::{same_week, weekday_index};

/// Number of daily buckets in `weekly_progress` (Sunday = 0 .. Saturday = 6)
pub const WEEK_DAYS: usize = 7;

/// Current persisted ledger schema version
pub const LEDGER_VERSION: u32 = 3;

/// Aggregate quest counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestStats {
    pub total_quests: u32,
    /// Completions per category name
    pub categories: BTreeMap<String, u32>,
}

/// One entry of the append-only completion history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuest {
    pub title: String,
    pub category: String,
    pub completed_at: DateTime<Utc>,
}

/// Per-user progression record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub version: u32,
    pub email: String,
    pub username: String,
    pub xp: u64,
    pub streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub weekly_progress: [u64; WEEK_DAYS],
    pub username_last_changed: Option<DateTime<Utc>>,
    pub notifications_enabled: bool,
    pub profile_picture: Option<String>,
    /// Badge ids in unlock order; only ever appended to
    pub unlocked_badges: Vec<String>,
    pub quest_stats: QuestStats,
    pub quest_history: Vec<CompletedQuest>,
}

impl Ledger {
    /// A fresh ledger with every counter zeroed
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            version: LEDGER_VERSION,
            email: email.into(),
            username: username.into(),
            xp: 0,
            streak: 0,
            last_activity_date: None,
            weekly_progress: [0; WEEK_DAYS],
            username_last_changed: None,
            notifications_enabled: true,
            profile_picture: None,
            unlocked_badges: Vec::new(),
            quest_stats: QuestStats::default(),
            quest_history: Vec::new(),
        }
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.unlocked_badges.iter().any(|b| b == id)
    }

    /// Record a badge id; returns false if it was already present
    pub fn grant_badge(&mut self, id: &str) -> bool {
        if self.has_badge(id) {
            return false;
        }
        self.unlocked_badges.push(id.to_string());
        true
    }

    pub fn category_count(&self, category: &str) -> u32 {
        self.quest_stats
            .categories
            .get(category)
            .copied()
            .unwrap_or(0)
    }

    /// Number of categories with at least one tallied completion
    pub fn distinct_categories(&self) -> usize {
        self.quest_stats
            .categories
            .values()
            .filter(|count| **count > 0)
            .count()
    }

    /// XP earned so far in the current week
    pub fn weekly_total(&self) -> u64 {
        self.weekly_progress.iter().sum()
    }

    /// XP recorded for the weekday of `day`
    pub fn xp_on(&self, day: NaiveDate) -> u64 {
        self.weekly_progress[weekday_index(day)]
    }

    /// Zero the weekly buckets if `today` falls in a different week than the
    /// last activity. Returns true when a reset happened.
    pub fn roll_week(&mut self, today: NaiveDate) -> bool {
        match self.last_activity_date {
            Some(last) if !same_week(last, today) => {
                self.weekly_progress = [0; WEEK_DAYS];
                true
            }
            _ => false,
        }
    }
}
