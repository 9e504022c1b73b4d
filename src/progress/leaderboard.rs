//! Leaderboard ranking
//!
//! Entries are derived from ledgers on demand and never stored.

use serde::Serialize;

use crate::domain::Ledger;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub xp: u64,
}

impl LeaderboardEntry {
    fn new(username: impl Into<String>, xp: u64) -> Self {
        Self {
            username: username.into(),
            xp,
        }
    }
}

/// Where the leaderboard rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSource {
    /// Ranked from registered users
    Registered,
    /// Nobody has registered yet; showing the built-in sample rows
    Placeholder,
}

/// A ranked view over all ledgers
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub source: LeaderboardSource,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn is_placeholder(&self) -> bool {
        self.source == LeaderboardSource::Placeholder
    }

    /// Keep only the first `limit` rows
    pub fn truncate(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self
    }

    /// 1-based rank of `username`, compared case-insensitively
    pub fn position_of(&self, username: &str) -> Option<usize> {
        let wanted = username.to_lowercase();
        self.entries
            .iter()
            .position(|e| e.username.to_lowercase() == wanted)
            .map(|i| i + 1)
    }
}

/// Sample rows shown on a fresh install
fn placeholder_entries() -> Vec<LeaderboardEntry> {
    vec![
        LeaderboardEntry::new("AlexTheAdventurer", 1250),
        LeaderboardEntry::new("QuestQueen", 1100),
        LeaderboardEntry::new("BardOfProductivity", 980),
        LeaderboardEntry::new("ZenMaster", 850),
        LeaderboardEntry::new("CreativeCat", 720),
        LeaderboardEntry::new("FitFiend", 600),
    ]
}

/// Rank ledgers by XP, highest first. Equal XP keeps the input order.
pub fn rank(ledgers: &[Ledger]) -> Leaderboard {
    if ledgers.is_empty() {
        let mut entries = placeholder_entries();
        sort_desc(&mut entries);
        return Leaderboard {
            source: LeaderboardSource::Placeholder,
            entries,
        };
    }

    let mut entries: Vec<LeaderboardEntry> = ledgers
        .iter()
        .map(|l| LeaderboardEntry::new(l.username.clone(), l.xp))
        .collect();
    sort_desc(&mut entries);

    Leaderboard {
        source: LeaderboardSource::Registered,
        entries,
    }
}

fn sort_desc(entries: &mut [LeaderboardEntry]) {
    // sort_by is stable
    entries.sort_by(|a, b| b.xp.cmp(&a.xp));
}
