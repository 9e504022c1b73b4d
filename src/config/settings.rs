//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::progress::DEFAULT_RENAME_COOLDOWN_DAYS;

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Ledger database location (defaults to ~/.questlog/ledger.db)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Days a user must wait between username changes
    #[serde(default = "default_rename_cooldown_days")]
    pub rename_cooldown_days: i64,

    /// Maximum rows shown on the leaderboard (unlimited when unset)
    #[serde(default)]
    pub leaderboard_limit: Option<usize>,
}

fn default_rename_cooldown_days() -> i64 {
    DEFAULT_RENAME_COOLDOWN_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            rename_cooldown_days: default_rename_cooldown_days(),
            leaderboard_limit: None,
        }
    }
}
