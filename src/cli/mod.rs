//! CLI command implementations

pub mod account;
pub mod board;
pub mod init;
pub mod quest;

use std::path::Path;

use anyhow::Result;

use questlog::config::Config;
use questlog::progress::ProgressManager;

/// Load config and open the ledger database it points at
pub fn open_manager(config_path: Option<&Path>) -> Result<ProgressManager> {
    let config = Config::load(config_path)?;
    ProgressManager::open(&config)
}

/// Render the weekly buckets as a one-line bar chart, Sunday first
pub fn weekly_bars(weekly: &[u64; 7]) -> String {
    const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    DAYS.iter()
        .zip(weekly)
        .map(|(day, xp)| format!("{day} {xp:>3}"))
        .collect::<Vec<_>>()
        .join("  ")
}
