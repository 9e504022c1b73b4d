//! Shared test utilities for ledger integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use questlog::config::Settings;
use questlog::progress::{BadgeCatalog, ProgressManager};
use questlog::store::SqliteStore;

/// A manager over a fresh on-disk database. Keep the `TempDir` alive for the
/// duration of the test.
pub fn create_test_manager() -> (TempDir, ProgressManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let manager = open_manager_at(db_path(&temp_dir));
    (temp_dir, manager)
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("ledger.db")
}

/// Open (or reopen) the database at `path`
pub fn open_manager_at(path: PathBuf) -> ProgressManager {
    let store = SqliteStore::open(&path).expect("Failed to open ledger db");
    ProgressManager::with_store(store, Arc::new(BadgeCatalog::standard()), Settings::default())
}

/// Noon UTC on the given day
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid date")
}
