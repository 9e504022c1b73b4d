//! questlog - progression ledger for daily quests
//!
//! Tracks each user's XP, day-over-day streak, a Sunday-first weekly XP
//! histogram, per-category tallies and completion history, awards badges from
//! a rule catalog, and ranks users on a leaderboard.
//!
//! ## Layout
//!
//! 1. **domain**: ledger and quest data types
//! 2. **progress**: completion engine, badge catalog, identity registry, leaderboard
//! 3. **store**: ledger persistence (SQLite, in-memory)
//! 4. **provider**: contract for the external quest generator

pub mod config;
pub mod domain;
pub mod progress;
pub mod provider;
pub mod store;

pub use domain::*;
