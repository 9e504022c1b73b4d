//! Gamification rules: badges and streaks

mod catalog;
mod checker;
mod definitions;
mod streaks;

pub use catalog::{BadgeCatalog, BadgeProgress};
pub use definitions::{BadgeDefinition, BadgeRule, BADGES};
pub use streaks::{is_active, StreakChange};
