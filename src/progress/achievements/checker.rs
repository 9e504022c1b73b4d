//! Badge rule checking
//!
//! Rules read ledger counters only: no clock, no I/O.

use super::definitions::BadgeRule;
use crate::domain::Ledger;

impl BadgeRule {
    /// Whether the ledger currently satisfies this rule
    pub fn is_met(&self, ledger: &Ledger) -> bool {
        let (current, target) = self.progress(ledger);
        current >= target
    }

    /// Current counter value and the target it must reach
    pub fn progress(&self, ledger: &Ledger) -> (u32, u32) {
        match *self {
            Self::TotalQuests(n) => (ledger.quest_stats.total_quests, n),
            Self::CategoryQuests { category, n } => (ledger.category_count(category), n),
            Self::Streak(n) => (ledger.streak, n),
            Self::DistinctCategories(n) => {
                let distinct = u32::try_from(ledger.distinct_categories()).unwrap_or(u32::MAX);
                (distinct, n)
            }
        }
    }

    /// Human readable condition, used by the badge listing
    pub fn describe(&self) -> String {
        match *self {
            Self::TotalQuests(n) => format!("{n} quests completed"),
            Self::CategoryQuests { category, n } => format!("{n} {category} quests"),
            Self::Streak(n) => format!("{n}-day streak"),
            Self::DistinctCategories(n) => format!("{n} different categories"),
        }
    }
}
