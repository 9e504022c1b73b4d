//! Daily streak tracking
//!
//! A streak counts consecutive calendar days with at least one completion.

use chrono::NaiveDate;
use serde::Serialize;

use crate::progress::calendar::days_between;

/// What a completion on `today` did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First completion ever
    Started,
    /// Completion exactly one day after the last one
    Extended,
    /// Gap of more than one day
    Reset,
    /// Another completion on the same day (or a clock that went backwards)
    Unchanged,
}

impl StreakChange {
    /// Classify a completion on `today` given the previous activity date
    pub fn classify(last_activity: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(last) = last_activity else {
            return Self::Started;
        };

        match days_between(last, today) {
            1 => Self::Extended,
            d if d > 1 => Self::Reset,
            _ => Self::Unchanged,
        }
    }

    /// Apply the change to a streak count
    pub fn apply(self, streak: u32) -> u32 {
        match self {
            Self::Started | Self::Reset => 1,
            Self::Extended => streak.saturating_add(1),
            Self::Unchanged => streak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Extended => "extended",
            Self::Reset => "reset",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Whether a streak is still alive on `today` (activity today or yesterday)
pub fn is_active(last_activity: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_activity {
        Some(last) => (0..=1).contains(&days_between(last, today)),
        None => false,
    }
}
