//! Badge definitions and metadata
//!
//! The standard catalog is declared here with its unlock rules. Declaration
//! order is evaluation order.

use serde::Serialize;

pub use crate::domain::Difficulty;

/// Typed unlock condition for a badge.
///
/// Every variant reads a counter that only grows during normal play, so a rule
/// that holds once keeps holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeRule {
    /// At least `n` quests completed in total
    TotalQuests(u32),
    /// At least `n` quests completed in one category
    CategoryQuests { category: &'static str, n: u32 },
    /// Current daily streak of at least `n`
    Streak(u32),
    /// Completions in at least `n` different categories
    DistinctCategories(u32),
}

/// Badge definition with all metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    #[serde(skip)]
    pub rule: BadgeRule,
}

/// The standard badge set
pub static BADGES: &[BadgeDefinition] = &[
    // === EASY ===
    BadgeDefinition {
        id: "first_quest",
        name: "First Step",
        description: "Complete your very first quest.",
        difficulty: Difficulty::Easy,
        rule: BadgeRule::TotalQuests(1),
    },
    BadgeDefinition {
        id: "fitness_1",
        name: "Fitness Novice",
        description: "Complete 1 Fitness quest.",
        difficulty: Difficulty::Easy,
        rule: BadgeRule::CategoryQuests {
            category: "Fitness",
            n: 1,
        },
    },
    BadgeDefinition {
        id: "learning_1",
        name: "Learning Novice",
        description: "Complete 1 Learning quest.",
        difficulty: Difficulty::Easy,
        rule: BadgeRule::CategoryQuests {
            category: "Learning",
            n: 1,
        },
    },
    BadgeDefinition {
        id: "social_1",
        name: "Social Novice",
        description: "Complete 1 Social quest.",
        difficulty: Difficulty::Easy,
        rule: BadgeRule::CategoryQuests {
            category: "Social",
            n: 1,
        },
    },
    BadgeDefinition {
        id: "streak_3",
        name: "On a Roll",
        description: "Achieve a 3-day streak.",
        difficulty: Difficulty::Easy,
        rule: BadgeRule::Streak(3),
    },
    // === MEDIUM ===
    BadgeDefinition {
        id: "total_10",
        name: "Quest Apprentice",
        description: "Complete 10 total quests.",
        difficulty: Difficulty::Medium,
        rule: BadgeRule::TotalQuests(10),
    },
    BadgeDefinition {
        id: "fitness_5",
        name: "Fitness Adept",
        description: "Complete 5 Fitness quests.",
        difficulty: Difficulty::Medium,
        rule: BadgeRule::CategoryQuests {
            category: "Fitness",
            n: 5,
        },
    },
    BadgeDefinition {
        id: "learning_5",
        name: "Learning Adept",
        description: "Complete 5 Learning quests.",
        difficulty: Difficulty::Medium,
        rule: BadgeRule::CategoryQuests {
            category: "Learning",
            n: 5,
        },
    },
    BadgeDefinition {
        id: "wellness_5",
        name: "Wellness Adept",
        description: "Complete 5 Wellness quests.",
        difficulty: Difficulty::Medium,
        rule: BadgeRule::CategoryQuests {
            category: "Wellness",
            n: 5,
        },
    },
    BadgeDefinition {
        id: "streak_7",
        name: "Week-Long Warrior",
        description: "Achieve a 7-day streak.",
        difficulty: Difficulty::Medium,
        rule: BadgeRule::Streak(7),
    },
    // === HARD ===
    BadgeDefinition {
        id: "total_25",
        name: "Quest Master",
        description: "Complete 25 total quests.",
        difficulty: Difficulty::Hard,
        rule: BadgeRule::TotalQuests(25),
    },
    BadgeDefinition {
        id: "all_categories_1",
        name: "Jack of All Trades",
        description: "Complete at least one quest in 5 different categories.",
        difficulty: Difficulty::Hard,
        rule: BadgeRule::DistinctCategories(5),
    },
    BadgeDefinition {
        id: "streak_14",
        name: "Unstoppable Force",
        description: "Achieve a 14-day streak.",
        difficulty: Difficulty::Hard,
        rule: BadgeRule::Streak(14),
    },
];
