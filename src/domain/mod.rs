//! Core domain types for questlog

mod ledger;
mod quest;

pub use ledger::{CompletedQuest, Ledger, QuestStats, LEDGER_VERSION, WEEK_DAYS};
pub use quest::{Difficulty, ProofKind, Quest, Reward};
