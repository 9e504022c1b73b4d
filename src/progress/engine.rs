//! Completion engine - the quest completion transaction
//!
//! Applies the temporal rules (weekly reset, streak), updates counters and
//! history, evaluates badges, and persists the ledger in one atomic write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::achievements::{BadgeCatalog, BadgeDefinition, StreakChange};
use super::calendar::{day_of, week_start, weekday_index};
use super::error::{ProgressError, ProgressResult};
use crate::domain::{CompletedQuest, Ledger, Quest};
use crate::store::LedgerStore;

/// Result of one completion
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub ledger: Ledger,
    pub new_badges: Vec<BadgeDefinition>,
    pub streak_change: StreakChange,
    pub weekly_reset: bool,
}

/// Applies completed quests to ledgers
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    catalog: Arc<BadgeCatalog>,
}

impl CompletionEngine {
    pub fn new(catalog: Arc<BadgeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    /// Apply a completion to an in-memory ledger. Pure apart from the ledger
    /// mutation; `now` supplies both "today" and the history timestamp.
    pub fn apply(&self, ledger: &mut Ledger, quest: &Quest, now: DateTime<Utc>) -> CompletionOutcome {
        let today = day_of(now);
        let xp = u64::from(quest.xp());

        // Buckets describe the week of last_activity_date; a completion dated
        // in an earlier week counts toward XP and stats only
        let earlier_week = matches!(
            ledger.last_activity_date,
            Some(last) if week_start(today) < week_start(last)
        );
        let weekly_reset = if earlier_week {
            false
        } else {
            let reset = ledger.roll_week(today);
            ledger.weekly_progress[weekday_index(today)] += xp;
            reset
        };

        let streak_change = StreakChange::classify(ledger.last_activity_date, today);
        ledger.streak = streak_change.apply(ledger.streak);

        ledger.xp += xp;
        match ledger.last_activity_date {
            Some(last) if last > today => {
                warn!(
                    "Completion for {} dated {} precedes last activity {}; keeping the later date",
                    ledger.email, today, last
                );
            }
            _ => ledger.last_activity_date = Some(today),
        }

        ledger.quest_stats.total_quests += 1;
        *ledger
            .quest_stats
            .categories
            .entry(quest.category.clone())
            .or_insert(0) += 1;

        ledger.quest_history.push(CompletedQuest {
            title: quest.title.clone(),
            category: quest.category.clone(),
            completed_at: now,
        });

        let new_badges = self.catalog.evaluate(ledger);

        debug!(
            "Applied '{}' (+{} XP, streak {} -> {}) for {}",
            quest.title,
            xp,
            streak_change.label(),
            ledger.streak,
            ledger.email
        );

        CompletionOutcome {
            ledger: ledger.clone(),
            new_badges,
            streak_change,
            weekly_reset,
        }
    }

    /// Complete a quest for `identity` and persist the result.
    ///
    /// Fails with `NoActiveUser` when `identity` is `None` or unknown. The
    /// outcome is only returned once the store has committed the write.
    pub fn complete_quest(
        &self,
        store: &dyn LedgerStore,
        identity: Option<&str>,
        quest: &Quest,
        now: DateTime<Utc>,
    ) -> ProgressResult<CompletionOutcome> {
        let identity = identity.ok_or(ProgressError::NoActiveUser)?;

        let mut outcome = None;
        let committed = store.update(identity, &mut |ledger| {
            outcome = Some(self.apply(ledger, quest, now));
            Ok(())
        })?;

        let (Some(ledger), Some(mut outcome)) = (committed, outcome) else {
            return Err(ProgressError::NoActiveUser);
        };
        outcome.ledger = ledger;

        info!(
            "{} completed '{}' [{}]: +{} XP, total {}, streak {}, {} new badge(s)",
            identity,
            quest.title,
            quest.category,
            quest.xp(),
            outcome.ledger.xp,
            outcome.ledger.streak,
            outcome.new_badges.len()
        );
        Ok(outcome)
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(Arc::new(BadgeCatalog::standard()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::StoreError;
    use crate::store::{LedgerMutation, MemoryStore};
    use chrono::NaiveDate;

    /// Runs the mutation, then fails the write
    struct FailingWriteStore {
        inner: MemoryStore,
    }

    impl LedgerStore for FailingWriteStore {
        fn get(&self, identity: &str) -> Result<Option<Ledger>, StoreError> {
            self.inner.get(identity)
        }

        fn put(&self, identity: &str, ledger: &Ledger) -> Result<(), StoreError> {
            self.inner.put(identity, ledger)
        }

        fn insert_new(&self, identity: &str, ledger: &Ledger) -> Result<bool, StoreError> {
            self.inner.insert_new(identity, ledger)
        }

        fn list_all(&self) -> Result<Vec<Ledger>, StoreError> {
            self.inner.list_all()
        }

        fn update(
            &self,
            identity: &str,
            mutate: LedgerMutation<'_>,
        ) -> ProgressResult<Option<Ledger>> {
            let Some(mut working) = self.inner.get(identity)? else {
                return Ok(None);
            };
            mutate(&mut working)?;
            Err(StoreError::Io(std::io::Error::other("disk full")).into())
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn badge_ids(outcome: &CompletionOutcome) -> Vec<&'static str> {
        outcome.new_badges.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_fresh_user_first_completion_on_wednesday() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");

        // 2024-03-13 is a Wednesday
        let outcome = engine.apply(&mut ledger, &Quest::new("Jog", "Fitness", 20), at(2024, 3, 13));

        assert_eq!(ledger.xp, 20);
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.weekly_progress, [0, 0, 0, 20, 0, 0, 0]);
        assert_eq!(ledger.category_count("Fitness"), 1);
        assert_eq!(badge_ids(&outcome), vec!["first_quest", "fitness_1"]);
        assert_eq!(outcome.streak_change, StreakChange::Started);
        assert_eq!(outcome.ledger, ledger);
    }

    #[test]
    fn test_consecutive_days_build_streak() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        for day in [11, 12, 13] {
            engine.apply(&mut ledger, &Quest::new("Read", "Learning", 5), at(2024, 3, day));
        }
        assert_eq!(ledger.streak, 3);
        assert!(ledger.has_badge("streak_3"));
    }

    #[test]
    fn test_gap_resets_streak() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        engine.apply(&mut ledger, &Quest::new("Read", "Learning", 5), at(2024, 3, 11));
        let outcome = engine.apply(&mut ledger, &Quest::new("Read", "Learning", 5), at(2024, 3, 14));
        assert_eq!(ledger.streak, 1);
        assert_eq!(outcome.streak_change, StreakChange::Reset);
    }

    #[test]
    fn test_same_day_completion_keeps_streak() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        engine.apply(&mut ledger, &Quest::new("A", "Social", 5), at(2024, 3, 11));
        engine.apply(&mut ledger, &Quest::new("B", "Social", 5), at(2024, 3, 12));
        engine.apply(&mut ledger, &Quest::new("C", "Social", 5), at(2024, 3, 12));
        assert_eq!(ledger.streak, 2);
        assert_eq!(ledger.weekly_progress[1], 5);
        assert_eq!(ledger.weekly_progress[2], 10);
    }

    #[test]
    fn test_new_week_clears_buckets() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        // Saturday then the following Sunday
        engine.apply(&mut ledger, &Quest::new("A", "Wellness", 30), at(2024, 3, 16));
        let outcome = engine.apply(&mut ledger, &Quest::new("B", "Wellness", 10), at(2024, 3, 17));

        assert!(outcome.weekly_reset);
        assert_eq!(ledger.weekly_progress, [10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ledger.xp, 40);
        assert_eq!(ledger.streak, 2);
    }

    #[test]
    fn test_backdated_completion_keeps_later_date() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        engine.apply(&mut ledger, &Quest::new("A", "Fitness", 5), at(2024, 3, 13));
        engine.apply(&mut ledger, &Quest::new("B", "Fitness", 5), at(2024, 3, 12));
        assert_eq!(ledger.last_activity_date, NaiveDate::from_ymd_opt(2024, 3, 13));
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.quest_stats.total_quests, 2);
    }

    #[test]
    fn test_backdated_completion_in_earlier_week_leaves_buckets() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        // Sunday, then the Saturday before it, then Monday
        engine.apply(&mut ledger, &Quest::new("A", "Fitness", 10), at(2024, 3, 17));
        let outcome = engine.apply(&mut ledger, &Quest::new("B", "Fitness", 7), at(2024, 3, 16));

        assert!(!outcome.weekly_reset);
        assert_eq!(ledger.weekly_progress, [10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ledger.last_activity_date, NaiveDate::from_ymd_opt(2024, 3, 17));
        assert_eq!(ledger.xp, 17);
        assert_eq!(ledger.quest_stats.total_quests, 2);

        engine.apply(&mut ledger, &Quest::new("C", "Fitness", 5), at(2024, 3, 18));
        assert_eq!(ledger.weekly_progress, [10, 5, 0, 0, 0, 0, 0]);
        assert_eq!(ledger.weekly_progress[6], 0);
        assert_eq!(ledger.xp, 22);
        assert!(ledger.weekly_total() <= ledger.xp);
    }

    #[test]
    fn test_history_tracks_total() {
        let engine = CompletionEngine::default();
        let mut ledger = Ledger::new("ada@example.com", "ada");
        for (i, category) in ["Fitness", "Learning", "Fitness", "Kindness"].iter().enumerate() {
            engine.apply(
                &mut ledger,
                &Quest::new(format!("Quest {i}"), *category, 10),
                at(2024, 3, 10 + i as u32),
            );
            assert_eq!(
                ledger.quest_stats.total_quests as usize,
                ledger.quest_history.len()
            );
            assert!(ledger.weekly_total() <= ledger.xp);
        }
        assert_eq!(ledger.quest_history[3].category, "Kindness");
        assert_eq!(ledger.quest_history[0].completed_at, at(2024, 3, 10));
    }

    #[test]
    fn test_failed_write_is_not_reported_as_success() {
        let engine = CompletionEngine::default();
        let store = FailingWriteStore {
            inner: MemoryStore::new(),
        };
        let before = Ledger::new("ada@example.com", "ada");
        store.put("ada@example.com", &before).unwrap();

        let result = engine.complete_quest(
            &store,
            Some("ada@example.com"),
            &Quest::new("Jog", "Fitness", 20),
            at(2024, 3, 13),
        );

        assert!(
            matches!(result, Err(ProgressError::Persistence(StoreError::Io(_)))),
            "got: {:?}",
            result
        );
        assert_eq!(store.get("ada@example.com").unwrap(), Some(before));
    }

    #[test]
    fn test_complete_without_identity() {
        let engine = CompletionEngine::default();
        let store = MemoryStore::new();
        let err = engine
            .complete_quest(&store, None, &Quest::new("A", "Fitness", 5), at(2024, 3, 13))
            .unwrap_err();
        assert!(matches!(err, ProgressError::NoActiveUser));

        let err = engine
            .complete_quest(
                &store,
                Some("ghost@example.com"),
                &Quest::new("A", "Fitness", 5),
                at(2024, 3, 13),
            )
            .unwrap_err();
        assert!(matches!(err, ProgressError::NoActiveUser));
    }
}
