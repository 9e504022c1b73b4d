//! Badge catalog: an ordered, immutable set of definitions evaluated against a ledger

use std::collections::HashSet;

use serde::Serialize;

use super::definitions::{BadgeDefinition, BADGES};
use crate::domain::Ledger;
use crate::progress::error::{ProgressError, ProgressResult};

/// Unlock state of one badge for a given ledger
#[derive(Debug, Clone, Serialize)]
pub struct BadgeProgress {
    pub badge: BadgeDefinition,
    pub unlocked: bool,
    pub current: u32,
    pub target: u32,
}

impl BadgeProgress {
    /// Fraction towards the target (0.0 - 1.0)
    pub fn ratio(&self) -> f32 {
        if self.unlocked || self.target == 0 {
            return 1.0;
        }
        (self.current.min(self.target) as f32) / (self.target as f32)
    }
}

/// Injected badge registry. Cheap to clone behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl BadgeCatalog {
    /// Catalog with the standard badge set
    pub fn standard() -> Self {
        Self {
            badges: BADGES.to_vec(),
        }
    }

    /// Build a catalog from custom definitions; ids must be unique
    pub fn new(badges: Vec<BadgeDefinition>) -> ProgressResult<Self> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id) {
                return Err(ProgressError::InvalidCatalog(format!(
                    "duplicate badge id '{}'",
                    badge.id
                )));
            }
        }
        Ok(Self { badges })
    }

    pub fn badges(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// Unlock every badge whose rule now holds and that the ledger does not
    /// have yet. Returns the new badges in declaration order. Catalog badges
    /// are never removed, even if their rule no longer holds; ids this catalog
    /// does not know are dropped.
    pub fn evaluate(&self, ledger: &mut Ledger) -> Vec<BadgeDefinition> {
        let before = ledger.unlocked_badges.len();
        ledger.unlocked_badges.retain(|id| self.contains(id));
        if ledger.unlocked_badges.len() != before {
            tracing::debug!(
                "Dropped {} unknown badge id(s) from {}",
                before - ledger.unlocked_badges.len(),
                ledger.email
            );
        }

        let mut newly_unlocked = Vec::new();

        for badge in &self.badges {
            if ledger.has_badge(badge.id) {
                continue;
            }
            if badge.rule.is_met(ledger) {
                ledger.grant_badge(badge.id);
                newly_unlocked.push(*badge);
            }
        }

        newly_unlocked
    }

    /// Per-badge unlock state, in declaration order
    pub fn progress(&self, ledger: &Ledger) -> Vec<BadgeProgress> {
        self.badges
            .iter()
            .map(|badge| {
                let (current, target) = badge.rule.progress(ledger);
                BadgeProgress {
                    badge: *badge,
                    unlocked: ledger.has_badge(badge.id),
                    current,
                    target,
                }
            })
            .collect()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
