//! Quest commands: complete and suggest

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use questlog::progress::ProgressManager;
use questlog::provider::{Energy, JsonFileProvider, QuestBatch, QuestContentProvider, QuestRequest};
use questlog::Quest;

use super::weekly_bars;

/// Build a quest from `--title/--category/--xp`
pub fn quest_from_args(
    title: Option<String>,
    category: Option<String>,
    xp: Option<u32>,
) -> Result<Quest> {
    let title = title.ok_or_else(|| anyhow!("--title is required"))?;
    let category = category.ok_or_else(|| anyhow!("--category is required"))?;
    let xp = xp.ok_or_else(|| anyhow!("--xp is required"))?;
    Ok(Quest::new(title, category, xp))
}

/// Pick the `pick`-th (1-based) quest from a saved provider response
pub fn quest_from_file(path: &Path, pick: usize) -> Result<Quest> {
    if pick == 0 {
        bail!("--pick is 1-based; the first quest is --pick 1");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quest file: {}", path.display()))?;
    let batch = QuestBatch::from_json(&content)?;
    let count = batch.quests.len();
    batch
        .quests
        .into_iter()
        .nth(pick - 1)
        .ok_or_else(|| anyhow!("Quest #{} not found ({} available)", pick, count))
}

pub fn complete_command(manager: &ProgressManager, quest: &Quest) -> Result<()> {
    let outcome = manager.complete_quest(quest)?;
    let ledger = &outcome.ledger;

    println!("Quest complete: {} (+{} XP)", quest.title, quest.xp());
    println!(
        "  XP {} | streak {} ({}) | {} quest(s)",
        ledger.xp,
        ledger.streak,
        outcome.streak_change.label(),
        ledger.quest_stats.total_quests
    );
    if outcome.weekly_reset {
        println!("  New week started.");
    }
    println!("  {}", weekly_bars(&ledger.weekly_progress));

    for badge in &outcome.new_badges {
        println!(
            "  Badge unlocked: {} [{}] - {}",
            badge.name, badge.difficulty, badge.description
        );
    }
    Ok(())
}

pub fn suggest_command(file: &Path, goals: Vec<String>, energy: Energy, mood: String) -> Result<()> {
    let request = QuestRequest { goals, energy, mood };
    let batch = JsonFileProvider::new(file).generate(&request)?;

    println!("{}\n", batch.daily_message);
    // Numbered by position in the file so `complete --pick` lines up
    for (pick, quest) in batch.matching(&request) {
        println!(
            "  {}. {} [{} / {}] {} min, +{} XP",
            pick,
            quest.title,
            quest.category,
            quest.difficulty,
            quest.time_minutes,
            quest.xp()
        );
        if !quest.description.is_empty() {
            println!("     {}", quest.description);
        }
        println!("     proof: {}", quest.proof_kind.as_str());
    }
    Ok(())
}
