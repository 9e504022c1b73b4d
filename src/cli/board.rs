//! Leaderboard, badge and history views

use anyhow::Result;

use questlog::progress::{calendar, ProgressManager};

pub fn leaderboard_command(manager: &ProgressManager) -> Result<()> {
    let board = manager.leaderboard()?;
    let me = manager.current_user()?.map(|l| l.username);

    if board.is_placeholder() {
        println!("No adventurers yet. Sign up to claim a spot!\n");
    }

    for (i, entry) in board.entries.iter().enumerate() {
        let marker = match &me {
            Some(name) if !board.is_placeholder() && name == &entry.username => " <- you",
            _ => "",
        };
        println!("{:>3}. {:<24} {:>6} XP{}", i + 1, entry.username, entry.xp, marker);
    }
    Ok(())
}

pub fn badges_command(manager: &ProgressManager) -> Result<()> {
    let progress = manager.badges()?;
    let unlocked = progress.iter().filter(|p| p.unlocked).count();
    println!("Badges: {}/{}\n", unlocked, progress.len());

    for p in &progress {
        let mark = if p.unlocked { "[x]" } else { "[ ]" };
        println!(
            "{} {:<22} {:<6} {}",
            mark,
            p.badge.name,
            p.badge.difficulty.as_str(),
            p.badge.description
        );
        if !p.unlocked {
            println!(
                "      {}: {}/{} ({:.0}%)",
                p.badge.rule.describe(),
                p.current,
                p.target,
                p.ratio() * 100.0
            );
        }
    }
    Ok(())
}

pub fn history_command(manager: &ProgressManager, limit: usize) -> Result<()> {
    let history = manager.history(Some(limit))?;
    if history.is_empty() {
        println!("No quests completed yet.");
        return Ok(());
    }

    let mut current_day = None;
    for entry in &history {
        let day = calendar::day_bucket(calendar::day_of(entry.completed_at));
        if current_day.as_ref() != Some(&day) {
            println!("{}", day);
            current_day = Some(day);
        }
        println!(
            "  {}  {:<12} {}",
            entry.completed_at.format("%H:%M"),
            entry.category,
            entry.title
        );
    }
    Ok(())
}
