//! Account and profile commands

use anyhow::Result;
use chrono::Utc;

use questlog::progress::{achievements, calendar, ProgressManager};

use super::weekly_bars;

pub fn signup_command(
    manager: &ProgressManager,
    email: &str,
    username: &str,
    avatar: Option<String>,
) -> Result<()> {
    let ledger = manager.sign_up(email, username, avatar)?;
    println!("Welcome, {}! Signed in as {}.", ledger.username, ledger.email);
    Ok(())
}

pub fn login_command(manager: &ProgressManager, email: &str) -> Result<()> {
    let ledger = manager.sign_in(email)?;
    println!("Signed in as {} ({} XP).", ledger.username, ledger.xp);
    Ok(())
}

pub fn logout_command(manager: &ProgressManager) -> Result<()> {
    manager.sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami_command(manager: &ProgressManager) -> Result<()> {
    let Some(ledger) = manager.current_user()? else {
        println!("Not signed in.");
        return Ok(());
    };

    let today = calendar::day_of(Utc::now());
    let streak_state = if achievements::is_active(ledger.last_activity_date, today) {
        "active"
    } else {
        "inactive"
    };

    println!("{} <{}>", ledger.username, ledger.email);
    println!("  XP:       {}", ledger.xp);
    println!("  Streak:   {} day(s), {}", ledger.streak, streak_state);
    println!("  Quests:   {}", ledger.quest_stats.total_quests);
    println!(
        "  Badges:   {}/{}",
        ledger.unlocked_badges.len(),
        manager.catalog().len()
    );
    println!(
        "  Notify:   {}",
        if ledger.notifications_enabled { "on" } else { "off" }
    );
    println!(
        "  This week ({} XP, {} today):",
        ledger.weekly_total(),
        ledger.xp_on(today)
    );
    println!("    {}", weekly_bars(&ledger.weekly_progress));

    if !ledger.quest_stats.categories.is_empty() {
        println!("  Categories:");
        for (category, count) in &ledger.quest_stats.categories {
            println!("    {:<14} {}", category, count);
        }
    }
    Ok(())
}

pub fn rename_command(manager: &ProgressManager, username: &str) -> Result<()> {
    let ledger = manager.rename(username)?;
    println!("Username changed to {}.", ledger.username);
    Ok(())
}

pub fn notifications_command(manager: &ProgressManager, enabled: bool) -> Result<()> {
    manager.set_notifications(enabled)?;
    println!("Notifications {}.", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub fn avatar_command(manager: &ProgressManager, picture: Option<String>) -> Result<()> {
    let cleared = picture.is_none();
    manager.set_profile_picture(picture)?;
    println!(
        "{}",
        if cleared {
            "Profile picture removed."
        } else {
            "Profile picture updated."
        }
    );
    Ok(())
}
