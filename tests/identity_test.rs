//! Integration tests for sign-up, sign-in and username changes

mod common;

use chrono::{Duration, Utc};

use questlog::progress::ProgressError;
use questlog::Quest;

use common::{at, create_test_manager};

#[test]
fn test_sign_up_rejects_duplicate_email_and_username() {
    let (_dir, manager) = create_test_manager();
    manager.sign_up("ada@example.com", "Ada", None).unwrap();

    let dup_email = manager.sign_up("ada@example.com", "someone", None);
    assert!(matches!(dup_email, Err(ProgressError::AccountExists(_))));

    let dup_name = manager.sign_up("grace@example.com", "ADA", None);
    assert!(
        matches!(dup_name, Err(ProgressError::UsernameTaken(_))),
        "Username uniqueness should ignore case, got: {:?}",
        dup_name
    );

    let blank = manager.sign_up("grace@example.com", "   ", None);
    assert!(matches!(blank, Err(ProgressError::InvalidUsername)));
}

#[test]
fn test_sign_in_unknown_account() {
    let (_dir, manager) = create_test_manager();
    let result = manager.sign_in("nobody@example.com");
    assert!(matches!(result, Err(ProgressError::AccountNotFound(_))));
    assert!(manager.active_identity().unwrap().is_none());
}

#[test]
fn test_sign_in_switches_active_user() {
    let (_dir, manager) = create_test_manager();
    manager.sign_up("ada@example.com", "ada", None).unwrap();
    manager.sign_up("grace@example.com", "grace", None).unwrap();
    assert_eq!(
        manager.active_identity().unwrap().as_deref(),
        Some("grace@example.com")
    );

    manager.sign_in("ada@example.com").unwrap();
    manager
        .complete_quest_at(&Quest::new("Stretch", "Wellness", 10), at(2025, 1, 15))
        .unwrap();

    let ada = manager.current_user().unwrap().unwrap();
    assert_eq!(ada.username, "ada");
    assert_eq!(ada.xp, 10);
}

#[test]
fn test_rename_respects_cooldown() {
    let (_dir, manager) = create_test_manager();
    manager.sign_up("ada@example.com", "ada", None).unwrap();
    let now = Utc::now();

    // Sign-up counts as the last change
    let early = manager.rename_at("countess", now + Duration::days(6));
    assert!(
        matches!(early, Err(ProgressError::CooldownActive { days_remaining }) if days_remaining <= 1),
        "got: {:?}",
        early
    );

    let renamed = manager.rename_at("countess", now + Duration::days(7)).unwrap();
    assert_eq!(renamed.username, "countess");

    let again = manager.rename_at("lovelace", now + Duration::days(8));
    assert!(matches!(again, Err(ProgressError::CooldownActive { .. })));
}

#[test]
fn test_rename_to_taken_username_fails() {
    let (_dir, manager) = create_test_manager();
    manager.sign_up("grace@example.com", "grace", None).unwrap();
    manager.sign_up("ada@example.com", "ada", None).unwrap();
    let later = Utc::now() + Duration::days(30);

    let taken = manager.rename_at("Grace", later);
    assert!(matches!(taken, Err(ProgressError::UsernameTaken(_))));

    // Changing only the case of your own name is allowed
    let recased = manager.rename_at("Ada", later).unwrap();
    assert_eq!(recased.username, "Ada");
}

#[test]
fn test_profile_settings_persist() {
    let (_dir, manager) = create_test_manager();
    manager
        .sign_up("ada@example.com", "ada", Some("data:image/png;base64,AAAA".into()))
        .unwrap();

    manager.set_notifications(false).unwrap();
    manager.set_profile_picture(None).unwrap();

    let ledger = manager.current_user().unwrap().unwrap();
    assert!(!ledger.notifications_enabled);
    assert!(ledger.profile_picture.is_none());
}
