//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use questlog::config::Config;

/// Default configuration content for questlog init
pub const DEFAULT_CONFIG: &str = r#"# questlog configuration
# =======================

[settings]
# Ledger database (defaults to ~/.questlog/ledger.db)
# database_path = "/path/to/ledger.db"

# Days a user must wait between username changes
rename_cooldown_days = 7

# Maximum rows shown by `questlog leaderboard` (unlimited when unset)
# leaderboard_limit = 20
"#;

pub fn init_command(
    config_path: Option<PathBuf>,
    database: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    match database {
        Some(database_path) => {
            let mut config = Config::default();
            config.settings.database_path = Some(database_path);
            config.save_to_file(&config_path)?;
        }
        None => Config::save_template(&config_path, DEFAULT_CONFIG)?,
    }
    println!("Created: {}", config_path.display());

    Ok(())
}
