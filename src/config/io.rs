//! Configuration file I/O operations

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.questlog/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".questlog")
    }

    /// Get the global config file path (~/.questlog/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` (or the global config) if it exists, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Resolved ledger database path
    pub fn database_path(&self) -> PathBuf {
        self.settings
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("ledger.db"))
    }

    /// Write this config as TOML to `path`
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_config_file(path, &content)
    }

    /// Write a hand-written config template to `path`. The template must parse.
    pub fn save_template(path: &Path, template: &str) -> Result<()> {
        toml::from_str::<Config>(template).context("Config template does not parse")?;
        write_config_file(path, template)
    }
}

/// Replace `path` with `content`. Concurrent `questlog init` runs serialize on
/// `<path>.lock`, and readers only ever see the old or the new file.
fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }

    let lock_path = path.with_extension("lock");
    let lock = File::create(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;
    FileExt::lock_exclusive(&lock).context("Failed to acquire config lock")?;

    let staged = path.with_extension("toml.new");
    let mut file = File::create(&staged)
        .with_context(|| format!("Failed to stage config: {}", staged.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write config: {}", staged.display()))?;

    std::fs::rename(&staged, path)
        .with_context(|| format!("Failed to replace config: {}", path.display()))?;
    tracing::debug!("Wrote config {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.rename_cooldown_days = 3;
        config.settings.database_path = Some(dir.path().join("ledger.db"));
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.settings.rename_cooldown_days, 3);
        assert_eq!(loaded.database_path(), dir.path().join("ledger.db"));
        assert!(!path.with_extension("toml.new").exists());
    }

    #[test]
    fn test_bad_template_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::save_template(&path, "[settings]\nrename_cooldown_days = \"soon\"").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.settings.rename_cooldown_days, 7);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "settings = [").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
