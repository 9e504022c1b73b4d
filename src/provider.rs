//! Quest content provider contract
//!
//! Quest proposals come from an external generator. The progression core never
//! calls it; hosts do, and hand the quest the user finished to
//! [`ProgressManager::complete_quest`](crate::progress::ProgressManager::complete_quest).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Quest;

/// User's self-reported energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Energy {
    Low,
    Medium,
    High,
}

/// Input for one round of quest generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestRequest {
    /// Category names the user wants to work on; may be empty
    pub goals: Vec<String>,
    pub energy: Energy,
    pub mood: String,
}

impl QuestRequest {
    /// True when the quest's category is among the goals, or no goals were given
    pub fn wants(&self, quest: &Quest) -> bool {
        self.goals.is_empty()
            || self
                .goals
                .iter()
                .any(|g| g.eq_ignore_ascii_case(&quest.category))
    }
}

/// A generated set of quests plus a motivational line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestBatch {
    pub quests: Vec<Quest>,
    pub daily_message: String,
}

impl QuestBatch {
    /// Parse a provider response. A saved error response (`{"error": {...}}`)
    /// becomes the matching `ProviderError`; code 429 means rate limited.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        if let Ok(failure) = serde_json::from_str::<ErrorResponse>(json) {
            return Err(match failure.error.code {
                Some(429) => ProviderError::RateLimited,
                _ => ProviderError::Service(failure.error.message),
            });
        }

        let batch: QuestBatch = serde_json::from_str(json)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        if batch.quests.is_empty() {
            return Err(ProviderError::Malformed("response contains no quests".into()));
        }
        Ok(batch)
    }

    /// Quests in categories the request asked for, or all of them when no
    /// goals were given. Each comes with its 1-based position in the batch.
    pub fn matching<'a>(
        &'a self,
        request: &'a QuestRequest,
    ) -> impl Iterator<Item = (usize, &'a Quest)> + 'a {
        self.quests
            .iter()
            .enumerate()
            .filter(move |(_, q)| request.wants(q))
            .map(|(i, q)| (i + 1, q))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// Error type for quest providers
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("quest provider rate limit reached, try again later")]
    RateLimited,

    #[error("quest provider unavailable: {0}")]
    Service(String),

    #[error("malformed quest response: {0}")]
    Malformed(String),
}

/// Source of quest proposals
pub trait QuestContentProvider {
    fn generate(&self, request: &QuestRequest) -> Result<QuestBatch, ProviderError>;
}

/// Serves a previously saved provider response from disk
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuestContentProvider for JsonFileProvider {
    fn generate(&self, request: &QuestRequest) -> Result<QuestBatch, ProviderError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ProviderError::Service(format!("{}: {}", self.path.display(), e)))?;
        let batch = QuestBatch::from_json(&content)?;
        tracing::debug!(
            "Loaded {} quest(s) from {} for mood '{}'",
            batch.quests.len(),
            self.path.display(),
            request.mood
        );
        Ok(batch)
    }
}
