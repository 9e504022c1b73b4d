use serde::{Deserialize, Serialize};

/// Quest difficulty as reported by the content provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of proof a quest asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofKind {
    Photo,
    Audio,
    Text,
}

impl ProofKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }
}

/// Reward attached to a quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    /// Flavour text for the reward, not a catalog badge id
    #[serde(rename = "badge", default)]
    pub badge_text: String,
}

/// A quest as proposed by the content provider and later completed by a user.
///
/// Only `title`, `category` and `reward.xp` feed the progression ledger; the
/// remaining fields are carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub time_minutes: u32,
    #[serde(rename = "quest", default)]
    pub description: String,
    #[serde(rename = "proof")]
    pub proof_kind: ProofKind,
    pub reward: Reward,
}

impl Quest {
    /// Build a quest with only the fields the ledger cares about
    pub fn new(title: impl Into<String>, category: impl Into<String>, xp: u32) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            difficulty: Difficulty::Easy,
            time_minutes: 0,
            description: String::new(),
            proof_kind: ProofKind::Text,
            reward: Reward {
                xp,
                badge_text: String::new(),
            },
        }
    }

    pub fn xp(&self) -> u32 {
        self.reward.xp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_parses_provider_shape() {
        let json = r#"{
            "title": "Sunrise Stretch",
            "category": "Fitness",
            "difficulty": "Easy",
            "time_minutes": 5,
            "quest": "Stretch for five minutes facing a window.",
            "proof": "photo",
            "reward": { "xp": 15, "badge": "Early Riser" }
        }"#;

        let quest: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(quest.title, "Sunrise Stretch");
        assert_eq!(quest.difficulty, Difficulty::Easy);
        assert_eq!(quest.proof_kind, ProofKind::Photo);
        assert_eq!(quest.xp(), 15);
        assert_eq!(quest.reward.badge_text, "Early Riser");
    }

    #[test]
    fn test_unknown_proof_kind_rejected() {
        let json = r#"{"title":"x","category":"Fitness","difficulty":"Easy","proof":"video","reward":{"xp":1}}"#;
        assert!(serde_json::from_str::<Quest>(json).is_err());
    }
}
