//! Topics and their per-level learning content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty level of a topic.
///
/// Serializes to the capitalized names used in stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "Beginner" => Ok(Level::Beginner),
            "Intermediate" => Ok(Level::Intermediate),
            "Advanced" => Ok(Level::Advanced),
            other => Err(crate::Error::Validation(format!(
                "invalid level: {} (expected Beginner, Intermediate or Advanced)",
                other
            ))),
        }
    }
}

/// Ordered learning points per level.
///
/// All three keys are always present, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContent {
    #[serde(rename = "Beginner")]
    pub beginner: Vec<String>,

    #[serde(rename = "Intermediate")]
    pub intermediate: Vec<String>,

    #[serde(rename = "Advanced")]
    pub advanced: Vec<String>,
}

impl TopicContent {
    /// Three empty lists.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.beginner.is_empty() && self.intermediate.is_empty() && self.advanced.is_empty()
    }

    pub fn for_level(&self, level: Level) -> &[String] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    /// Total number of learning points across all levels.
    pub fn total_items(&self) -> usize {
        self.beginner.len() + self.intermediate.len() + self.advanced.len()
    }
}

/// A study topic as stored and served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: uuid::Uuid,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: Level,
    pub content: TopicContent,
    pub user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Topic {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        level: Level,
        content: TopicContent,
        user_id: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            slug: slug.into(),
            title: title.into(),
            description,
            level,
            content,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub description: Option<String>,
    pub level: Level,
    pub content: Option<TopicContent>,
}

/// Partial update of a topic's metadata.
#[derive(Debug, Clone, Default)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<Level>,
}

impl TopicPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.level.is_none()
    }
}
