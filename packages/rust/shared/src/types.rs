//! Core domain types shared by the RAG and newsletter pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ToolRecord
// ---------------------------------------------------------------------------

/// One AI tool in the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Product name (e.g., `Chroma`).
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Category label (e.g., `Vector Database`).
    pub category: String,
    /// Project or product homepage.
    pub url: String,
    /// GitHub stars, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u32>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

// ---------------------------------------------------------------------------
// NewsItem
// ---------------------------------------------------------------------------

/// A single entry pulled from a feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// Plain-text description (HTML stripped).
    pub description: String,
    pub url: String,
    /// Name of the feed source this item came from.
    pub source: String,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
    #[serde(default = "default_category")]
    pub category: String,
}

/// Category assigned to feed items that carry none.
pub fn default_category() -> String {
    "general".into()
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
