//! Chat message entities as delivered by the streaming client.

use serde::{Deserialize, Serialize};

use crate::parts::MessagePart;

/// One message in a chat transcript.
///
/// Assistant messages usually carry an ordered `parts` list. Older or
/// degenerate payloads only have the flat `content` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<MessagePart>>,
}

impl Message {
    pub fn new(id: impl Into<String>, role: MessageRole) -> Self {
        Self {
            id: id.into(),
            role,
            content: String::new(),
            parts: None,
        }
    }

    /// A user message with flat content.
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(id, MessageRole::User)
        }
    }

    /// An assistant message built from parts.
    pub fn assistant(id: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            parts: Some(parts),
            ..Self::new(id, MessageRole::Assistant)
        }
    }

    /// Parts, or an empty slice when the message has none.
    pub fn parts(&self) -> &[MessagePart] {
        self.parts.as_deref().unwrap_or_default()
    }

    /// Append a part, creating the list if needed.
    pub fn push_part(&mut self, part: MessagePart) {
        self.parts.get_or_insert_with(Vec::new).push(part);
    }
}

/// Message roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
            MessageRole::Tool => write!(f, "tool"),
            MessageRole::Other => write!(f, "other"),
        }
    }
}

impl From<&str> for MessageRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "user" | "human" => MessageRole::User,
            "assistant" | "agent" | "ai" | "bot" => MessageRole::Assistant,
            "system" => MessageRole::System,
            "tool" | "function" => MessageRole::Tool,
            _ => MessageRole::Other,
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
