//! Conversation records shared between sessions and the workflow.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
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

/// Formats a history suffix as "User:"/"Assistant:" lines for prompt
/// interpolation. Empty history yields an empty string.
pub fn format_history(history: &[ChatMessage]) -> String {
    let mut formatted = String::new();
    for msg in history {
        let role = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        formatted.push_str(role);
        formatted.push_str(": ");
        formatted.push_str(&msg.content);
        formatted.push('\n');
    }
    formatted
}
