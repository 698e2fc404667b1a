use serde::{Deserialize, Serialize};

/// Speaker of a conversational history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

/// One entry of the alternating history handed to a chat model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

impl HistoryMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// Entry of a conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ChatTurn {
    Human(String),
    Ai(String),
    /// Free-form note recorded alongside the conversation
    SystemLog(String),
    /// Condensed replacement for older turns. Only ever at the head of a log.
    RunningSummary(String),
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        ChatTurn::Human(content.into())
    }

    pub fn ai(content: impl Into<String>) -> Self {
        ChatTurn::Ai(content.into())
    }

    pub fn text(&self) -> &str {
        match self {
            ChatTurn::Human(text)
            | ChatTurn::Ai(text)
            | ChatTurn::SystemLog(text)
            | ChatTurn::RunningSummary(text) => text,
        }
    }

    /// Conversational role, if the entry has one
    pub fn role(&self) -> Option<Role> {
        match self {
            ChatTurn::Human(_) => Some(Role::Human),
            ChatTurn::Ai(_) => Some(Role::Ai),
            ChatTurn::SystemLog(_) | ChatTurn::RunningSummary(_) => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, ChatTurn::RunningSummary(_))
    }
}
