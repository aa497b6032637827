//! Conversation history entries and stored workspace chat state

use crate::types::events::{ModelResponse, Publication};
use crate::types::tool::ToolCallProgress;
use serde::{Deserialize, Serialize};

/// One entry of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "ai")]
    Ai { content: String },

    #[serde(rename = "tool_call")]
    ToolCall(ToolCallProgress),

    /// Stream-level error rendered inline; never sent by the backend as history
    #[serde(rename = "error")]
    Error { content: String },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai {
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Message::Error {
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User { .. })
    }
}

impl From<ModelResponse> for Message {
    fn from(v: ModelResponse) -> Self {
        match v {
            ModelResponse::Ai { content } => Message::Ai { content },
            ModelResponse::ToolCall(tc) => Message::ToolCall(tc),
        }
    }
}

/// Chat state persisted per workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub queries: Vec<Publication>,
}
