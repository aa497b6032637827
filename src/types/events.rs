//! Stream events emitted by the workspace chat endpoint
//!
//! One event per NDJSON line:
//!
//! ```text
//! {"type":"chat","content":{"type":"ai","content":"Hel"}}
//! {"type":"record","content":{"name":"New","uuid":"w1", ...}}
//! {"type":"query","content":[{"title":"...", ...}]}
//! {"type":"error","content":"upstream model failed"}
//! ```

use crate::types::tool::ToolCallProgress;
use serde::{Deserialize, Serialize};

/// Model response fragment carried by a `chat` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelResponse {
    /// Incremental text delta for the current assistant message
    #[serde(rename = "ai")]
    Ai { content: String },

    /// Progress update for a tool invocation
    #[serde(rename = "tool_call")]
    ToolCall(ToolCallProgress),
}

impl ModelResponse {
    pub fn ai(content: impl Into<String>) -> Self {
        ModelResponse::Ai {
            content: content.into(),
        }
    }
}

/// Workspace identity announced when the backend creates a workspace mid-exchange.
///
/// Only `name` and `uuid` are required. The stored history is kept as raw
/// JSON: it is not used by the stream and may hold entries this client does
/// not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub chat_history: serde_json::Value,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub create_date: Option<String>,
}

/// Publication / search result surfaced alongside the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub r#abstract: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A single decoded stream event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Model response fragment (text delta or tool progress)
    Chat(ModelResponse),

    /// A workspace was created server-side and becomes the active one
    Record(WorkspaceRecord),

    /// Complete replacement of the query result list
    Query(Vec<Publication>),

    /// Application-level error reported mid-stream
    Error(String),
}

impl ChatEvent {
    /// Wire name of the event discriminant
    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::Chat(_) => "chat",
            ChatEvent::Record(_) => "record",
            ChatEvent::Query(_) => "query",
            ChatEvent::Error(_) => "error",
        }
    }
}
