//! # Types Module
//!
//! Strongly-typed representations of everything that crosses the wire between
//! this client and the workspace backend.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatEvent`] | One decoded stream event (`chat`, `record`, `query`, `error`) |
//! | [`ModelResponse`] | Fragment carried by a `chat` event (`ai` delta or `tool_call` progress) |
//! | [`Message`] | Conversation history entry |
//! | [`ChatState`] | Stored messages and query results of a workspace |
//! | [`Workspace`] | Workspace metadata with history |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`events`] | Stream event types |
//! | [`message`] | Conversation entries and chat state |
//! | [`tool`] | Tool invocation progress |
//! | [`workspace`] | Workspace, file and agent endpoint shapes |
//!
//! ## Example
//!
//! ```rust
//! use workspace_chat::types::{ChatEvent, ModelResponse};
//!
//! let line = r#"{"type":"chat","content":{"type":"ai","content":"Hi"}}"#;
//! let event: ChatEvent = serde_json::from_str(line).unwrap();
//! assert_eq!(event, ChatEvent::Chat(ModelResponse::ai("Hi")));
//! ```

pub mod events;
pub mod message;
pub mod tool;
pub mod workspace;

pub use events::{ChatEvent, ModelResponse, Publication, WorkspaceRecord};
pub use message::{ChatState, Message};
pub use tool::ToolCallProgress;
pub use workspace::{ConfirmedFile, FileRow, TempUpload, Workspace, WorkspaceSummary};
