//! # workspace-chat
//!
//! Client for a research-workspace chat backend: streams model replies as
//! newline-delimited JSON events and folds them into conversation state.
//!
//! ## Overview
//!
//! A chat request is a single long-lived HTTP response. Each line of its body
//! is one event:
//!
//! | Event | Meaning |
//! |-------|---------|
//! | `chat` | Model response fragment: an `ai` text delta or `tool_call` progress |
//! | `record` | The backend created a workspace; it becomes the active one |
//! | `query` | Full replacement of the publication/result list |
//! | `error` | Application-level error reported mid-stream |
//!
//! Lines arrive split across network chunks at arbitrary points. The
//! [`pipeline`] reassembles them, [`session`] dispatches the decoded events to
//! a [`StreamHandler`], and [`Conversation`] is the reference handler that
//! keeps the message list, query list and workspace list up to date.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use workspace_chat::{ChatClient, ClientConfig, Conversation};
//!
//! #[tokio::main]
//! async fn main() -> workspace_chat::Result<()> {
//!     let client = ChatClient::new(ClientConfig::new("http://localhost:8000"))?;
//!     let mut conversation = Conversation::new();
//!
//!     if let Some(payload) = conversation.begin_send("Summarise recent antiviral papers") {
//!         client.chat_stream(&payload, &mut conversation).await;
//!     }
//!     println!("{:?}", conversation.messages());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Wire types: events, messages, workspaces |
//! | [`pipeline`] | Byte stream → frames → typed events |
//! | [`transport`] | HTTP transport and the streaming seam |
//! | [`session`] | Stream session controller and handler trait |
//! | [`client`] | Client entry point and workspace endpoints |
//! | [`conversation`] | Caller-side folding of session callbacks |
//! | [`notice`] | Status-coded user notices |
//! | [`config`] | Explicit client configuration |

pub mod client;
pub mod config;
pub mod conversation;
pub mod notice;
pub mod pipeline;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{ChatClient, ChatClientBuilder};
pub use config::ClientConfig;
pub use conversation::Conversation;
pub use notice::{Notice, NoticeAction, NoticeKind};
pub use pipeline::FramePolicy;
pub use session::{
    CancelHandle, ChatPayload, Outcome, SessionState, SessionSummary, StreamHandler,
    StreamSession,
};
pub use types::{ChatEvent, Message, ModelResponse, Publication, ToolCallProgress};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A specialized Result for pipeline operations
pub type PipeResult<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `PipeResult<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = PipeResult<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
