//! # Stream Session
//!
//! Opens the streaming chat request, runs the body through the
//! [`Pipeline`](crate::pipeline::Pipeline) and dispatches each event to a
//! [`StreamHandler`].
//!
//! ```text
//! Idle → Requesting ─┬─> FailedTransport ──────────────┐
//!                    └─> Streaming ⟲ (one event each) ─┴─> Ended (on_end)
//! ```
//!
//! The session never touches conversation state itself; it only calls the
//! handler. Nothing here prevents two sessions from feeding the same state
//! concurrently, so callers serialize sends (see
//! [`Conversation::begin_send`](crate::conversation::Conversation::begin_send)).

pub mod controller;
pub mod handler;

pub use controller::{
    CancelHandle, ChatPayload, Outcome, SessionState, SessionSummary, StreamSession,
};
pub use handler::StreamHandler;
