//! # Client Module
//!
//! [`ChatClient`] ties configuration, transport and stream sessions together
//! and exposes the workspace, file and agent endpoints of the backend.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ChatClient`] | Entry point: chat streaming and workspace calls |
//! | [`ChatClientBuilder`] | Builder for custom timeouts, frame policy and transport |

mod builder;
mod core;
mod workspace;

pub use self::builder::ChatClientBuilder;
pub use self::core::ChatClient;
