use crate::config::ClientConfig;
use crate::session::{ChatPayload, SessionSummary, StreamHandler, StreamSession};
use crate::transport::{HttpTransport, StreamTransport};
use crate::Result;
use std::sync::Arc;
use tracing::info;

use super::builder::ChatClientBuilder;

/// Client for the workspace backend: streaming chat plus workspace, file and agent calls.
pub struct ChatClient {
    pub(crate) config: ClientConfig,
    pub(crate) http: Arc<HttpTransport>,
    pub(crate) stream_transport: Arc<dyn StreamTransport>,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        ChatClientBuilder::from_config(config).build()
    }

    /// Build from `WORKSPACE_*` environment variables (see [`ClientConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn builder(base_url: impl Into<String>) -> ChatClientBuilder {
        ChatClientBuilder::new(base_url)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A fresh session for one chat request.
    ///
    /// Take its [`cancel_handle`](StreamSession::cancel_handle) before running
    /// it if the request may need aborting.
    pub fn session(&self) -> StreamSession {
        StreamSession::new(self.stream_transport.clone(), &self.config)
    }

    /// Send one prompt and stream the reply into `handler`.
    pub async fn chat_stream<H>(&self, payload: &ChatPayload, handler: &mut H) -> SessionSummary
    where
        H: StreamHandler + ?Sized,
    {
        info!(
            workspace = payload.uuid.as_deref().unwrap_or("<new>"),
            prompt_chars = payload.user_prompt.chars().count(),
            "sending chat prompt"
        );
        self.session().run(payload, handler).await
    }
}
