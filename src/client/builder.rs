use crate::client::core::ChatClient;
use crate::config::ClientConfig;
use crate::pipeline::FramePolicy;
use crate::transport::{HttpTransport, StreamTransport};
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable (developer-friendly).
pub struct ChatClientBuilder {
    config: ClientConfig,
    stream_transport: Option<Arc<dyn StreamTransport>>,
}

impl ChatClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            stream_transport: None,
        }
    }

    /// Timeout for plain requests and for the chat stream's response head.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Fail a chat stream that stays silent for longer than this.
    pub fn stream_idle_timeout_ms(mut self, ms: u64) -> Self {
        self.config.stream_idle_timeout_ms = Some(ms);
        self
    }

    pub fn chat_path(mut self, path: impl Into<String>) -> Self {
        self.config.chat_path = path.into();
        self
    }

    pub fn frame_policy(mut self, policy: FramePolicy) -> Self {
        self.config.frame_policy = policy;
        self
    }

    pub fn stop_on_stream_error(mut self, stop: bool) -> Self {
        self.config.stop_on_stream_error = stop;
        self
    }

    /// Replace the transport used for chat streams.
    ///
    /// Plain workspace calls keep going over HTTP to `base_url`.
    pub fn stream_transport(mut self, transport: Arc<dyn StreamTransport>) -> Self {
        self.stream_transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ChatClient> {
        let config = self.config.validate()?;
        let http = Arc::new(HttpTransport::new(&config)?);
        let stream_transport = match self.stream_transport {
            Some(t) => t,
            None => http.clone() as Arc<dyn StreamTransport>,
        };
        Ok(ChatClient {
            config,
            http,
            stream_transport,
        })
    }
}
