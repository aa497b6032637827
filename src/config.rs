//! Client configuration.
//!
//! Everything the client needs is carried by [`ClientConfig`] and handed to
//! constructors explicitly. [`ClientConfig::from_env`] is a convenience for
//! binaries; the library never reads the environment on its own.

use crate::pipeline::FramePolicy;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CHAT_PATH: &str = "/workspace.chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without trailing slash (e.g. `http://localhost:8000/api`)
    pub base_url: String,
    /// Bound on plain JSON requests, and on the wait for the chat stream's response headers
    pub timeout_ms: u64,
    /// Maximum silence between two body chunks of a chat stream; `None` waits forever
    pub stream_idle_timeout_ms: Option<u64>,
    /// Path of the streaming chat endpoint, relative to `base_url`
    pub chat_path: String,
    pub frame_policy: FramePolicy,
    /// End the session after dispatching an `error` event instead of reading on
    pub stop_on_stream_error: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            stream_idle_timeout_ms: None,
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            frame_policy: FramePolicy::default(),
            stop_on_stream_error: false,
        }
    }

    /// Build from the environment:
    /// - `WORKSPACE_API_BASE_URL` (required)
    /// - `WORKSPACE_HTTP_TIMEOUT_MS` (default 10000)
    /// - `WORKSPACE_STREAM_IDLE_TIMEOUT_MS` (unset: no idle timeout)
    /// - `WORKSPACE_STRICT_FRAMES=1` (abort on undecodable frames)
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("WORKSPACE_API_BASE_URL").map_err(|_| {
            Error::configuration_with_context(
                "WORKSPACE_API_BASE_URL is not set",
                ErrorContext::new()
                    .with_field_path("WORKSPACE_API_BASE_URL")
                    .with_source("client_config"),
            )
        })?;

        let mut config = Self::new(base_url);
        if let Some(ms) = parse_env_u64("WORKSPACE_HTTP_TIMEOUT_MS")? {
            config.timeout_ms = ms;
        }
        config.stream_idle_timeout_ms = parse_env_u64("WORKSPACE_STREAM_IDLE_TIMEOUT_MS")?;
        if env::var("WORKSPACE_STRICT_FRAMES").ok().as_deref() == Some("1") {
            config.frame_policy = FramePolicy::Abort;
        }

        config.validate()
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    pub fn with_stream_idle_timeout_ms(mut self, ms: u64) -> Self {
        self.stream_idle_timeout_ms = Some(ms);
        self
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    pub fn with_frame_policy(mut self, policy: FramePolicy) -> Self {
        self.frame_policy = policy;
        self
    }

    pub fn stop_on_stream_error(mut self, stop: bool) -> Self {
        self.stop_on_stream_error = stop;
        self
    }

    /// Check the base URL and normalize it (trailing slashes removed).
    pub fn validate(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(self.base_url.clone())
                    .with_source("client_config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported URL scheme: {}", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_source("client_config"),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("config.timeout_ms")
                    .with_source("client_config"),
            ));
        }

        let trimmed = self.base_url.trim_end_matches('/').len();
        self.base_url.truncate(trimmed);
        if !self.chat_path.starts_with('/') {
            self.chat_path.insert(0, '/');
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn stream_idle_timeout(&self) -> Option<Duration> {
        self.stream_idle_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("{} must be an integer number of milliseconds", key),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(raw)
                    .with_source("client_config"),
            )
        }),
        Err(_) => Ok(None),
    }
}
