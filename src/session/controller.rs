//! Stream session controller: one instance per outgoing chat request.

use crate::config::ClientConfig;
use crate::pipeline::{Pipeline, Utf8Decoder};
use crate::session::handler::StreamHandler;
use crate::transport::{StreamTransport, TransportError};
use crate::types::events::ChatEvent;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Error bodies read after a failed status are cut to at most this many bytes.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Body of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub user_prompt: String,
    /// Target workspace; omitted to let the backend create one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl ChatPayload {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            uuid: None,
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}

/// Lifecycle of a session.
///
/// `Idle → Requesting → (FailedTransport | Streaming) → Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requesting,
    FailedTransport,
    Streaming,
    Ended,
}

/// How a session finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend closed the stream (or an `error` event stopped it under `stop_on_stream_error`).
    Completed,
    /// Transport or network failure; `status` is `0` when no HTTP status was available.
    Failed { status: u16 },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub outcome: Outcome,
    /// Events dispatched to the handler
    pub events: usize,
    /// `error` events among them
    pub stream_errors: usize,
}

/// Aborts a running session from another task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Stop the session at its next suspend point. Only `on_end` fires afterwards.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Drives one streaming chat request from request to `on_end`.
pub struct StreamSession {
    transport: Arc<dyn StreamTransport>,
    pipeline: Pipeline,
    chat_path: String,
    idle_timeout: Option<Duration>,
    stop_on_stream_error: bool,
    cancel: CancellationToken,
    state: SessionState,
}

impl StreamSession {
    pub fn new(transport: Arc<dyn StreamTransport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            pipeline: Pipeline::new(config.frame_policy),
            chat_path: config.chat_path.clone(),
            idle_timeout: config.stream_idle_timeout(),
            stop_on_stream_error: config.stop_on_stream_error,
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            token: self.cancel.clone(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the request to completion.
    ///
    /// Every path ends with exactly one `on_end` call. Transport and network
    /// failures are reported once through `on_error` before it; cancellation
    /// reports nothing but `on_end`.
    pub async fn run<H>(mut self, payload: &ChatPayload, handler: &mut H) -> SessionSummary
    where
        H: StreamHandler + ?Sized,
    {
        let mut summary = SessionSummary {
            outcome: Outcome::Completed,
            events: 0,
            stream_errors: 0,
        };

        let outcome = match self.drive(payload, handler, &mut summary).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let status = err.status();
                warn!(status, error = %err, "chat stream failed");
                handler.on_error(status, &err);
                Outcome::Failed { status }
            }
        };
        summary.outcome = outcome;

        self.transition(SessionState::Ended);
        info!(
            outcome = ?summary.outcome,
            events = summary.events,
            stream_errors = summary.stream_errors,
            "chat stream ended"
        );
        handler.on_end();
        summary
    }

    async fn drive<H>(
        &mut self,
        payload: &ChatPayload,
        handler: &mut H,
        summary: &mut SessionSummary,
    ) -> Result<Outcome>
    where
        H: StreamHandler + ?Sized,
    {
        self.transition(SessionState::Requesting);
        let body = serde_json::to_value(payload)?;

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Ok(Outcome::Cancelled),
            resp = self.transport.open_stream(&self.chat_path, &body) => resp?,
        };

        let status = response.status;
        let success = response.is_success();
        let body = match response.body {
            Some(body) if success => body,
            body => {
                self.transition(SessionState::FailedTransport);
                let text = match body {
                    Some(body) => match self.read_error_body(body).await {
                        Some(text) => text,
                        None => {
                            debug!("chat request cancelled while reading error body");
                            return Ok(Outcome::Cancelled);
                        }
                    },
                    None => String::new(),
                };
                return Err(Error::Remote { status, body: text });
            }
        };

        self.transition(SessionState::Streaming);
        let mut events = self.pipeline.process_stream(body).await?;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("chat stream cancelled");
                    return Ok(Outcome::Cancelled);
                }
                next = next_within(&mut events, self.idle_timeout) => next?,
            };

            let Some(event) = next else {
                break;
            };

            summary.events += 1;
            if self.dispatch(event, handler, summary).is_break() {
                debug!("stopping after stream error event");
                break;
            }
        }

        Ok(Outcome::Completed)
    }

    fn dispatch<H>(
        &self,
        event: ChatEvent,
        handler: &mut H,
        summary: &mut SessionSummary,
    ) -> ControlFlow<()>
    where
        H: StreamHandler + ?Sized,
    {
        debug!(kind = event.kind(), "dispatching stream event");
        match event {
            ChatEvent::Chat(fragment) => handler.on_chat(fragment),
            ChatEvent::Record(record) => {
                info!(uuid = %record.uuid, name = %record.name, "workspace created by backend");
                handler.on_record(record.name, record.uuid);
            }
            ChatEvent::Query(publications) => {
                debug!(count = publications.len(), "query results replaced");
                handler.on_query(publications);
            }
            ChatEvent::Error(message) => {
                summary.stream_errors += 1;
                warn!(message = %message, "stream error event");
                handler.on_stream_error(message);
                if self.stop_on_stream_error {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn transition(&mut self, to: SessionState) {
        debug!(from = ?self.state, to = ?to, "session state");
        self.state = to;
    }
}

/// Next stream item, failing with a transport timeout after `idle_timeout` of silence.
async fn next_within<T>(
    stream: &mut BoxStream<'static, T>,
    idle_timeout: Option<Duration>,
) -> Result<Option<T>> {
    let next = match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, stream.next())
            .await
            .map_err(|_| Error::Transport(TransportError::Timeout))?,
        None => stream.next().await,
    };
    next.transpose()
}

/// Cut `text` to at most `max` bytes without splitting a character.
fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

impl StreamSession {
    /// Best-effort read of an error response body.
    ///
    /// Read failures and idle timeouts yield an empty string. Returns `None`
    /// when the session is cancelled mid-read.
    async fn read_error_body(&self, mut body: BoxStream<'static, Bytes>) -> Option<String> {
        let mut text = Utf8Decoder::new();
        let mut out = String::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return None,
                next = next_within(&mut body, self.idle_timeout) => next,
            };
            match next {
                Ok(Some(bytes)) => {
                    out.push_str(&text.decode(&bytes));
                    if out.len() >= MAX_ERROR_BODY_BYTES {
                        truncate_at_char_boundary(&mut out, MAX_ERROR_BODY_BYTES);
                        return Some(out);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(error = %e, "failed to read error body");
                    return Some(String::new());
                }
            }
        }
        out.push_str(&text.finish());
        truncate_at_char_boundary(&mut out, MAX_ERROR_BODY_BYTES);
        Some(out)
    }
}
