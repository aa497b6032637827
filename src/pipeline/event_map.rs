//! Event mapping (text frame -> ChatEvent)

use crate::pipeline::{Mapper, PipelineError};
use crate::types::events::ChatEvent;
use crate::{BoxStream, Error, PipeResult};
use futures::StreamExt;
use serde_json::Value;
use tracing::warn;

const KNOWN_EVENT_TYPES: &[&str] = &["chat", "record", "query", "error"];
const FRAME_PREVIEW_CHARS: usize = 120;

/// What to do with a frame that is not a valid event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// Log and continue with the next frame.
    #[default]
    Skip,
    /// Fail the stream; the session reports it through `on_error`.
    Abort,
}

/// Parse one frame into a typed event, validating the discriminant first so
/// unknown event types are told apart from broken payloads.
pub fn parse_frame(frame: &str) -> Result<ChatEvent, PipelineError> {
    let value: Value = serde_json::from_str(frame).map_err(|e| PipelineError::MalformedFrame {
        reason: format!("invalid JSON: {}", e),
        frame: preview(frame),
    })?;

    let event_type = match value.get("type").and_then(Value::as_str) {
        Some(t) => t,
        None => {
            return Err(PipelineError::MalformedFrame {
                reason: "missing string field `type`".to_string(),
                frame: preview(frame),
            })
        }
    };

    if !KNOWN_EVENT_TYPES.contains(&event_type) {
        return Err(PipelineError::UnknownEventType {
            event_type: event_type.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| PipelineError::MalformedFrame {
        reason: e.to_string(),
        frame: preview(frame),
    })
}

fn preview(frame: &str) -> String {
    let mut chars = frame.chars();
    let head: String = chars.by_ref().take(FRAME_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Maps frames to events under a [`FramePolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventMapper {
    policy: FramePolicy,
}

impl EventMapper {
    pub fn new(policy: FramePolicy) -> Self {
        Self { policy }
    }
}

#[async_trait::async_trait]
impl Mapper for EventMapper {
    async fn map(
        &self,
        input: BoxStream<'static, String>,
    ) -> PipeResult<BoxStream<'static, ChatEvent>> {
        let policy = self.policy;
        let stream = input.filter_map(move |item| async move {
            let frame = match item {
                Ok(frame) => frame,
                Err(e) => return Some(Err(e)),
            };
            match parse_frame(&frame) {
                Ok(event) => Some(Ok(event)),
                Err(err) => match policy {
                    FramePolicy::Skip => {
                        warn!(error = %err, "skipping undecodable stream frame");
                        None
                    }
                    FramePolicy::Abort => Some(Err(Error::Pipeline(err))),
                },
            }
        });

        Ok(Box::pin(stream))
    }
}
