//! # Stream Pipeline
//!
//! Turns the raw response body of the chat endpoint into typed [`ChatEvent`]s.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Raw Bytes → UTF-8 text → Frame Decoder → Event Mapper → ChatEvent
//!     │            │              │               │
//!   HTTP      incremental     newline split,   tagged decode,
//!   body      char decode     carry buffer     type validation
//! ```
//!
//! Every stage is lazy: a new body chunk is pulled only after all frames of
//! the previous chunk have been consumed downstream, so events reach the
//! handler in exactly the order their lines terminate in the byte stream.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Decoder + mapper composition |
//! | [`Decoder`] | Trait for byte stream → frame stream |
//! | [`Mapper`] | Trait for frame stream → event stream |
//! | [`decode::FrameDecoder`] | Newline framing with carry-over |
//! | [`event_map::EventMapper`] | Frame parsing under a [`FramePolicy`] |

pub mod decode;
pub mod event_map;

pub use decode::{split_frames, FrameDecoder, NdjsonFrameDecoder, Utf8Decoder};
pub use event_map::{parse_frame, EventMapper, FramePolicy};

use crate::types::events::ChatEvent;
use crate::{BoxStream, PipeResult};

/// Decoder trait for stream framing
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    /// Decode a byte stream into complete, non-empty text frames
    async fn decode_stream(
        &self,
        input: BoxStream<'static, bytes::Bytes>,
    ) -> PipeResult<BoxStream<'static, String>>;
}

/// Specialized mapper for the final stage of the pipeline
#[async_trait::async_trait]
pub trait Mapper: Send + Sync {
    /// A mapper takes a stream of frames and returns a stream of typed events
    async fn map(
        &self,
        input: BoxStream<'static, String>,
    ) -> PipeResult<BoxStream<'static, ChatEvent>>;
}

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed frame: {reason} (frame: {frame})")]
    MalformedFrame { reason: String, frame: String },

    #[error("Unknown event type: {event_type}")]
    UnknownEventType { event_type: String },
}

/// Pipeline that processes a streaming chat response
pub struct Pipeline {
    decoder: Box<dyn Decoder>,
    mapper: Box<dyn Mapper>,
}

impl Pipeline {
    /// NDJSON framing followed by event mapping under `policy`
    pub fn new(policy: FramePolicy) -> Self {
        Self::with_stages(Box::new(NdjsonFrameDecoder), Box::new(EventMapper::new(policy)))
    }

    pub fn with_stages(decoder: Box<dyn Decoder>, mapper: Box<dyn Mapper>) -> Self {
        Self { decoder, mapper }
    }

    /// Process a byte stream through the pipeline
    pub async fn process_stream(
        &self,
        input: BoxStream<'static, bytes::Bytes>,
    ) -> PipeResult<BoxStream<'static, ChatEvent>> {
        // 1. Bytes -> frames
        let frames = self.decoder.decode_stream(input).await?;

        // 2. Frames -> events
        self.mapper.map(frames).await
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FramePolicy::default())
    }
}
