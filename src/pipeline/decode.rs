//! Streaming decoders (Bytes -> text frames)
//!
//! The chat endpoint speaks newline-delimited JSON. Network chunks carry no
//! framing guarantees: a chunk may end in the middle of a line or even in the
//! middle of a multi-byte character, so both text decoding and line framing
//! keep state across chunks.

use crate::pipeline::Decoder;
use crate::{BoxStream, PipeResult};
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::collections::VecDeque;
use tracing::debug;

/// Newline framing with a carry buffer for the unterminated tail.
#[derive(Debug, Default, Clone)]
pub struct FrameDecoder {
    carry: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` to the carry and return every frame it completes.
    ///
    /// Frames are returned in stream order and may be empty strings (a bare
    /// `"\n"` yields one empty frame). Text after the last line-feed stays in
    /// the carry. An empty chunk is valid input.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        // The carry never holds a line-feed, so only the new text is searched.
        let start = self.carry.len();
        self.carry.push_str(chunk);

        let Some(offset) = self.carry[start..].rfind('\n') else {
            return Vec::new();
        };
        let last_newline = start + offset;

        let rest = self.carry.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.carry, rest);
        complete[..last_newline]
            .split('\n')
            .map(str::to_owned)
            .collect()
    }

    /// Text received but not yet terminated by a line-feed.
    pub fn carry(&self) -> &str {
        &self.carry
    }

    /// Consume the decoder, returning the unterminated tail if there is one.
    pub fn finish(self) -> Option<String> {
        if self.carry.is_empty() {
            None
        } else {
            Some(self.carry)
        }
    }
}

/// Split `carry + chunk` into complete frames and the new carry.
pub fn split_frames(carry: &str, chunk: &str) -> (Vec<String>, String) {
    let mut decoder = FrameDecoder::new();
    let mut frames = decoder.feed(carry);
    frames.extend(decoder.feed(chunk));
    (frames, decoder.carry)
}

/// Incremental UTF-8 decoder.
///
/// A character split across chunks is held back until its remaining bytes
/// arrive; invalid sequences decode to U+FFFD.
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    // Safe: `valid_up_to` marks a verified UTF-8 prefix.
                    out.push_str(
                        std::str::from_utf8(&self.pending[start..valid_end]).unwrap_or_default(),
                    );
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes.
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        out
    }

    /// Flush held-back bytes of an incomplete trailing character.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}

/// NDJSON framing decoder (one JSON document per line).
///
/// Emits only frames with visible content. An unterminated tail at end of
/// stream is dropped.
pub struct NdjsonFrameDecoder;

#[async_trait::async_trait]
impl Decoder for NdjsonFrameDecoder {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> PipeResult<BoxStream<'static, String>> {
        let state = (
            input,
            Utf8Decoder::new(),
            FrameDecoder::new(),
            VecDeque::<String>::new(),
        );

        let stream = stream::unfold(state, |(mut input, mut text, mut frames, mut ready)| async move {
            loop {
                if let Some(frame) = ready.pop_front() {
                    return Some((Ok(frame), (input, text, frames, ready)));
                }

                match input.next().await {
                    Some(Ok(bytes)) => {
                        let chunk = text.decode(&bytes);
                        ready.extend(
                            frames
                                .feed(&chunk)
                                .into_iter()
                                .filter(|f| !f.trim().is_empty()),
                        );
                    }
                    Some(Err(e)) => return Some((Err(e), (input, text, frames, ready))),
                    None => {
                        let tail = text.finish();
                        frames.feed(&tail);
                        if let Some(rest) = frames.finish() {
                            debug!(bytes = rest.len(), "discarding unterminated frame at end of stream");
                        }
                        return None;
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
