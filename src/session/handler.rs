use crate::types::events::{ModelResponse, Publication};
use crate::Error;

/// Receiver of a stream session's callbacks.
///
/// `on_chat`, `on_record` and `on_query` must be implemented; the remaining
/// callbacks are advisory and default to doing nothing. For one session the
/// callbacks run strictly one after another, in stream order, and `on_end`
/// is always the last call, made exactly once.
pub trait StreamHandler {
    /// A model response fragment (`ai` delta or `tool_call` progress).
    fn on_chat(&mut self, fragment: ModelResponse);

    /// The backend created a workspace during this exchange.
    fn on_record(&mut self, name: String, uuid: String);

    /// Replacement for the whole query result list.
    fn on_query(&mut self, publications: Vec<Publication>);

    /// Application-level `error` event received mid-stream.
    fn on_stream_error(&mut self, _message: String) {}

    /// Transport or network failure. `status` is the HTTP status when known, else `0`.
    fn on_error(&mut self, _status: u16, _error: &Error) {}

    /// The session is over; safe to accept input again.
    fn on_end(&mut self) {}
}
