//! Network transport.
//!
//! [`StreamTransport`] is the seam between the stream session and the
//! network: it opens the chat request and hands back the status plus the raw
//! body stream. [`HttpTransport`] is the reqwest implementation and also
//! carries the plain JSON calls used by the workspace API.

pub mod http;

pub use http::{HttpTransport, TransportError};

use crate::{BoxStream, Result};
use bytes::Bytes;

/// Response head of a streaming request plus its body.
pub struct StreamResponse {
    pub status: u16,
    /// Raw body; `None` when the response carries no readable body
    pub body: Option<BoxStream<'static, Bytes>>,
}

impl StreamResponse {
    pub fn new(status: u16, body: BoxStream<'static, Bytes>) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn without_body(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Opens streaming chat requests.
#[async_trait::async_trait]
pub trait StreamTransport: Send + Sync {
    /// POST `body` as JSON to `path`, asking for an event stream.
    ///
    /// Returns `Err` only for failures before a response head arrives; a
    /// non-success status is a normal `Ok` response.
    async fn open_stream(&self, path: &str, body: &serde_json::Value) -> Result<StreamResponse>;
}
