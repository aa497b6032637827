use crate::config::ClientConfig;
use crate::transport::{StreamResponse, StreamTransport};
use crate::{Error, Result};
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // No client-wide timeout: it would also cap how long a chat stream may run.
        // Plain requests get `config.timeout` per request instead.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.client.get(self.url(path));
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.post(self.url(path)).json(body);
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let req = self.client.post(self.url(path)).json(body);
        self.send(req).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let req = self.client.delete(self.url(path));
        self.send(req).await.map(|_| ())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let req = self.client.post(self.url(path)).multipart(form);
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    /// Send with the per-request timeout; non-2xx statuses become `Error::Remote`.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(http_status = status.as_u16(), "request failed");
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl StreamTransport for HttpTransport {
    async fn open_stream(&self, path: &str, body: &serde_json::Value) -> Result<StreamResponse> {
        let request_id = Uuid::new_v4().to_string();
        debug!(path, request_id = %request_id, "opening chat stream");

        let send = self
            .client
            .post(self.url(path))
            .header("accept", "text/event-stream")
            .header("x-request-id", &request_id)
            .json(body)
            .send();

        // Bounds the wait for the response head only; the body may stream for as long as it likes.
        let resp = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| Error::Transport(TransportError::Timeout))?
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status().as_u16();
        let byte_stream = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(StreamResponse::new(status, Box::pin(byte_stream)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timed out waiting for the server")]
    Timeout,

    #[error("Transport error: {0}")]
    Other(String),
}
