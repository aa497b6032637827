//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use workspace_chat::{ChatClient, ClientConfig};

/// Test fixture that manages a mock backend
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone()).with_timeout_ms(5_000)
    }

    pub fn client(&self) -> ChatClient {
        ChatClient::new(self.config()).expect("client builds against mock url")
    }

    /// Mock the chat endpoint answering with one NDJSON line per event.
    pub async fn mock_chat_stream(&mut self, lines: &[&str]) -> Mock {
        let body: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        self.server
            .mock("POST", "/workspace.chat")
            .match_header("content-type", "application/json")
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock the chat endpoint expecting an exact JSON request body.
    pub async fn mock_chat_expecting(&mut self, request: serde_json::Value, lines: &[&str]) -> Mock {
        let body: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        self.server
            .mock("POST", "/workspace.chat")
            .match_body(Matcher::Json(request))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error_response(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        error_body: &str,
    ) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create_async()
            .await
    }

    /// Create a mock for a successful JSON response
    pub async fn mock_json_response(&mut self, method: &str, path: &str, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
