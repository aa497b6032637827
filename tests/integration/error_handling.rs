//! Integration tests for error handling

use crate::integration::mock_server::MockServerFixture;
use workspace_chat::types::{ModelResponse, Publication, WorkspaceSummary};
use workspace_chat::{
    ChatClient, ChatPayload, Conversation, Error, Message, NoticeAction, NoticeKind, Outcome,
    StreamHandler,
};

/// Records the order of terminal callbacks.
#[derive(Default)]
struct Trace {
    calls: Vec<String>,
    remote_body: Option<String>,
}

impl StreamHandler for Trace {
    fn on_chat(&mut self, _fragment: ModelResponse) {
        self.calls.push("chat".into());
    }
    fn on_record(&mut self, _name: String, _uuid: String) {
        self.calls.push("record".into());
    }
    fn on_query(&mut self, _publications: Vec<Publication>) {
        self.calls.push("query".into());
    }
    fn on_error(&mut self, status: u16, error: &Error) {
        if let Error::Remote { body, .. } = error {
            self.remote_body = Some(body.clone());
        }
        self.calls.push(format!("error:{}", status));
    }
    fn on_end(&mut self) {
        self.calls.push("end".into());
    }
}

#[tokio::test]
async fn test_server_error_short_circuits_before_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response(
            "POST",
            "/workspace.chat",
            500,
            r#"{"type":"chat","content":{"type":"ai","content":"never"}}"#,
        )
        .await;

    let client = fixture.client();
    let mut trace = Trace::default();
    let summary = client
        .chat_stream(&ChatPayload::new("hi"), &mut trace)
        .await;

    mock.assert_async().await;
    assert_eq!(summary.outcome, Outcome::Failed { status: 500 });
    assert_eq!(summary.events, 0);
    assert_eq!(trace.calls, vec!["error:500", "end"]);
    assert_eq!(
        trace.remote_body.as_deref(),
        Some(r#"{"type":"chat","content":{"type":"ai","content":"never"}}"#)
    );
}

#[tokio::test]
async fn test_server_error_raises_notice() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("POST", "/workspace.chat", 500, r#"{"detail":"boom"}"#)
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    client.chat_stream(&payload, &mut conversation).await;

    assert!(!conversation.is_generating());
    assert_eq!(conversation.messages(), &[Message::user("hi")]);
    let notice = conversation.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::ServerError);
    assert_eq!(conversation.resolve_notice(), Some(NoticeAction::Dismiss));
    assert!(conversation.notice().is_none());
}

#[tokio::test]
async fn test_missing_workspace_starts_new_topic() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("POST", "/workspace.chat", 404, r#"{"detail":"not found"}"#)
        .await;

    let client = fixture.client();
    let mut conversation =
        Conversation::with_workspaces(vec![WorkspaceSummary::new("Gone", "w-gone")]);
    conversation.load_workspace(workspace_chat::types::Workspace {
        name: "Gone".into(),
        uuid: "w-gone".into(),
        chat_history: Default::default(),
        last_modified: String::new(),
        create_date: String::new(),
    });
    let payload = conversation.begin_send("still there?").unwrap();
    assert_eq!(payload.uuid.as_deref(), Some("w-gone"));

    client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(conversation.notice().unwrap().kind, NoticeKind::Missing);
    assert_eq!(
        conversation.resolve_notice(),
        Some(NoticeAction::StartNewTopic)
    );
    assert!(conversation.active().is_none());
    assert!(conversation.messages().is_empty());
}

#[tokio::test]
async fn test_precondition_failed_points_at_config() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("POST", "/workspace.chat", 412, "{}")
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(conversation.notice().unwrap().kind, NoticeKind::ConfigError);
    assert_eq!(conversation.resolve_notice(), Some(NoticeAction::OpenConfig));
}

#[tokio::test]
async fn test_unmapped_status_has_no_notice() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("POST", "/workspace.chat", 418, "{}")
        .await;

    let client = fixture.client();
    let mut trace = Trace::default();
    let summary = client
        .chat_stream(&ChatPayload::new("hi"), &mut trace)
        .await;

    assert_eq!(summary.outcome, Outcome::Failed { status: 418 });
    assert_eq!(trace.calls, vec!["error:418", "end"]);
}

#[tokio::test]
async fn test_connection_refused_reports_status_zero() {
    let client = ChatClient::builder("http://127.0.0.1:1")
        .timeout_ms(2_000)
        .build()
        .unwrap();
    let mut trace = Trace::default();
    let summary = client
        .chat_stream(&ChatPayload::new("hi"), &mut trace)
        .await;

    assert_eq!(summary.outcome, Outcome::Failed { status: 0 });
    assert_eq!(trace.calls, vec!["error:0", "end"]);
}
