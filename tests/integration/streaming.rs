//! Integration tests for streaming chat responses

use crate::integration::mock_server::MockServerFixture;
use serde_json::json;
use workspace_chat::types::WorkspaceSummary;
use workspace_chat::{
    ChatClient, ChatPayload, Conversation, FramePolicy, Message, Outcome, ToolCallProgress,
};

const RECORD: &str = r#"{"type":"record","content":{"name":"Antivirals","uuid":"w-1","chat_history":{"messages":[],"queries":[]},"last_modified":"","create_date":""}}"#;
const HELLO: &str = r#"{"type":"chat","content":{"type":"ai","content":"Hel"}}"#;
const HELLO_TAIL: &str = r#"{"type":"chat","content":{"type":"ai","content":"lo"}}"#;
const QUERY: &str = r#"{"type":"query","content":[{"title":"Paper A","source":"pubmed","authors":["X"]}]}"#;

#[tokio::test]
async fn test_new_topic_streams_into_conversation() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_chat_stream(&[RECORD, HELLO, HELLO_TAIL, QUERY])
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("find antiviral papers").unwrap();
    assert!(payload.uuid.is_none());

    let summary = client.chat_stream(&payload, &mut conversation).await;

    mock.assert_async().await;
    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.events, 4);
    assert_eq!(summary.stream_errors, 0);

    assert_eq!(
        conversation.active(),
        Some(&WorkspaceSummary::new("Antivirals", "w-1"))
    );
    assert_eq!(conversation.workspaces()[0].uuid, "w-1");
    assert_eq!(
        conversation.messages(),
        &[
            Message::user("find antiviral papers"),
            Message::ai("Hello")
        ]
    );
    assert_eq!(conversation.queries().len(), 1);
    assert_eq!(conversation.queries()[0].title, "Paper A");
    assert!(!conversation.is_generating());
    assert!(conversation.notice().is_none());
}

#[tokio::test]
async fn test_followup_sends_active_workspace_uuid() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_chat_expecting(
            json!({ "user_prompt": "and more?", "uuid": "w-9" }),
            &[HELLO],
        )
        .await;

    let client = fixture.client();
    let mut conversation =
        Conversation::with_workspaces(vec![WorkspaceSummary::new("Older", "w-9")]);
    let payload = ChatPayload::new("and more?").with_uuid("w-9");

    let summary = client.chat_stream(&payload, &mut conversation).await;

    mock.assert_async().await;
    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(conversation.messages(), &[Message::ai("Hel")]);
}

#[tokio::test]
async fn test_tool_progress_updates_in_place() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat_stream(&[
            r#"{"type":"chat","content":{"type":"tool_call","tool_name":"search","tool_id":"t","tool_call_id":"c1","is_complete":false}}"#,
            r#"{"type":"chat","content":{"type":"tool_call","tool_name":"search","tool_id":"t","tool_call_id":"c1","is_complete":true}}"#,
            HELLO,
        ])
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("go").unwrap();
    client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(
        conversation.messages(),
        &[
            Message::user("go"),
            Message::ToolCall(ToolCallProgress::new("search", "t", "c1", true)),
            Message::ai("Hel"),
        ]
    );
}

#[tokio::test]
async fn test_stream_error_event_is_inline_and_stream_continues() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat_stream(&[
            HELLO,
            r#"{"type":"error","content":"model overloaded"}"#,
            HELLO_TAIL,
        ])
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    let summary = client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.stream_errors, 1);
    assert_eq!(
        conversation.messages(),
        &[
            Message::user("hi"),
            Message::ai("Hel"),
            Message::error("model overloaded"),
            Message::ai("lo"),
        ]
    );
}

#[tokio::test]
async fn test_malformed_line_is_skipped_by_default() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat_stream(&[HELLO, "{not json", r#"{"type":"mystery","content":1}"#, HELLO_TAIL])
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    let summary = client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.events, 2);
    assert_eq!(
        conversation.messages(),
        &[Message::user("hi"), Message::ai("Hello")]
    );
}

#[tokio::test]
async fn test_malformed_line_aborts_under_strict_policy() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat_stream(&[HELLO, "{not json", HELLO_TAIL])
        .await;

    let client = ChatClient::builder(fixture.base_url.clone())
        .frame_policy(FramePolicy::Abort)
        .build()
        .unwrap();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    let summary = client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(summary.outcome, Outcome::Failed { status: 0 });
    assert_eq!(summary.events, 1);
    assert!(!conversation.is_generating());
    assert_eq!(
        conversation.messages(),
        &[Message::user("hi"), Message::ai("Hel")]
    );
}

#[tokio::test]
async fn test_unterminated_last_line_is_dropped() {
    let mut fixture = MockServerFixture::new().await;
    let body = format!("{}\n{}", HELLO, HELLO_TAIL);
    let _mock = fixture
        .server
        .mock("POST", "/workspace.chat")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    let summary = client.chat_stream(&payload, &mut conversation).await;

    assert_eq!(summary.events, 1);
    assert_eq!(
        conversation.messages(),
        &[Message::user("hi"), Message::ai("Hel")]
    );
}

#[tokio::test]
async fn test_custom_chat_path() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/workspace.chat")
        .with_status(200)
        .with_body(format!("{}\n", HELLO))
        .create_async()
        .await;

    let client = ChatClient::builder(format!("{}/api/", fixture.base_url))
        .build()
        .unwrap();
    let mut conversation = Conversation::new();
    let payload = conversation.begin_send("hi").unwrap();
    let summary = client.chat_stream(&payload, &mut conversation).await;

    mock.assert_async().await;
    assert_eq!(summary.outcome, Outcome::Completed);
}
