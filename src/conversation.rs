//! Caller-side conversation state.
//!
//! [`Conversation`] owns what a chat view renders: the workspace list, the
//! active workspace, its messages and query results, and whether a reply is
//! being generated. It folds session callbacks into that state:
//!
//! - consecutive `ai` fragments concatenate into one trailing `ai` entry
//! - a `tool_call` fragment updates the trailing `tool_call` entry in place
//!   when the `tool_call_id` matches, otherwise it is appended
//! - everything else is appended

use crate::notice::{Notice, NoticeAction};
use crate::session::{ChatPayload, StreamHandler};
use crate::types::events::{ModelResponse, Publication};
use crate::types::message::Message;
use crate::types::workspace::{Workspace, WorkspaceSummary};
use crate::Error;
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct Conversation {
    workspaces: Vec<WorkspaceSummary>,
    active: Option<WorkspaceSummary>,
    messages: Vec<Message>,
    queries: Vec<Publication>,
    generating: bool,
    notice: Option<Notice>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspaces(workspaces: Vec<WorkspaceSummary>) -> Self {
        Self {
            workspaces,
            ..Self::default()
        }
    }

    pub fn workspaces(&self) -> &[WorkspaceSummary] {
        &self.workspaces
    }

    pub fn active(&self) -> Option<&WorkspaceSummary> {
        self.active.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn queries(&self) -> &[Publication] {
        &self.queries
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Record the user's prompt and build the request payload.
    ///
    /// Returns `None` while a reply is still being generated or when the
    /// prompt is blank. A trailing user entry that never got an answer is
    /// replaced rather than stacked.
    pub fn begin_send(&mut self, prompt: impl Into<String>) -> Option<ChatPayload> {
        let prompt = prompt.into();
        if self.generating {
            debug!("send refused: reply still in flight");
            return None;
        }
        if prompt.trim().is_empty() {
            return None;
        }

        if self.messages.last().map_or(false, Message::is_user) {
            self.messages.pop();
        }
        self.messages.push(Message::user(prompt.clone()));
        self.generating = true;

        let payload = ChatPayload::new(prompt);
        Some(match &self.active {
            Some(ws) => payload.with_uuid(ws.uuid.clone()),
            None => payload,
        })
    }

    /// Fold one model response fragment into the message list.
    pub fn apply_chat(&mut self, fragment: ModelResponse) {
        match fragment {
            ModelResponse::Ai { content: delta } => {
                if let Some(Message::Ai { content }) = self.messages.last_mut() {
                    content.push_str(&delta);
                    return;
                }
                self.messages.push(Message::Ai { content: delta });
            }
            ModelResponse::ToolCall(update) => {
                if let Some(Message::ToolCall(last)) = self.messages.last_mut() {
                    if last.same_call(&update) {
                        last.is_complete = update.is_complete;
                        return;
                    }
                }
                self.messages.push(Message::ToolCall(update));
            }
        }
    }

    /// Show a stored workspace.
    pub fn load_workspace(&mut self, workspace: Workspace) {
        self.active = Some(WorkspaceSummary::new(workspace.name, workspace.uuid));
        self.messages = workspace.chat_history.messages;
        self.queries = workspace.chat_history.queries;
        self.notice = None;
    }

    /// Leave the active workspace; the next send starts a new topic.
    pub fn clear_active(&mut self) {
        self.active = None;
        self.messages.clear();
        self.queries.clear();
    }

    /// Apply a successful rename to the local list (and the active workspace).
    pub fn rename_local(&mut self, uuid: &str, name: &str) {
        let name = name.trim();
        for ws in self.workspaces.iter_mut().filter(|ws| ws.uuid == uuid) {
            ws.name = name.to_string();
        }
        if let Some(active) = self.active.as_mut().filter(|ws| ws.uuid == uuid) {
            active.name = name.to_string();
        }
    }

    /// Apply a successful delete to the local list.
    pub fn remove_local(&mut self, uuid: &str) {
        self.workspaces.retain(|ws| ws.uuid != uuid);
        if self.active.as_ref().map_or(false, |ws| ws.uuid == uuid) {
            self.clear_active();
        }
    }

    /// Close the current notice and run its follow-up, returning what was done.
    pub fn resolve_notice(&mut self) -> Option<NoticeAction> {
        let notice = self.notice.take()?;
        let action = notice.kind.follow_up();
        if action == NoticeAction::StartNewTopic {
            self.clear_active();
        }
        Some(action)
    }
}

impl StreamHandler for Conversation {
    fn on_chat(&mut self, fragment: ModelResponse) {
        self.apply_chat(fragment);
    }

    fn on_record(&mut self, name: String, uuid: String) {
        let summary = WorkspaceSummary::new(name, uuid);
        self.workspaces.insert(0, summary.clone());
        self.active = Some(summary);
    }

    fn on_query(&mut self, publications: Vec<Publication>) {
        self.queries = publications;
    }

    fn on_stream_error(&mut self, message: String) {
        self.messages.push(Message::error(message));
    }

    fn on_error(&mut self, status: u16, _error: &Error) {
        self.notice = Notice::from_status(status);
    }

    fn on_end(&mut self) {
        self.generating = false;
    }
}
