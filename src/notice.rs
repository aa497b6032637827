//! Status-coded user notices for transport failures.

use std::time::Duration;
use tracing::info;

/// How long a notice stays up before its follow-up action runs.
pub const NOTICE_COUNTDOWN: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The workspace does not exist (404 / 410)
    Missing,
    /// API key or API URL of the model server is wrong (412)
    ConfigError,
    /// Backend failure (500)
    ServerError,
}

/// What the UI does once the countdown of a notice runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    /// Leave the missing workspace and start a new topic
    StartNewTopic,
    /// Close the notice and open the model server configuration
    OpenConfig,
    Dismiss,
}

impl NoticeKind {
    pub fn follow_up(self) -> NoticeAction {
        match self {
            NoticeKind::Missing => NoticeAction::StartNewTopic,
            NoticeKind::ConfigError => NoticeAction::OpenConfig,
            NoticeKind::ServerError => NoticeAction::Dismiss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    /// Map an HTTP status to a notice. Statuses without one are only logged.
    pub fn from_status(status: u16) -> Option<Self> {
        let (kind, message) = match status {
            404 | 410 => (NoticeKind::Missing, "The topic does not exist."),
            412 => (
                NoticeKind::ConfigError,
                "The API key or API URL is not valid.",
            ),
            500 => (NoticeKind::ServerError, "The server ran into an error."),
            other => {
                info!(status = other, "no notice for status");
                return None;
            }
        };
        Some(Self { kind, message })
    }
}
