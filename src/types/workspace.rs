//! Shapes returned by the workspace, file and agent endpoints

use crate::types::message::ChatState;
use serde::{Deserialize, Serialize};

/// Entry of the workspace list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub name: String,
    pub uuid: String,
}

impl WorkspaceSummary {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }
}

/// Full workspace including its stored chat history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub chat_history: ChatState,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub create_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub uuid: String,
}

/// Handle of a file uploaded but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempUpload {
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedFile {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub uuid: String,
    #[serde(default)]
    pub create_date: String,
    #[serde(default)]
    pub last_modified: String,
}
