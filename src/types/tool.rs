//! Tool invocation progress as reported by the backend

use serde::{Deserialize, Serialize};

/// Progress of a tool invocation in flight.
///
/// The backend reports the same `tool_call_id` repeatedly; the last report
/// carries `is_complete: true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallProgress {
    pub tool_name: String,
    pub tool_id: String,
    pub tool_call_id: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl ToolCallProgress {
    pub fn new(
        tool_name: impl Into<String>,
        tool_id: impl Into<String>,
        tool_call_id: impl Into<String>,
        is_complete: bool,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_id: tool_id.into(),
            tool_call_id: tool_call_id.into(),
            is_complete,
        }
    }

    /// Whether `other` reports on the same invocation.
    pub fn same_call(&self, other: &ToolCallProgress) -> bool {
        self.tool_call_id == other.tool_call_id
    }
}
