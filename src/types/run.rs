//! Runs: an assistant executing against a thread.
//!
//! Status transitions are driven by the upstream; the provider only observes
//! them by polling (see [`crate::polling`]).

use super::tool::AssistantTool;
use super::Metadata;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Run lifecycle status.
///
/// Values the provider does not know are kept verbatim in [`RunStatus::Unknown`]
/// so that the poller can report them instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Incomplete,
    Unknown(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Unknown(s) => s.as_str(),
        }
    }

    /// No further transition happens without creating a new run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete
        )
    }

    /// Still being worked on by the upstream; polling continues.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "cancelled" => RunStatus::Cancelled,
            "expired" => RunStatus::Expired,
            "incomplete" => RunStatus::Incomplete,
            other => RunStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(RunStatus::from(s.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub cancelled_at: Option<i64>,
    #[serde(default)]
    pub failed_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub last_error: Option<RunError>,
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    pub required_action: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub max_prompt_tokens: Option<u32>,
    #[serde(default)]
    pub max_completion_tokens: Option<u32>,
}

impl Run {
    /// Human-readable reason for a non-successful terminal state.
    pub fn failure_reason(&self) -> String {
        if let Some(err) = &self.last_error {
            return format!("{}: {}", err.code, err.message);
        }
        if let Some(details) = &self.incomplete_details {
            if let Some(reason) = &details.reason {
                return reason.clone();
            }
        }
        match self.status {
            RunStatus::Incomplete => "incomplete".to_string(),
            _ => "no error reported".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AssistantTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_keeps_unknown_values() {
        let s: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(s, RunStatus::InProgress);
        let s: RunStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(s, RunStatus::Unknown("paused".to_string()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"paused\"");
    }

    #[test]
    fn test_terminal_and_pending_sets() {
        for s in ["completed", "failed", "cancelled", "expired", "incomplete"] {
            assert!(RunStatus::from(s).is_terminal(), "{s}");
            assert!(!RunStatus::from(s).is_pending(), "{s}");
        }
        for s in ["queued", "in_progress", "cancelling"] {
            assert!(RunStatus::from(s).is_pending(), "{s}");
            assert!(!RunStatus::from(s).is_terminal(), "{s}");
        }
        assert!(!RunStatus::RequiresAction.is_terminal());
        assert!(!RunStatus::RequiresAction.is_pending());
    }

    #[test]
    fn test_failure_reason() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "failed",
            "last_error": {"code": "rate_limit_exceeded", "message": "quota"}
        }))
        .unwrap();
        assert_eq!(run.failure_reason(), "rate_limit_exceeded: quota");

        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_2",
            "thread_id": "thread_1",
            "status": "incomplete",
            "incomplete_details": {"reason": "max_completion_tokens"}
        }))
        .unwrap();
        assert_eq!(run.failure_reason(), "max_completion_tokens");
    }
}
