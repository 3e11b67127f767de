//! Assistant runs.
//!
//! Creating a run submits it and, by default, waits for it to finish. Runs
//! cannot be modified; deleting one cancels it if it is still going.

use super::assistant::{parse_tools, ToolDeclaration};
use super::{found, parse_duration, split_import_id, unsupported_update, ManagedResource};
use crate::client::{ListMessagesQuery, OpenAiClient};
use crate::polling::PollOptions;
use crate::types::{CreateRunRequest, Metadata, ModifyMessageRequest, Run, RunStatus};
use crate::Result;
use async_trait::async_trait;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub thread_id: String,
    pub assistant_id: String,
    pub model: Option<String>,
    pub instructions: Option<String>,
    pub tools: Vec<ToolDeclaration>,
    pub metadata: Option<Metadata>,
    pub max_prompt_tokens: Option<u32>,
    pub max_completion_tokens: Option<u32>,
    pub wait_for_completion: bool,
    /// Duration string such as `5s`; defaults to the client's poll interval.
    pub polling_interval: Option<String>,
    /// Duration string such as `10m`; defaults to the client's run timeout.
    pub timeout: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_id: String::new(),
            assistant_id: String::new(),
            model: None,
            instructions: None,
            tools: Vec::new(),
            metadata: None,
            max_prompt_tokens: None,
            max_completion_tokens: None,
            wait_for_completion: true,
            polling_interval: None,
            timeout: None,
        }
    }
}

impl RunConfig {
    fn poll_options(&self, base: PollOptions) -> Result<PollOptions> {
        let mut opts = base;
        if let Some(raw) = &self.polling_interval {
            opts = opts.with_interval(parse_duration(raw)?);
        }
        if let Some(raw) = &self.timeout {
            opts = opts.with_timeout(parse_duration(raw)?);
        }
        Ok(opts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
    pub model: Option<String>,
    pub created_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub failed_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub last_error: Option<String>,
    pub metadata: Option<Metadata>,
    /// Latest assistant reply, filled in once the run has completed.
    pub response_content: Option<String>,
    /// Why the run stopped early, for incomplete runs.
    pub incomplete_details: Option<String>,
}

impl From<Run> for RunState {
    fn from(r: Run) -> Self {
        let incomplete_details = match r.status {
            RunStatus::Incomplete => Some(
                r.incomplete_details
                    .as_ref()
                    .and_then(|d| d.reason.clone())
                    .unwrap_or_else(|| "incomplete".to_string()),
            ),
            _ => None,
        };
        Self {
            id: r.id,
            thread_id: r.thread_id,
            assistant_id: r.assistant_id,
            status: r.status,
            model: r.model,
            created_at: r.created_at,
            started_at: r.started_at,
            completed_at: r.completed_at,
            cancelled_at: r.cancelled_at,
            failed_at: r.failed_at,
            expires_at: r.expires_at,
            last_error: r.last_error.map(|e| e.message),
            metadata: r.metadata,
            response_content: None,
            incomplete_details,
        }
    }
}

pub struct RunResource;

impl RunResource {
    /// Newest assistant message text in the run's thread.
    async fn latest_reply(client: &OpenAiClient, thread_id: &str, run_id: &str) -> Result<Option<String>> {
        let query = ListMessagesQuery {
            limit: Some(20),
            order: Some("desc".to_string()),
            after: None,
            run_id: Some(run_id.to_string()),
        };
        let messages = client.list_messages(thread_id, &query).await?;
        Ok(messages
            .iter()
            .filter(|m| m.role == "assistant")
            .find_map(|m| m.text().map(str::to_string)))
    }

    /// Tag the thread's newest message with the run that consumed it.
    async fn tag_latest_message(client: &OpenAiClient, thread_id: &str, run: &Run) {
        let query = ListMessagesQuery {
            limit: Some(1),
            order: Some("desc".to_string()),
            ..Default::default()
        };
        let latest = match client.list_messages(thread_id, &query).await {
            Ok(messages) => messages.into_iter().next(),
            Err(e) => {
                warn!(thread_id, run_id = %run.id, error = %e, "could not list messages to tag with run id");
                return;
            }
        };
        let Some(message) = latest else { return };

        let mut metadata = message.metadata.clone().unwrap_or_default();
        metadata.insert("run_id".to_string(), run.id.clone());
        metadata.insert("assistant_id".to_string(), run.assistant_id.clone());
        let req = ModifyMessageRequest {
            metadata: Some(metadata),
        };
        if let Err(e) = client.update_message(thread_id, &message.id, &req).await {
            warn!(thread_id, message_id = %message.id, error = %e, "failed to tag message with run id");
        }
    }

    async fn to_state(client: &OpenAiClient, run: Run) -> Result<RunState> {
        let completed = run.status == RunStatus::Completed;
        let mut state = RunState::from(run);
        if completed {
            state.response_content = Self::latest_reply(client, &state.thread_id, &state.id).await?;
        }
        Ok(state)
    }
}

#[async_trait]
impl ManagedResource for RunResource {
    type Config = RunConfig;
    type State = RunState;

    fn type_name(&self) -> &'static str {
        "openai_run"
    }

    async fn create(&self, client: &OpenAiClient, config: &RunConfig) -> Result<RunState> {
        let opts = config.poll_options(client.poll_options())?;
        let req = CreateRunRequest {
            assistant_id: config.assistant_id.clone(),
            model: config.model.clone(),
            instructions: config.instructions.clone(),
            tools: parse_tools(&config.tools)?,
            metadata: config.metadata.clone(),
            max_prompt_tokens: config.max_prompt_tokens,
            max_completion_tokens: config.max_completion_tokens,
        };
        let run = client.create_run(&config.thread_id, &req).await?;
        Self::tag_latest_message(client, &config.thread_id, &run).await;

        if !config.wait_for_completion {
            return Ok(run.into());
        }
        info!(
            run_id = %run.id,
            interval_ms = opts.interval.as_millis() as u64,
            timeout_ms = opts.timeout.as_millis() as u64,
            "waiting for run to complete"
        );
        let done = client.wait_for_run_with(&config.thread_id, &run.id, opts).await?;
        Self::to_state(client, done).await
    }

    async fn read(&self, client: &OpenAiClient, state: &RunState) -> Result<Option<RunState>> {
        match found(client.get_run(&state.thread_id, &state.id).await)? {
            Some(run) => Ok(Some(Self::to_state(client, run).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, _client: &OpenAiClient, _state: &RunState, _config: &RunConfig) -> Result<RunState> {
        Err(unsupported_update("openai_run"))
    }

    async fn delete(&self, client: &OpenAiClient, state: &RunState) -> Result<()> {
        client.cancel_run(&state.thread_id, &state.id).await
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<RunState>> {
        let (thread_id, run_id) = split_import_id(import_id, "openai_run", "thread_id/run_id")?;
        match found(client.get_run(thread_id, run_id).await)? {
            Some(run) => Ok(Some(Self::to_state(client, run).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_poll_options_from_config() {
        let cfg = RunConfig {
            polling_interval: Some("2s".into()),
            ..Default::default()
        };
        let opts = cfg.poll_options(PollOptions::default()).unwrap();
        assert_eq!(opts.interval, Duration::from_secs(2));
        assert_eq!(opts.timeout, Duration::from_secs(600));

        let cfg = RunConfig {
            timeout: Some("soon".into()),
            ..Default::default()
        };
        assert!(cfg.poll_options(PollOptions::default()).is_err());
        assert!(RunConfig::default().wait_for_completion);
    }

    #[test]
    fn test_incomplete_runs_record_details() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "incomplete",
            "incomplete_details": {"reason": "max_prompt_tokens"}
        }))
        .unwrap();
        let state = RunState::from(run);
        assert_eq!(state.incomplete_details.as_deref(), Some("max_prompt_tokens"));
        assert!(state.response_content.is_none());
    }
}
