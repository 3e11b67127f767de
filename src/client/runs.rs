use crate::client::core::OpenAiClient;
use crate::polling::{self, PollOptions, RunStatusSource};
use crate::types::{CreateRunRequest, Run};
use crate::Result;
use async_trait::async_trait;
use tracing::{debug, info};

impl OpenAiClient {
    pub async fn create_run(&self, thread_id: &str, req: &CreateRunRequest) -> Result<Run> {
        let run: Run = self
            .create_json(&format!("/threads/{}/runs", thread_id), req)
            .await?;
        info!(thread_id, run_id = %run.id, status = %run.status, "created run");
        Ok(run)
    }

    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_json(&format!("/threads/{}/runs/{}", thread_id, run_id))
            .await
    }

    /// Ask the upstream to stop a run.
    ///
    /// Runs that are already gone or already terminal are left alone, so this
    /// is safe to call from a delete.
    pub async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<()> {
        let run = match self.get_run(thread_id, run_id).await {
            Ok(run) => run,
            Err(e) if e.is_not_found() => {
                debug!(thread_id, run_id, "run not found, nothing to cancel");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        if run.status.is_terminal() {
            debug!(thread_id, run_id, status = %run.status, "run already terminal");
            return Ok(());
        }

        let path = format!("/threads/{}/runs/{}/cancel", thread_id, run_id);
        match self.post_action::<Run>(&path).await {
            Ok(run) => {
                info!(thread_id, run_id, status = %run.status, "cancelled run");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Poll a run with this client's default [`PollOptions`].
    pub async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.wait_for_run_with(thread_id, run_id, self.poll).await
    }

    pub async fn wait_for_run_with(&self, thread_id: &str, run_id: &str, opts: PollOptions) -> Result<Run> {
        polling::wait_for_completion(self, thread_id, run_id, opts, &self.cancel).await
    }
}

#[async_trait]
impl RunStatusSource for OpenAiClient {
    async fn fetch_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_run(thread_id, run_id).await
    }
}
