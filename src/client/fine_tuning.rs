use crate::client::core::OpenAiClient;
use crate::types::{CreateFineTuningJobRequest, FineTuningJob};
use crate::Result;
use tracing::info;

impl OpenAiClient {
    pub async fn create_fine_tuning_job(&self, req: &CreateFineTuningJobRequest) -> Result<FineTuningJob> {
        let job: FineTuningJob = self.create_json("/fine_tuning/jobs", req).await?;
        info!(job_id = %job.id, model = %job.model, status = %job.status, "created fine-tuning job");
        Ok(job)
    }

    pub async fn get_fine_tuning_job(&self, job_id: &str) -> Result<FineTuningJob> {
        self.get_json(&format!("/fine_tuning/jobs/{}", job_id)).await
    }

    pub async fn cancel_fine_tuning_job(&self, job_id: &str) -> Result<FineTuningJob> {
        self.post_action(&format!("/fine_tuning/jobs/{}/cancel", job_id))
            .await
    }
}
