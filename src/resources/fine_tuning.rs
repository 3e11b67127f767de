use super::{found, unsupported_update, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::{CreateFineTuningJobRequest, FineTuningJob, HyperparameterValue, Hyperparameters};
use crate::Result;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct FineTuningJobConfig {
    pub model: String,
    pub training_file_id: String,
    pub validation_file_id: Option<String>,
    pub epochs: Option<u64>,
    pub batch_size: Option<u64>,
    pub learning_rate_multiplier: Option<f64>,
    pub suffix: Option<String>,
}

impl FineTuningJobConfig {
    fn to_request(&self) -> CreateFineTuningJobRequest {
        let hyperparameters = Hyperparameters {
            n_epochs: self.epochs.map(HyperparameterValue::Int),
            batch_size: self.batch_size.map(HyperparameterValue::Int),
            learning_rate_multiplier: self.learning_rate_multiplier.map(HyperparameterValue::Float),
        };
        CreateFineTuningJobRequest {
            model: self.model.clone(),
            training_file: self.training_file_id.clone(),
            validation_file: self.validation_file_id.clone(),
            hyperparameters: (hyperparameters != Hyperparameters::default()).then_some(hyperparameters),
            suffix: self.suffix.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FineTuningJobState {
    pub id: String,
    pub model: String,
    pub status: String,
    pub created_at: i64,
    pub finished_at: Option<i64>,
    pub fine_tuned_model: Option<String>,
    pub organization_id: Option<String>,
    pub training_file_id: String,
    pub validation_file_id: Option<String>,
    pub result_files: Vec<String>,
}

impl From<FineTuningJob> for FineTuningJobState {
    fn from(j: FineTuningJob) -> Self {
        Self {
            id: j.id,
            model: j.model,
            status: j.status,
            created_at: j.created_at,
            finished_at: j.finished_at,
            fine_tuned_model: j.fine_tuned_model,
            organization_id: j.organization_id,
            training_file_id: j.training_file,
            validation_file_id: j.validation_file,
            result_files: j.result_files,
        }
    }
}

pub struct FineTuningJobResource;

#[async_trait]
impl ManagedResource for FineTuningJobResource {
    type Config = FineTuningJobConfig;
    type State = FineTuningJobState;

    fn type_name(&self) -> &'static str {
        "openai_fine_tuning_job"
    }

    async fn create(&self, client: &OpenAiClient, config: &FineTuningJobConfig) -> Result<FineTuningJobState> {
        Ok(client
            .create_fine_tuning_job(&config.to_request())
            .await?
            .into())
    }

    async fn read(&self, client: &OpenAiClient, state: &FineTuningJobState) -> Result<Option<FineTuningJobState>> {
        Ok(found(client.get_fine_tuning_job(&state.id).await)?.map(Into::into))
    }

    async fn update(
        &self,
        _client: &OpenAiClient,
        _state: &FineTuningJobState,
        _config: &FineTuningJobConfig,
    ) -> Result<FineTuningJobState> {
        Err(unsupported_update("openai_fine_tuning_job"))
    }

    /// Jobs cannot be deleted upstream; a job that is still running is cancelled.
    async fn delete(&self, client: &OpenAiClient, state: &FineTuningJobState) -> Result<()> {
        let Some(job) = found(client.get_fine_tuning_job(&state.id).await)? else {
            return Ok(());
        };
        if !job.is_active() {
            debug!(job_id = %job.id, status = %job.status, "fine-tuning job already finished");
            return Ok(());
        }
        let job = client.cancel_fine_tuning_job(&state.id).await?;
        info!(job_id = %job.id, status = %job.status, "cancelled fine-tuning job");
        Ok(())
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<FineTuningJobState>> {
        Ok(found(client.get_fine_tuning_job(import_id).await)?.map(Into::into))
    }
}
