use crate::client::core::OpenAiClient;
use crate::types::{Assistant, AssistantRequest, DeletionStatus};
use crate::Result;
use tracing::info;

impl OpenAiClient {
    pub async fn create_assistant(&self, req: &AssistantRequest) -> Result<Assistant> {
        let assistant: Assistant = self.create_json("/assistants", req).await?;
        info!(assistant_id = %assistant.id, model = %assistant.model, "created assistant");
        Ok(assistant)
    }

    pub async fn get_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.get_json(&format!("/assistants/{}", assistant_id)).await
    }

    pub async fn update_assistant(&self, assistant_id: &str, req: &AssistantRequest) -> Result<Assistant> {
        self.update_json(&format!("/assistants/{}", assistant_id), req)
            .await
    }

    pub async fn delete_assistant(&self, assistant_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/assistants/{}", assistant_id))
            .await
    }
}
