use crate::client::core::OpenAiClient;
use crate::types::{ListResponse, Model};
use crate::Result;

impl OpenAiClient {
    pub async fn get_model(&self, model_id: &str) -> Result<Model> {
        self.get_json(&format!("/models/{}", model_id)).await
    }

    pub async fn list_models(&self) -> Result<Vec<Model>> {
        let page: ListResponse<Model> = self.get_json("/models").await?;
        Ok(page.data)
    }
}
