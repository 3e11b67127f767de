use crate::client::core::OpenAiClient;
use crate::types::{
    CreateVectorStoreFileRequest, DeletionStatus, VectorStore, VectorStoreFile, VectorStoreRequest,
};
use crate::Result;
use tracing::info;

impl OpenAiClient {
    pub async fn create_vector_store(&self, req: &VectorStoreRequest) -> Result<VectorStore> {
        let store: VectorStore = self.create_json("/vector_stores", req).await?;
        info!(vector_store_id = %store.id, "created vector store");
        Ok(store)
    }

    pub async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.get_json(&format!("/vector_stores/{}", vector_store_id))
            .await
    }

    pub async fn update_vector_store(&self, vector_store_id: &str, req: &VectorStoreRequest) -> Result<VectorStore> {
        self.update_json(&format!("/vector_stores/{}", vector_store_id), req)
            .await
    }

    pub async fn delete_vector_store(&self, vector_store_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/vector_stores/{}", vector_store_id))
            .await
    }

    pub async fn create_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<VectorStoreFile> {
        let req = CreateVectorStoreFileRequest {
            file_id: file_id.to_string(),
        };
        let file: VectorStoreFile = self
            .create_json(&format!("/vector_stores/{}/files", vector_store_id), &req)
            .await?;
        info!(vector_store_id, file_id, status = %file.status, "attached file to vector store");
        Ok(file)
    }

    pub async fn get_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<VectorStoreFile> {
        self.get_json(&format!("/vector_stores/{}/files/{}", vector_store_id, file_id))
            .await
    }

    pub async fn delete_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/vector_stores/{}/files/{}", vector_store_id, file_id))
            .await
    }
}
