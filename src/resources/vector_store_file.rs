use super::{found, ignore_not_found, split_import_id, unsupported_update, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::VectorStoreFile;
use crate::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct VectorStoreFileConfig {
    pub vector_store_id: String,
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorStoreFileState {
    /// Same as the attached file's id.
    pub id: String,
    pub vector_store_id: String,
    pub created_at: i64,
    pub status: String,
    pub usage_bytes: u64,
}

impl From<VectorStoreFile> for VectorStoreFileState {
    fn from(f: VectorStoreFile) -> Self {
        Self {
            id: f.id,
            vector_store_id: f.vector_store_id,
            created_at: f.created_at,
            status: f.status,
            usage_bytes: f.usage_bytes,
        }
    }
}

pub struct VectorStoreFileResource;

#[async_trait]
impl ManagedResource for VectorStoreFileResource {
    type Config = VectorStoreFileConfig;
    type State = VectorStoreFileState;

    fn type_name(&self) -> &'static str {
        "openai_vector_store_file"
    }

    async fn create(&self, client: &OpenAiClient, config: &VectorStoreFileConfig) -> Result<VectorStoreFileState> {
        let file = client
            .create_vector_store_file(&config.vector_store_id, &config.file_id)
            .await?;
        Ok(file.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &VectorStoreFileState) -> Result<Option<VectorStoreFileState>> {
        Ok(found(client.get_vector_store_file(&state.vector_store_id, &state.id).await)?.map(Into::into))
    }

    async fn update(
        &self,
        _client: &OpenAiClient,
        _state: &VectorStoreFileState,
        _config: &VectorStoreFileConfig,
    ) -> Result<VectorStoreFileState> {
        Err(unsupported_update("openai_vector_store_file"))
    }

    async fn delete(&self, client: &OpenAiClient, state: &VectorStoreFileState) -> Result<()> {
        ignore_not_found(
            client
                .delete_vector_store_file(&state.vector_store_id, &state.id)
                .await,
        )
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<VectorStoreFileState>> {
        let (vector_store_id, file_id) =
            split_import_id(import_id, "openai_vector_store_file", "vector_store_id/file_id")?;
        Ok(found(client.get_vector_store_file(vector_store_id, file_id).await)?.map(Into::into))
    }
}
