use super::{found, ignore_not_found, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::{ExpiresAfter, FileCounts, Metadata, VectorStore, VectorStoreRequest};
use crate::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct VectorStoreConfig {
    pub name: Option<String>,
    /// Only used on create; attach later files with `openai_vector_store_file`.
    pub file_ids: Vec<String>,
    pub expires_after: Option<ExpiresAfter>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorStoreState {
    pub id: String,
    pub name: Option<String>,
    pub created_at: i64,
    pub status: String,
    pub usage_bytes: u64,
    pub file_counts: FileCounts,
    pub expires_after: Option<ExpiresAfter>,
    pub expires_at: Option<i64>,
    pub metadata: Option<Metadata>,
}

impl From<VectorStore> for VectorStoreState {
    fn from(v: VectorStore) -> Self {
        Self {
            id: v.id,
            name: v.name,
            created_at: v.created_at,
            status: v.status,
            usage_bytes: v.usage_bytes,
            file_counts: v.file_counts.unwrap_or_default(),
            expires_after: v.expires_after,
            expires_at: v.expires_at,
            metadata: v.metadata,
        }
    }
}

pub struct VectorStoreResource;

#[async_trait]
impl ManagedResource for VectorStoreResource {
    type Config = VectorStoreConfig;
    type State = VectorStoreState;

    fn type_name(&self) -> &'static str {
        "openai_vector_store"
    }

    async fn create(&self, client: &OpenAiClient, config: &VectorStoreConfig) -> Result<VectorStoreState> {
        let req = VectorStoreRequest {
            name: config.name.clone(),
            file_ids: config.file_ids.clone(),
            expires_after: config.expires_after.clone(),
            metadata: config.metadata.clone(),
        };
        Ok(client.create_vector_store(&req).await?.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &VectorStoreState) -> Result<Option<VectorStoreState>> {
        Ok(found(client.get_vector_store(&state.id).await)?.map(Into::into))
    }

    async fn update(
        &self,
        client: &OpenAiClient,
        state: &VectorStoreState,
        config: &VectorStoreConfig,
    ) -> Result<VectorStoreState> {
        let req = VectorStoreRequest {
            name: config.name.clone(),
            file_ids: Vec::new(),
            expires_after: config.expires_after.clone(),
            metadata: config.metadata.clone(),
        };
        Ok(client.update_vector_store(&state.id, &req).await?.into())
    }

    async fn delete(&self, client: &OpenAiClient, state: &VectorStoreState) -> Result<()> {
        ignore_not_found(client.delete_vector_store(&state.id).await)
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<VectorStoreState>> {
        Ok(found(client.get_vector_store(import_id).await)?.map(Into::into))
    }
}
