use super::{found, ignore_not_found, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::tool::{CodeInterpreterResources, FileSearchResources};
use crate::types::{
    CreateMessageRequest, CreateThreadRequest, Metadata, ModifyThreadRequest, Thread, ToolResources,
};
use crate::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct ThreadConfig {
    /// Messages seeded into the thread at creation.
    pub messages: Vec<CreateMessageRequest>,
    /// Files available to the code interpreter in this thread.
    pub file_ids: Vec<String>,
    /// Vector stores searched by file search in this thread.
    pub vector_store_ids: Vec<String>,
    pub metadata: Option<Metadata>,
}

impl ThreadConfig {
    fn tool_resources(&self) -> Option<ToolResources> {
        ToolResources::from_ids(&self.file_ids, &self.vector_store_ids)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadState {
    pub id: String,
    pub created_at: i64,
    pub file_ids: Vec<String>,
    pub vector_store_ids: Vec<String>,
    pub metadata: Option<Metadata>,
}

impl From<Thread> for ThreadState {
    fn from(t: Thread) -> Self {
        let (file_ids, vector_store_ids) = t.tool_resources.unwrap_or_default().into_ids();
        Self {
            id: t.id,
            created_at: t.created_at,
            file_ids,
            vector_store_ids,
            metadata: t.metadata,
        }
    }
}

pub struct ThreadResource;

#[async_trait]
impl ManagedResource for ThreadResource {
    type Config = ThreadConfig;
    type State = ThreadState;

    fn type_name(&self) -> &'static str {
        "openai_thread"
    }

    async fn create(&self, client: &OpenAiClient, config: &ThreadConfig) -> Result<ThreadState> {
        let req = CreateThreadRequest {
            messages: config.messages.clone(),
            tool_resources: config.tool_resources(),
            metadata: config.metadata.clone(),
        };
        Ok(client.create_thread(&req).await?.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &ThreadState) -> Result<Option<ThreadState>> {
        Ok(found(client.get_thread(&state.id).await)?.map(Into::into))
    }

    /// Metadata and tool resources are mutable; seeded messages belong to the
    /// thread's history. Emptied resource lists are sent explicitly so the
    /// upstream drops them.
    async fn update(&self, client: &OpenAiClient, state: &ThreadState, config: &ThreadConfig) -> Result<ThreadState> {
        let mut tool_resources = config.tool_resources();
        if tool_resources.is_none() && !(state.file_ids.is_empty() && state.vector_store_ids.is_empty()) {
            tool_resources = Some(ToolResources {
                code_interpreter: Some(CodeInterpreterResources::default()),
                file_search: Some(FileSearchResources::default()),
            });
        }
        let req = ModifyThreadRequest {
            tool_resources,
            metadata: Some(config.metadata.clone().unwrap_or_default()),
        };
        Ok(client.update_thread(&state.id, &req).await?.into())
    }

    async fn delete(&self, client: &OpenAiClient, state: &ThreadState) -> Result<()> {
        ignore_not_found(client.delete_thread(&state.id).await)
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<ThreadState>> {
        Ok(found(client.get_thread(import_id).await)?.map(Into::into))
    }
}
