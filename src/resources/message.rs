use super::{found, ignore_not_found, split_import_id, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::{Attachment, AttachmentTool, CreateMessageRequest, Message, Metadata, ModifyMessageRequest};
use crate::Result;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct MessageConfig {
    pub thread_id: String,
    pub role: String,
    pub content: String,
    /// Files attached for file search.
    pub file_ids: Vec<String>,
    pub metadata: Option<Metadata>,
}

impl MessageConfig {
    fn to_request(&self) -> CreateMessageRequest {
        CreateMessageRequest {
            role: self.role.clone(),
            content: self.content.clone(),
            attachments: self
                .file_ids
                .iter()
                .map(|id| Attachment {
                    file_id: id.clone(),
                    tools: vec![AttachmentTool {
                        kind: "file_search".to_string(),
                    }],
                })
                .collect(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageState {
    pub id: String,
    pub thread_id: String,
    pub role: String,
    pub content: String,
    pub file_ids: Vec<String>,
    pub created_at: i64,
    pub assistant_id: Option<String>,
    pub run_id: Option<String>,
    pub metadata: Option<Metadata>,
}

impl From<Message> for MessageState {
    fn from(m: Message) -> Self {
        Self {
            content: m.text().unwrap_or_default().to_string(),
            file_ids: m.attachments.iter().map(|a| a.file_id.clone()).collect(),
            id: m.id,
            thread_id: m.thread_id,
            role: m.role,
            created_at: m.created_at,
            assistant_id: m.assistant_id,
            run_id: m.run_id,
            metadata: m.metadata,
        }
    }
}

pub struct MessageResource;

#[async_trait]
impl ManagedResource for MessageResource {
    type Config = MessageConfig;
    type State = MessageState;

    fn type_name(&self) -> &'static str {
        "openai_message"
    }

    async fn create(&self, client: &OpenAiClient, config: &MessageConfig) -> Result<MessageState> {
        let msg = client
            .create_message(&config.thread_id, &config.to_request())
            .await?;
        Ok(msg.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &MessageState) -> Result<Option<MessageState>> {
        Ok(found(client.get_message(&state.thread_id, &state.id).await)?.map(Into::into))
    }

    /// Metadata is modified in place; any other change replaces the message.
    async fn update(
        &self,
        client: &OpenAiClient,
        state: &MessageState,
        config: &MessageConfig,
    ) -> Result<MessageState> {
        let replace = state.thread_id != config.thread_id
            || state.role != config.role
            || state.content != config.content
            || state.file_ids != config.file_ids;
        if replace {
            info!(message_id = %state.id, thread_id = %state.thread_id, "replacing message");
            self.delete(client, state).await?;
            return self.create(client, config).await;
        }
        let req = ModifyMessageRequest {
            metadata: Some(config.metadata.clone().unwrap_or_default()),
        };
        Ok(client
            .update_message(&state.thread_id, &state.id, &req)
            .await?
            .into())
    }

    async fn delete(&self, client: &OpenAiClient, state: &MessageState) -> Result<()> {
        ignore_not_found(client.delete_message(&state.thread_id, &state.id).await)
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<MessageState>> {
        let (thread_id, message_id) = split_import_id(import_id, "openai_message", "thread_id/message_id")?;
        Ok(found(client.get_message(thread_id, message_id).await)?.map(Into::into))
    }
}
