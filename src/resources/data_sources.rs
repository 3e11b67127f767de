//! Read-only data sources.

use super::assistant::AssistantState;
use super::chat_completion::ChatCompletionConfig;
use super::vector_store::VectorStoreState;
use crate::client::OpenAiClient;
use crate::types::{ChatChoice, ChatUsage, Model};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;

#[async_trait]
pub trait DataSource: Send + Sync {
    type Query: Send + Sync;
    type Output: Send + Sync;

    fn type_name(&self) -> &'static str;

    async fn read(&self, client: &OpenAiClient, query: &Self::Query) -> Result<Self::Output>;
}

#[derive(Debug, Clone, Default)]
pub struct ModelQuery {
    pub model_id: String,
    /// Fail unless the model is owned by this organization (e.g. `openai`, `system`).
    pub filter_owner: Option<String>,
}

pub struct ModelDataSource;

#[async_trait]
impl DataSource for ModelDataSource {
    type Query = ModelQuery;
    type Output = Model;

    fn type_name(&self) -> &'static str {
        "openai_model"
    }

    async fn read(&self, client: &OpenAiClient, query: &ModelQuery) -> Result<Model> {
        let model = client.get_model(&query.model_id).await?;
        if let Some(owner) = query.filter_owner.as_deref().filter(|o| !o.is_empty()) {
            if model.owned_by != owner {
                return Err(Error::validation_with_context(
                    format!(
                        "model '{}' is owned by '{}', not '{}'",
                        model.id, model.owned_by, owner
                    ),
                    ErrorContext::new()
                        .with_field_path("filter_owner")
                        .with_source("openai_model"),
                ));
            }
        }
        Ok(model)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelsQuery {
    pub owned_by: Option<String>,
}

pub struct ModelsDataSource;

#[async_trait]
impl DataSource for ModelsDataSource {
    type Query = ModelsQuery;
    type Output = Vec<Model>;

    fn type_name(&self) -> &'static str {
        "openai_models"
    }

    async fn read(&self, client: &OpenAiClient, query: &ModelsQuery) -> Result<Vec<Model>> {
        let mut models = client.list_models().await?;
        if let Some(owner) = query.owned_by.as_deref() {
            models.retain(|m| m.owned_by == owner);
        }
        models.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(models)
    }
}

pub struct AssistantDataSource;

#[async_trait]
impl DataSource for AssistantDataSource {
    /// Assistant id.
    type Query = String;
    type Output = AssistantState;

    fn type_name(&self) -> &'static str {
        "openai_assistant"
    }

    async fn read(&self, client: &OpenAiClient, assistant_id: &String) -> Result<AssistantState> {
        Ok(client.get_assistant(assistant_id).await?.into())
    }
}

pub struct VectorStoreDataSource;

#[async_trait]
impl DataSource for VectorStoreDataSource {
    /// Vector store id.
    type Query = String;
    type Output = VectorStoreState;

    fn type_name(&self) -> &'static str {
        "openai_vector_store"
    }

    async fn read(&self, client: &OpenAiClient, vector_store_id: &String) -> Result<VectorStoreState> {
        Ok(client.get_vector_store(vector_store_id).await?.into())
    }
}

/// Result of a chat completion generated at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionOutput {
    /// Upstream completion id (`chatcmpl-...`).
    pub id: String,
    pub model: String,
    /// Content of every choice, in index order.
    pub response_content: Vec<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

/// Generates a completion on every read; nothing is stored upstream.
pub struct ChatCompletionDataSource;

#[async_trait]
impl DataSource for ChatCompletionDataSource {
    type Query = ChatCompletionConfig;
    type Output = ChatCompletionOutput;

    fn type_name(&self) -> &'static str {
        "openai_chat_completion"
    }

    async fn read(&self, client: &OpenAiClient, query: &ChatCompletionConfig) -> Result<ChatCompletionOutput> {
        let mut req = query.to_request(self.type_name())?;
        req.n.get_or_insert(1);
        let completion = client.create_chat_completion(&req).await?;

        let response_content = completion.contents();
        let mut choices = completion.choices;
        choices.sort_by_key(|c| c.index);
        Ok(ChatCompletionOutput {
            id: completion.id,
            model: completion.model,
            response_content,
            choices,
            usage: completion.usage,
        })
    }
}
