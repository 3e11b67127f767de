use super::ManagedResource;
use crate::client::OpenAiClient;
use crate::types::{ChatCompletion, ChatCompletionRequest, ChatMessage};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ChatCompletionConfig {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<u32>,
    pub max_tokens: Option<u32>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub logit_bias: Option<HashMap<String, i32>>,
    pub user: Option<String>,
}

impl ChatCompletionConfig {
    pub(crate) fn to_request(&self, source: &'static str) -> Result<ChatCompletionRequest> {
        if self.messages.is_empty() {
            return Err(Error::validation_with_context(
                "at least one message is required",
                ErrorContext::new()
                    .with_field_path("messages")
                    .with_source(source),
            ));
        }
        Ok(ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            n: self.n,
            max_tokens: self.max_tokens,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            logit_bias: self.logit_bias.clone(),
            user: self.user.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionState {
    /// `chat-{model}-{created}`; the upstream keeps no readable object.
    pub id: String,
    pub model: String,
    pub created: i64,
    /// One entry per choice.
    pub response_content: Vec<String>,
    pub response_role: Option<String>,
    pub total_tokens: Option<u32>,
}

impl ChatCompletionState {
    pub fn from_completion(requested_model: &str, c: ChatCompletion) -> Self {
        let model = if c.model.is_empty() {
            requested_model.to_string()
        } else {
            c.model.clone()
        };
        Self {
            id: format!("chat-{}-{}", model, c.created),
            response_content: c.contents(),
            response_role: c.choices.first().map(|ch| ch.message.role.clone()),
            total_tokens: c.usage.as_ref().map(|u| u.total_tokens),
            created: c.created,
            model,
        }
    }
}

/// A generated chat completion kept as state. Any change generates a new one.
pub struct ChatCompletionResource;

#[async_trait]
impl ManagedResource for ChatCompletionResource {
    type Config = ChatCompletionConfig;
    type State = ChatCompletionState;

    fn type_name(&self) -> &'static str {
        "openai_chat_completion"
    }

    async fn create(&self, client: &OpenAiClient, config: &ChatCompletionConfig) -> Result<ChatCompletionState> {
        let req = config.to_request("openai_chat_completion")?;
        let completion = client.create_chat_completion(&req).await?;
        Ok(ChatCompletionState::from_completion(&config.model, completion))
    }

    async fn read(&self, _client: &OpenAiClient, state: &ChatCompletionState) -> Result<Option<ChatCompletionState>> {
        Ok(Some(state.clone()))
    }

    async fn update(
        &self,
        client: &OpenAiClient,
        _state: &ChatCompletionState,
        config: &ChatCompletionConfig,
    ) -> Result<ChatCompletionState> {
        self.create(client, config).await
    }

    async fn delete(&self, _client: &OpenAiClient, state: &ChatCompletionState) -> Result<()> {
        debug!(id = %state.id, "dropping chat completion from state");
        Ok(())
    }

    async fn import(&self, _client: &OpenAiClient, import_id: &str) -> Result<Option<ChatCompletionState>> {
        Err(Error::validation_with_context(
            format!("chat completions cannot be imported ('{}')", import_id),
            ErrorContext::new()
                .with_field_path("import_id")
                .with_source("openai_chat_completion"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_id_and_choice_order() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "created": 1700000000,
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 1, "message": {"role": "assistant", "content": "second"}},
                {"index": 0, "message": {"role": "assistant", "content": "first"}}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
        }))
        .unwrap();
        let state = ChatCompletionState::from_completion("gpt-4o-mini", completion);
        assert_eq!(state.id, "chat-gpt-4o-mini-1700000000");
        assert_eq!(state.response_content, vec!["first", "second"]);
        assert_eq!(state.total_tokens, Some(7));
    }
}
