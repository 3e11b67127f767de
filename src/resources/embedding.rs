use super::ManagedResource;
use crate::client::OpenAiClient;
use crate::types::EmbeddingRequest;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub input: String,
    pub dimensions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingState {
    pub id: String,
    pub model: String,
    pub embedding: Vec<f32>,
    pub prompt_tokens: u32,
}

/// Stable id for an embedding: model plus the first 16 hex digits of the
/// input's SHA-256.
pub fn embedding_id(model: &str, input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash: String = hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect();
    format!("embed-{}-{}", model, &hash[..16])
}

/// A computed embedding kept as state. Any change computes a new one.
pub struct EmbeddingResource;

#[async_trait]
impl ManagedResource for EmbeddingResource {
    type Config = EmbeddingConfig;
    type State = EmbeddingState;

    fn type_name(&self) -> &'static str {
        "openai_embedding"
    }

    async fn create(&self, client: &OpenAiClient, config: &EmbeddingConfig) -> Result<EmbeddingState> {
        let mut req = EmbeddingRequest::single(config.model.clone(), config.input.clone());
        if let Some(d) = config.dimensions {
            req = req.with_dimensions(d);
        }
        let resp = client.create_embedding(&req).await?;
        let embedding = resp
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| {
                Error::validation_with_context(
                    "embedding response contained no vectors",
                    ErrorContext::new().with_source("openai_embedding"),
                )
            })?;
        Ok(EmbeddingState {
            id: embedding_id(&config.model, &config.input),
            model: config.model.clone(),
            embedding,
            prompt_tokens: resp.usage.prompt_tokens,
        })
    }

    async fn read(&self, _client: &OpenAiClient, state: &EmbeddingState) -> Result<Option<EmbeddingState>> {
        Ok(Some(state.clone()))
    }

    async fn update(&self, client: &OpenAiClient, _state: &EmbeddingState, config: &EmbeddingConfig) -> Result<EmbeddingState> {
        self.create(client, config).await
    }

    async fn delete(&self, _client: &OpenAiClient, _state: &EmbeddingState) -> Result<()> {
        Ok(())
    }

    async fn import(&self, _client: &OpenAiClient, import_id: &str) -> Result<Option<EmbeddingState>> {
        Err(Error::validation_with_context(
            format!("embeddings cannot be imported ('{}')", import_id),
            ErrorContext::new()
                .with_field_path("import_id")
                .with_source("openai_embedding"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_id_is_stable() {
        let id = embedding_id("text-embedding-3-small", "hello");
        // sha256("hello") = 2cf24dba5fb0a30e...
        assert_eq!(id, "embed-text-embedding-3-small-2cf24dba5fb0a30e");
        assert_ne!(id, embedding_id("text-embedding-3-small", "hello!"));
    }
}
