//! Chat completions and embeddings. Both are one-shot generations with no
//! upstream object to read back later.

use crate::client::core::OpenAiClient;
use crate::types::{ChatCompletion, ChatCompletionRequest, EmbeddingRequest, EmbeddingResponse};
use crate::Result;
use tracing::debug;

impl OpenAiClient {
    pub async fn create_chat_completion(&self, req: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let completion: ChatCompletion = self.create_json("/chat/completions", req).await?;
        debug!(
            model = %completion.model,
            choices = completion.choices.len(),
            "chat completion created"
        );
        Ok(completion)
    }

    pub async fn create_embedding(&self, req: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let resp: EmbeddingResponse = self.create_json("/embeddings", req).await?;
        debug!(model = %resp.model, vectors = resp.data.len(), "embedding created");
        Ok(resp)
    }
}
