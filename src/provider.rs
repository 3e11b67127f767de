//! Provider entry point: configuration in, configured client out.

use crate::client::{OpenAiClient, OpenAiClientBuilder};
use crate::config::ProviderConfig;
use crate::resources::assistant::AssistantResource;
use crate::resources::chat_completion::ChatCompletionResource;
use crate::resources::data_sources::{
    AssistantDataSource, ChatCompletionDataSource, DataSource, ModelDataSource, ModelsDataSource,
    VectorStoreDataSource,
};
use crate::resources::embedding::EmbeddingResource;
use crate::resources::file::FileResource;
use crate::resources::fine_tuning::FineTuningJobResource;
use crate::resources::message::MessageResource;
use crate::resources::run::RunResource;
use crate::resources::thread::ThreadResource;
use crate::resources::vector_store::VectorStoreResource;
use crate::resources::vector_store_file::VectorStoreFileResource;
use crate::resources::ManagedResource;
use crate::Result;
use tracing::info;

pub const PROVIDER_TYPE_NAME: &str = "openai";

pub struct Provider;

impl Provider {
    /// Resolve configuration, install logging and build the shared client.
    pub fn configure(config: &ProviderConfig) -> Result<OpenAiClient> {
        let resolved = config.resolve()?;
        crate::logging::init(resolved.debug);
        let client = OpenAiClientBuilder::from_config(&resolved).build()?;
        info!(
            base_url = %client.base_url(),
            organization = resolved.transport.organization.is_some(),
            max_attempts = resolved.retry.max_attempts(),
            "configured OpenAI provider"
        );
        Ok(client)
    }

    pub fn resource_types() -> Vec<&'static str> {
        vec![
            AssistantResource.type_name(),
            ThreadResource.type_name(),
            MessageResource.type_name(),
            RunResource.type_name(),
            FileResource.type_name(),
            VectorStoreResource.type_name(),
            VectorStoreFileResource.type_name(),
            FineTuningJobResource.type_name(),
            ChatCompletionResource.type_name(),
            EmbeddingResource.type_name(),
        ]
    }

    pub fn data_source_types() -> Vec<&'static str> {
        vec![
            ModelDataSource.type_name(),
            ModelsDataSource.type_name(),
            AssistantDataSource.type_name(),
            VectorStoreDataSource.type_name(),
            ChatCompletionDataSource.type_name(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_names_are_unique_and_prefixed() {
        let resources = Provider::resource_types();
        let unique: HashSet<_> = resources.iter().collect();
        assert_eq!(unique.len(), resources.len());
        for name in resources.iter().chain(Provider::data_source_types().iter()) {
            assert!(name.starts_with("openai_"), "{name}");
        }
        assert!(resources.contains(&"openai_run"));
        assert!(Provider::data_source_types().contains(&"openai_models"));
        assert!(Provider::data_source_types().contains(&"openai_chat_completion"));
    }

    #[test]
    fn test_configure_with_explicit_key() {
        let client = Provider::configure(&ProviderConfig {
            api_key: Some("sk-test".into()),
            base_url: Some("http://127.0.0.1:1/v1".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1/v1");
    }
}
