use super::{found, ignore_not_found, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::{Assistant, AssistantRequest, AssistantTool, Metadata, ToolResources};
use crate::Result;
use async_trait::async_trait;

/// A tool as written in configuration: a type plus, for functions, a JSON
/// function definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolDeclaration {
    pub kind: String,
    pub function_definition: Option<String>,
}

impl ToolDeclaration {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            function_definition: None,
        }
    }

    pub fn function(definition: impl Into<String>) -> Self {
        Self {
            kind: "function".to_string(),
            function_definition: Some(definition.into()),
        }
    }
}

pub(crate) fn parse_tools(decls: &[ToolDeclaration]) -> Result<Vec<AssistantTool>> {
    decls
        .iter()
        .map(|d| AssistantTool::from_declaration(&d.kind, d.function_definition.as_deref()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AssistantConfig {
    pub model: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub tools: Vec<ToolDeclaration>,
    /// Files available to the code interpreter.
    pub file_ids: Vec<String>,
    /// Vector stores searched by file search.
    pub vector_store_ids: Vec<String>,
    pub metadata: Option<Metadata>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl AssistantConfig {
    pub(crate) fn to_request(&self) -> Result<AssistantRequest> {
        let tool_resources = ToolResources::from_ids(&self.file_ids, &self.vector_store_ids);
        Ok(AssistantRequest {
            model: self.model.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            instructions: self.instructions.clone(),
            tools: parse_tools(&self.tools)?,
            tool_resources,
            metadata: self.metadata.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantState {
    pub id: String,
    pub created_at: i64,
    pub model: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub tools: Vec<AssistantTool>,
    pub file_ids: Vec<String>,
    pub vector_store_ids: Vec<String>,
    pub metadata: Option<Metadata>,
}

impl From<Assistant> for AssistantState {
    fn from(a: Assistant) -> Self {
        let (file_ids, vector_store_ids) = a.tool_resources.unwrap_or_default().into_ids();
        Self {
            id: a.id,
            created_at: a.created_at,
            model: a.model,
            name: a.name,
            description: a.description,
            instructions: a.instructions,
            tools: a.tools,
            file_ids,
            vector_store_ids,
            metadata: a.metadata,
        }
    }
}

pub struct AssistantResource;

#[async_trait]
impl ManagedResource for AssistantResource {
    type Config = AssistantConfig;
    type State = AssistantState;

    fn type_name(&self) -> &'static str {
        "openai_assistant"
    }

    async fn create(&self, client: &OpenAiClient, config: &AssistantConfig) -> Result<AssistantState> {
        let req = config.to_request()?;
        Ok(client.create_assistant(&req).await?.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &AssistantState) -> Result<Option<AssistantState>> {
        Ok(found(client.get_assistant(&state.id).await)?.map(Into::into))
    }

    async fn update(
        &self,
        client: &OpenAiClient,
        state: &AssistantState,
        config: &AssistantConfig,
    ) -> Result<AssistantState> {
        let req = config.to_request()?;
        Ok(client.update_assistant(&state.id, &req).await?.into())
    }

    async fn delete(&self, client: &OpenAiClient, state: &AssistantState) -> Result<()> {
        ignore_not_found(client.delete_assistant(&state.id).await)
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<AssistantState>> {
        Ok(found(client.get_assistant(import_id).await)?.map(Into::into))
    }
}
