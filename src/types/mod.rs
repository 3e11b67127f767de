//! 类型模块：OpenAI REST API 的请求与响应类型。
//!
//! # Types Module
//!
//! Strongly-typed request and response bodies for the upstream endpoints the
//! provider manages. Request types skip unset optional fields so that the
//! upstream applies its own defaults.
//!
//! | Module | Entities |
//! |--------|----------|
//! | [`model`] | Models |
//! | [`assistant`] | Assistants |
//! | [`tool`] | Assistant tools and tool resources |
//! | [`thread`] | Threads |
//! | [`message`] | Thread messages |
//! | [`run`] | Runs and run status |
//! | [`file`] | Uploaded files |
//! | [`fine_tuning`] | Fine-tuning jobs |
//! | [`chat`] | Chat completions |
//! | [`embedding`] | Embeddings |
//! | [`vector_store`] | Vector stores and their files |

pub mod assistant;
pub mod chat;
pub mod embedding;
pub mod file;
pub mod fine_tuning;
pub mod message;
pub mod model;
pub mod run;
pub mod thread;
pub mod tool;
pub mod vector_store;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form key/value metadata attached to most objects.
pub type Metadata = HashMap<String, String>;

/// Envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub object: String,
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionStatus {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub deleted: bool,
}

pub use assistant::{Assistant, AssistantRequest};
pub use chat::{ChatChoice, ChatCompletion, ChatCompletionRequest, ChatMessage, ChatUsage};
pub use embedding::{EmbeddingData, EmbeddingInput, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage};
pub use file::{FileObject, FileUpload};
pub use fine_tuning::{CreateFineTuningJobRequest, FineTuningJob, HyperparameterValue, Hyperparameters};
pub use message::{Attachment, AttachmentTool, CreateMessageRequest, Message, MessageContent, ModifyMessageRequest};
pub use model::Model;
pub use run::{CreateRunRequest, IncompleteDetails, Run, RunError, RunStatus};
pub use thread::{CreateThreadRequest, ModifyThreadRequest, Thread};
pub use tool::{AssistantTool, FunctionDefinition, ToolResources};
pub use vector_store::{
    CreateVectorStoreFileRequest, ExpiresAfter, FileCounts, VectorStore, VectorStoreFile, VectorStoreRequest,
};
