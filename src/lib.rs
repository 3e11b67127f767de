//! # terraform-provider-openai
//!
//! 这是 OpenAI 基础设施 provider 的运行时核心：带重试与限流的 API 客户端，以及 run 完成轮询。
//!
//! Runtime core of a declarative-infrastructure provider that manages OpenAI
//! platform objects (assistants, threads, messages, runs, files, fine-tuning
//! jobs, vector stores) and one-shot generations (chat completions,
//! embeddings) through a Create/Read/Update/Delete/Import lifecycle.
//!
//! ## Overview
//!
//! Every upstream call flows through the same path:
//!
//! 1. an adapter in [`resources`] builds a typed request from configuration;
//! 2. [`OpenAiClient`] hands the call to the [`resilience::RetryExecutor`];
//! 3. the executor takes a permit from the shared token bucket, performs the
//!    call and, on a retryable failure, backs off exponentially with jitter;
//! 4. run adapters then drive [`polling::wait_for_completion`] until the run
//!    is terminal, the deadline passes, or the operation is cancelled.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use terraform_provider_openai::{Provider, ProviderConfig};
//! use terraform_provider_openai::resources::assistant::{AssistantConfig, AssistantResource};
//! use terraform_provider_openai::resources::ManagedResource;
//!
//! #[tokio::main]
//! async fn main() -> terraform_provider_openai::Result<()> {
//!     // Falls back to OPENAI_API_KEY when api_key is unset.
//!     let client = Provider::configure(&ProviderConfig::default())?;
//!
//!     let state = AssistantResource
//!         .create(
//!             &client,
//!             &AssistantConfig {
//!                 model: "gpt-4o-mini".into(),
//!                 name: Some("support-bot".into()),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("created {}", state.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | Pooled HTTP transport and upstream error parsing |
//! | [`resilience`] | Rate limiting, error classification, backoff and retry |
//! | [`polling`] | Run-completion poller |
//! | [`client`] | Typed OpenAI API client and builder |
//! | [`resources`] | Managed resource and data source adapters |
//! | [`types`] | Request and response types |
//! | [`config`] | Provider configuration and environment merging |
//! | [`logging`] | Tracing subscriber setup |

pub mod client;
pub mod config;
pub mod logging;
pub mod polling;
pub mod provider;
pub mod resilience;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::{OpenAiClient, OpenAiClientBuilder};
pub use config::{ProviderConfig, ResolvedConfig};
pub use polling::{wait_for_completion, PollOptions, RunStatusSource};
pub use provider::Provider;
pub use resilience::{RetryExecutor, RetryMode, RetryPolicy};
pub use types::run::{Run, RunStatus};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
