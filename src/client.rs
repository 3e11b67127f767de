//! OpenAI API client.
//!
//! [`OpenAiClient`] owns the pooled transport and the retry executor; the
//! per-entity operations live in the submodules under `src/client/`.

pub mod builder;
pub mod core;

mod assistants;
mod completions;
mod files;
mod fine_tuning;
mod models;
mod runs;
mod threads;
mod vector_stores;

pub use self::builder::OpenAiClientBuilder;
pub use self::core::OpenAiClient;
pub use self::threads::ListMessagesQuery;
