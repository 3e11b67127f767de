//! 资源适配器：把声明式配置映射为 API 调用并回写状态。
//!
//! # Managed Resources
//!
//! Each adapter implements [`ManagedResource`]: it turns a typed configuration
//! into upstream requests and maps responses back into state. `read` returns
//! `Ok(None)` when the upstream object is gone so the caller can drop it from
//! state; `delete` treats an already-missing object as deleted.
//!
//! | Type name | Adapter | Import id |
//! |-----------|---------|-----------|
//! | `openai_assistant` | [`assistant::AssistantResource`] | `asst_…` |
//! | `openai_thread` | [`thread::ThreadResource`] | `thread_…` |
//! | `openai_message` | [`message::MessageResource`] | `thread_id/message_id` |
//! | `openai_run` | [`run::RunResource`] | `thread_id/run_id` |
//! | `openai_file` | [`file::FileResource`] | `file-…` |
//! | `openai_vector_store` | [`vector_store::VectorStoreResource`] | `vs_…` |
//! | `openai_vector_store_file` | [`vector_store_file::VectorStoreFileResource`] | `vector_store_id/file_id` |
//! | `openai_fine_tuning_job` | [`fine_tuning::FineTuningJobResource`] | `ftjob-…` |
//! | `openai_chat_completion` | [`chat_completion::ChatCompletionResource`] | not importable |
//! | `openai_embedding` | [`embedding::EmbeddingResource`] | not importable |

pub mod assistant;
pub mod chat_completion;
pub mod data_sources;
pub mod embedding;
pub mod file;
pub mod fine_tuning;
pub mod message;
pub mod run;
pub mod thread;
pub mod vector_store;
pub mod vector_store_file;

use crate::client::OpenAiClient;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Create/Read/Update/Delete/Import lifecycle of one managed resource type.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    type Config: Send + Sync;
    type State: Send + Sync;

    /// Registered type name, e.g. `openai_assistant`.
    fn type_name(&self) -> &'static str;

    async fn create(&self, client: &OpenAiClient, config: &Self::Config) -> Result<Self::State>;

    /// Refresh state. `Ok(None)` means the object no longer exists upstream.
    async fn read(&self, client: &OpenAiClient, state: &Self::State) -> Result<Option<Self::State>>;

    async fn update(
        &self,
        client: &OpenAiClient,
        state: &Self::State,
        config: &Self::Config,
    ) -> Result<Self::State>;

    async fn delete(&self, client: &OpenAiClient, state: &Self::State) -> Result<()>;

    /// Adopt an existing upstream object by id. `Ok(None)` if it does not exist.
    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<Self::State>>;
}

/// Map an upstream 404 to `None`.
pub(crate) fn found<T>(res: Result<T>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Treat an upstream 404 as success.
pub(crate) fn ignore_not_found<T>(res: Result<T>) -> Result<()> {
    match res {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Split a two-part import id such as `thread_id/run_id`.
pub(crate) fn split_import_id<'a>(
    import_id: &'a str,
    resource: &'static str,
    expected: &'static str,
) -> Result<(&'a str, &'a str)> {
    match import_id.split_once('/') {
        Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains('/') => Ok((a, b)),
        _ => Err(Error::validation_with_context(
            format!("invalid import id '{}'", import_id),
            ErrorContext::new()
                .with_field_path("import_id")
                .with_details(format!("expected {}", expected))
                .with_source(resource),
        )),
    }
}

pub(crate) fn unsupported_update(resource: &'static str) -> Error {
    Error::validation_with_context(
        "update is not supported; changes require replacing the resource",
        ErrorContext::new().with_source(resource),
    )
}

/// Parse a duration such as `5s`, `10m`, `1m30s` or `250ms`.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let invalid = |details: &str| {
        Error::validation_with_context(
            format!("invalid duration '{}'", raw),
            ErrorContext::new()
                .with_details(details.to_string())
                .with_source("duration"),
        )
    };

    let s = raw.trim();
    if s.is_empty() {
        return Err(invalid("empty value"));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| invalid("missing unit (ms, s, m or h)"))?;
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let value: f64 = rest[..digits]
            .parse()
            .map_err(|_| invalid("expected a number"))?;
        rest = &rest[digits..];
        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let secs = match &rest[..unit_len] {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            _ => return Err(invalid("unknown unit, expected ms, s, m or h")),
        };
        total = Duration::try_from_secs_f64(secs)
            .ok()
            .and_then(|d| total.checked_add(d))
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = &rest[unit_len..];
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        for bad in ["", "5", "s", "5x", "5 s"] {
            assert!(parse_duration(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        for huge in ["99999999999999999999999h", "18446744073709551615s1h"] {
            let err = parse_duration(huge).unwrap_err();
            assert_eq!(
                err.context().and_then(|c| c.details.as_deref()),
                Some("duration out of range"),
                "{huge}"
            );
        }
    }

    #[test]
    fn test_split_import_id() {
        assert_eq!(
            split_import_id("thread_1/run_1", "openai_run", "thread_id/run_id").unwrap(),
            ("thread_1", "run_1")
        );
        for bad in ["run_1", "/run_1", "thread_1/", "a/b/c"] {
            let err = split_import_id(bad, "openai_run", "thread_id/run_id").unwrap_err();
            assert_eq!(
                err.context().and_then(|c| c.field_path.as_deref()),
                Some("import_id")
            );
        }
    }
}
