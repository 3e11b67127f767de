use crate::transport::{ApiError, TransportError};
use crate::types::run::RunStatus;
use std::time::Duration;
use thiserror::Error;

/// Structured error context for configuration and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "provider.api_key", "run.import_id")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "provider_config", "run_resource")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the provider runtime.
///
/// Upstream failures are split at the transport boundary: anything that produced
/// an HTTP response with a non-2xx status becomes [`Error::Api`], anything that
/// never got a response becomes [`Error::Transport`]. Retry and run-polling
/// outcomes get their own variants so callers can tell "gave up" from
/// "upstream rejected" without inspecting messages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("error communicating with OpenAI API: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Api(ApiError),

    #[error("operation failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<Error> },

    #[error("run {run_id} failed with status {status}: {reason}")]
    RunFailed {
        run_id: String,
        status: RunStatus,
        reason: String,
    },

    #[error("run {run_id} requires action, but automatic tool-output submission is not supported by this provider")]
    RunRequiresAction { run_id: String },

    #[error("run {run_id} did not complete within {timeout:?} (last status: {last_status})")]
    RunTimeout {
        run_id: String,
        timeout: Duration,
        last_status: RunStatus,
    },

    #[error("run {run_id} reported unknown run status '{status}'")]
    UnknownRunStatus { run_id: String, status: String },

    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The upstream API error behind this error, looking through retry exhaustion.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            Error::RetriesExhausted { last, .. } => last.api_error(),
            _ => None,
        }
    }

    /// True when the upstream answered 404; adapters use this to drop resources from state.
    pub fn is_not_found(&self) -> bool {
        self.api_error().map(|e| e.status == 404).unwrap_or(false)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ApiError {
        ApiError {
            status,
            kind: "invalid_request_error".to_string(),
            code: None,
            message: "nope".to_string(),
        }
    }

    #[test]
    fn test_not_found_looks_through_exhaustion() {
        let direct = Error::Api(api(404));
        assert!(direct.is_not_found());

        let wrapped = Error::RetriesExhausted {
            attempts: 3,
            last: Box::new(Error::Api(api(404))),
        };
        assert!(wrapped.is_not_found());
        assert!(!Error::Api(api(400)).is_not_found());
    }

    #[test]
    fn test_context_formatting() {
        let err = Error::configuration_with_context(
            "missing api key",
            ErrorContext::new()
                .with_field_path("provider.api_key")
                .with_source("provider_config"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing api key"));
        assert!(msg.contains("field: provider.api_key"));
        assert!(msg.contains("source: provider_config"));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("provider.api_key")
        );
    }

    #[test]
    fn test_exhaustion_message_mentions_attempts() {
        let err = Error::RetriesExhausted {
            attempts: 5,
            last: Box::new(Error::Api(api(503))),
        };
        assert!(err.to_string().contains("after 5 attempts"));
    }
}
