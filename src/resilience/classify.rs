//! Retryability classification for upstream failures.

use crate::transport::ApiError;
use crate::Error;

/// Upstream error types that are transient regardless of the status code.
const TRANSIENT_ERROR_TYPES: &[&str] = &["server_error", "timeout"];

/// Decide whether a failed call is worth retrying.
///
/// Only structured API errors are considered; network failures, decode errors
/// and everything else are left to the caller.
pub fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Api(api) => is_retryable_api_error(api),
        _ => false,
    }
}

pub fn is_retryable_api_error(err: &ApiError) -> bool {
    match err.status {
        429 => true,
        500..=599 => true,
        _ => TRANSIENT_ERROR_TYPES.contains(&err.kind.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    fn api(status: u16, kind: &str) -> Error {
        Error::Api(ApiError {
            status,
            kind: kind.to_string(),
            code: None,
            message: "test".to_string(),
        })
    }

    #[test]
    fn test_classification_table() {
        let cases: Vec<(Error, bool)> = vec![
            (api(429, "requests"), true),
            (api(500, ""), true),
            (api(502, "invalid_request_error"), true),
            (api(503, ""), true),
            (api(599, ""), true),
            (api(600, ""), false),
            (api(499, ""), false),
            (api(400, "server_error"), true),
            (api(408, "timeout"), true),
            (api(400, "invalid_request_error"), false),
            (api(401, "authentication_error"), false),
            (api(403, ""), false),
            (api(404, "invalid_request_error"), false),
            (api(409, "conflict"), false),
            (Error::Transport(TransportError::Other("dns".into())), false),
            (Error::Cancelled { operation: "call" }, false),
        ];

        for (err, expected) in cases {
            assert_eq!(is_retryable(&err), expected, "classification of {:?}", err);
        }
    }

    #[test]
    fn test_exhaustion_is_not_retryable() {
        let err = Error::RetriesExhausted {
            attempts: 3,
            last: Box::new(api(503, "")),
        };
        assert!(!is_retryable(&err));
    }
}
