//! HTTP transport: pooled client construction and the error boundary.

mod http;

pub use http::{ApiError, HttpTransport, TransportConfig, TransportError, DEFAULT_BASE_URL};
