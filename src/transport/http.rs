use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection and authentication settings for the pooled HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub api_key: String,
    pub organization: Option<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Idle connections kept per host. The client talks to a single host, so this
    /// is also the effective total.
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            organization: None,
            timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 5,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Single-attempt JSON transport for the OpenAI REST API.
///
/// Every non-2xx response is converted into [`ApiError`] here, so nothing above
/// this layer has to look at raw status codes or bodies.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(cfg: &TransportConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .map_err(|_| TransportError::Other("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        if let Some(org) = cfg.organization.as_deref().filter(|o| !o.is_empty()) {
            let value = HeaderValue::from_str(org).map_err(|_| {
                TransportError::Other("organization is not a valid header value".into())
            })?;
            headers.insert("OpenAI-Organization", value);
        }
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.timeout)
            .pool_max_idle_per_host(cfg.pool_max_idle_per_host)
            .pool_idle_timeout(Some(cfg.pool_idle_timeout))
            .user_agent(concat!("terraform-provider-openai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send("GET", path, self.client.get(self.url(path))).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let req = self.client.get(self.url(path)).query(query);
        self.send("GET", path, req).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.post(self.url(path)).json(body);
        self.send("POST", path, req).await
    }

    /// POST without a body (cancel endpoints).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send("POST", path, self.client.post(self.url(path))).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let req = self.client.post(self.url(path)).multipart(form);
        self.send("POST", path, req).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send("DELETE", path, self.client.delete(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T> {
        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let resp = req
            .header("X-Client-Request-Id", &client_request_id)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status();
        let upstream_request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        debug!(
            method,
            path,
            http_status = status.as_u16(),
            client_request_id = client_request_id.as_str(),
            upstream_request_id = upstream_request_id.as_deref().unwrap_or(""),
            duration_ms = start.elapsed().as_millis() as u64,
            "openai request finished"
        );

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api(ApiError::from_response(status.as_u16(), &body)));
        }

        let bytes = resp.bytes().await.map_err(TransportError::Http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Structured error returned by the upstream API for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Upstream error `type` (e.g. "invalid_request_error", "server_error").
    pub kind: String,
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    /// Build from a status code and raw body, accepting the
    /// `{"error": {"message", "type", "code"}}` envelope or anything else.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("error").cloned());

        match envelope {
            Some(serde_json::Value::Object(obj)) => {
                let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::to_string);
                let code = match obj.get("code") {
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };
                Self {
                    status,
                    kind: text("type").unwrap_or_default(),
                    code,
                    message: text("message").unwrap_or_default(),
                }
            }
            Some(serde_json::Value::String(message)) => Self {
                status,
                kind: String::new(),
                code: None,
                message,
            },
            _ => Self {
                status,
                kind: String::new(),
                code: None,
                message: body.trim().to_string(),
            },
        }
    }

    pub fn is_retryable(&self) -> bool {
        crate::resilience::classify::is_retryable_api_error(self)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == 429 {
            return write!(
                f,
                "OpenAI API rate limit exceeded: {}. Please retry after a short delay",
                self.message
            );
        }
        write!(
            f,
            "OpenAI API error (type: {}, code: {}, status: {}): {}",
            self.kind,
            self.code.as_deref().unwrap_or("none"),
            self.status,
            self.message
        )
    }
}
