//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use terraform_provider_openai::polling::PollOptions;
use terraform_provider_openai::resilience::{FixedJitter, RetryMode, RetryPolicy};
use terraform_provider_openai::{OpenAiClient, OpenAiClientBuilder};

pub const TEST_API_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Builder pointed at the mock server with short, deterministic backoff.
    pub fn client_builder(&self) -> OpenAiClientBuilder {
        OpenAiClient::builder(TEST_API_KEY)
            .base_url_override(&self.base_url)
            .retry_policy(RetryPolicy::new(
                3,
                Duration::from_millis(10),
                Duration::from_millis(50),
            ))
            .jitter(Arc::new(FixedJitter(1.0)))
            .poll_options(PollOptions::new(
                Duration::from_millis(20),
                Duration::from_secs(5),
            ))
    }

    pub fn client(&self) -> OpenAiClient {
        self.client_builder().build().expect("client")
    }

    pub fn client_with_mode(&self, mode: RetryMode) -> OpenAiClient {
        self.client_builder()
            .retry_mode(mode)
            .build()
            .expect("client")
    }

    /// JSON response for `method path`.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Like [`mock_json`](Self::mock_json) but ignores the query string.
    pub async fn mock_json_any_query(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Same response served exactly `hits` times.
    pub async fn mock_json_times(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &str,
        hits: usize,
    ) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }
}

pub fn error_body(kind: &str, message: &str) -> String {
    serde_json::json!({
        "error": {"message": message, "type": kind, "param": null, "code": null}
    })
    .to_string()
}

pub fn run_body(status: &str) -> String {
    serde_json::json!({
        "id": "run_1",
        "object": "thread.run",
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status,
        "created_at": 1700000000,
        "model": "gpt-4o-mini"
    })
    .to_string()
}

pub fn assistant_body(id: &str, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "object": "assistant",
        "created_at": 1700000000,
        "name": name,
        "model": "gpt-4o-mini",
        "instructions": "be brief",
        "tools": [{"type": "code_interpreter"}],
        "tool_resources": {"code_interpreter": {"file_ids": ["file-1"]}},
        "metadata": {}
    })
    .to_string()
}
