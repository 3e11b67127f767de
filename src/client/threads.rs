//! Threads and the messages inside them.

use crate::client::core::OpenAiClient;
use crate::types::{
    CreateMessageRequest, CreateThreadRequest, DeletionStatus, ListResponse, Message,
    ModifyMessageRequest, ModifyThreadRequest, Thread,
};
use crate::Result;
use tracing::info;

/// Paging and filtering for [`OpenAiClient::list_messages`].
#[derive(Debug, Clone, Default)]
pub struct ListMessagesQuery {
    pub limit: Option<u32>,
    /// `asc` or `desc`; the upstream default is `desc`.
    pub order: Option<String>,
    pub after: Option<String>,
    pub run_id: Option<String>,
}

impl ListMessagesQuery {
    /// Newest assistant output of a run first.
    pub fn latest_for_run(run_id: impl Into<String>) -> Self {
        Self {
            limit: Some(1),
            order: Some("desc".to_string()),
            after: None,
            run_id: Some(run_id.into()),
        }
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(limit) = self.limit {
            q.push(("limit", limit.to_string()));
        }
        if let Some(order) = &self.order {
            q.push(("order", order.clone()));
        }
        if let Some(after) = &self.after {
            q.push(("after", after.clone()));
        }
        if let Some(run_id) = &self.run_id {
            q.push(("run_id", run_id.clone()));
        }
        q
    }
}

impl OpenAiClient {
    pub async fn create_thread(&self, req: &CreateThreadRequest) -> Result<Thread> {
        let thread: Thread = self.create_json("/threads", req).await?;
        info!(thread_id = %thread.id, "created thread");
        Ok(thread)
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        self.get_json(&format!("/threads/{}", thread_id)).await
    }

    pub async fn update_thread(&self, thread_id: &str, req: &ModifyThreadRequest) -> Result<Thread> {
        self.update_json(&format!("/threads/{}", thread_id), req).await
    }

    pub async fn delete_thread(&self, thread_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/threads/{}", thread_id)).await
    }

    pub async fn create_message(&self, thread_id: &str, req: &CreateMessageRequest) -> Result<Message> {
        let message: Message = self
            .create_json(&format!("/threads/{}/messages", thread_id), req)
            .await?;
        info!(thread_id, message_id = %message.id, "created message");
        Ok(message)
    }

    pub async fn get_message(&self, thread_id: &str, message_id: &str) -> Result<Message> {
        self.get_json(&format!("/threads/{}/messages/{}", thread_id, message_id))
            .await
    }

    pub async fn update_message(
        &self,
        thread_id: &str,
        message_id: &str,
        req: &ModifyMessageRequest,
    ) -> Result<Message> {
        self.update_json(&format!("/threads/{}/messages/{}", thread_id, message_id), req)
            .await
    }

    pub async fn delete_message(&self, thread_id: &str, message_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/threads/{}/messages/{}", thread_id, message_id))
            .await
    }

    pub async fn list_messages(&self, thread_id: &str, query: &ListMessagesQuery) -> Result<Vec<Message>> {
        let pairs = query.to_pairs();
        let page: ListResponse<Message> = self
            .get_json_with_query(&format!("/threads/{}/messages", thread_id), &pairs)
            .await?;
        Ok(page.data)
    }
}
