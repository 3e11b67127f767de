//! Create/read/update/delete/import through the resource adapters.

mod common;

use common::{assistant_body, error_body, MockServerFixture};
use terraform_provider_openai::resources::assistant::{
    AssistantConfig, AssistantResource, AssistantState, ToolDeclaration,
};
use terraform_provider_openai::resources::chat_completion::{ChatCompletionConfig, ChatCompletionResource};
use terraform_provider_openai::resources::data_sources::{
    AssistantDataSource, ChatCompletionDataSource, DataSource, ModelDataSource, ModelQuery,
    ModelsDataSource, ModelsQuery, VectorStoreDataSource,
};
use terraform_provider_openai::resources::embedding::{embedding_id, EmbeddingConfig, EmbeddingResource};
use terraform_provider_openai::resources::file::{FileConfig, FileResource};
use terraform_provider_openai::resources::fine_tuning::{FineTuningJobResource, FineTuningJobState};
use terraform_provider_openai::resources::message::MessageResource;
use terraform_provider_openai::resources::thread::{ThreadConfig, ThreadResource};
use terraform_provider_openai::resources::vector_store_file::VectorStoreFileResource;
use terraform_provider_openai::resources::ManagedResource;
use terraform_provider_openai::types::{AssistantTool, ChatMessage};
use terraform_provider_openai::Error;

#[tokio::test]
async fn test_assistant_crud() {
    let mut fixture = MockServerFixture::new().await;
    let created = fixture
        .server
        .mock("POST", "/v1/assistants")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "name": "bot",
            "tools": [{"type": "code_interpreter"}],
            "tool_resources": {"code_interpreter": {"file_ids": ["file-1"]}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(assistant_body("asst_1", "bot"))
        .create_async()
        .await;
    let updated = fixture
        .mock_json("POST", "/v1/assistants/asst_1", 200, &assistant_body("asst_1", "renamed"))
        .await;
    let deleted = fixture
        .mock_json(
            "DELETE",
            "/v1/assistants/asst_1",
            200,
            r#"{"id":"asst_1","object":"assistant.deleted","deleted":true}"#,
        )
        .await;
    let client = fixture.client();

    let mut cfg = AssistantConfig {
        model: "gpt-4o-mini".into(),
        name: Some("bot".into()),
        instructions: Some("be brief".into()),
        tools: vec![ToolDeclaration::new("code_interpreter")],
        file_ids: vec!["file-1".into()],
        ..Default::default()
    };
    let state = AssistantResource.create(&client, &cfg).await.unwrap();
    assert_eq!(state.id, "asst_1");
    assert_eq!(state.tools, vec![AssistantTool::CodeInterpreter]);
    assert_eq!(state.file_ids, vec!["file-1"]);

    cfg.name = Some("renamed".into());
    let state = AssistantResource.update(&client, &state, &cfg).await.unwrap();
    assert_eq!(state.name.as_deref(), Some("renamed"));

    AssistantResource.delete(&client, &state).await.unwrap();

    created.assert_async().await;
    updated.assert_async().await;
    deleted.assert_async().await;
}

#[tokio::test]
async fn test_missing_assistant_is_dropped_from_state() {
    let mut fixture = MockServerFixture::new().await;
    let not_found = error_body("invalid_request_error", "No assistant found with id 'asst_1'.");
    let read = fixture
        .mock_json_times("GET", "/v1/assistants/asst_1", 404, &not_found, 2)
        .await;
    fixture
        .mock_json("DELETE", "/v1/assistants/asst_1", 404, &not_found)
        .await;
    let client = fixture.client();

    let imported = AssistantResource.import(&client, "asst_1").await.unwrap();
    assert!(imported.is_none());

    let assistant: terraform_provider_openai::types::Assistant =
        serde_json::from_str(&assistant_body("asst_1", "bot")).unwrap();
    let state = AssistantState::from(assistant);
    assert!(AssistantResource.read(&client, &state).await.unwrap().is_none());
    AssistantResource.delete(&client, &state).await.unwrap();
    // 404 is not retryable: one request per call.
    read.assert_async().await;
}

#[tokio::test]
async fn test_file_update_reuploads_and_removes_old_file() {
    let mut fixture = MockServerFixture::new().await;
    let uploaded = fixture
        .server
        .mock("POST", "/v1/files")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(mockito::Matcher::Regex("assistants".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"file-new","object":"file","bytes":5,"created_at":1,"filename":"notes.txt","purpose":"assistants"}"#,
        )
        .create_async()
        .await;
    let removed = fixture
        .mock_json(
            "DELETE",
            "/v1/files/file-old",
            200,
            r#"{"id":"file-old","object":"file","deleted":true}"#,
        )
        .await;
    let client = fixture.client();

    let old = terraform_provider_openai::resources::file::FileState {
        id: "file-old".into(),
        filename: "notes.txt".into(),
        purpose: "assistants".into(),
        bytes: 3,
        created_at: 0,
        status: None,
    };
    let cfg = FileConfig {
        purpose: "assistants".into(),
        content: Some("hello".into()),
        filename: Some("notes.txt".into()),
        file_path: None,
    };
    let new_state = FileResource.update(&client, &old, &cfg).await.unwrap();

    assert_eq!(new_state.id, "file-new");
    uploaded.assert_async().await;
    removed.assert_async().await;
}

#[tokio::test]
async fn test_message_import_uses_thread_and_message_ids() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json(
            "GET",
            "/v1/threads/thread_1/messages/msg_1",
            200,
            r#"{"id":"msg_1","object":"thread.message","created_at":1,"thread_id":"thread_1","role":"user",
                "content":[{"type":"text","text":{"value":"What is 2+2?","annotations":[]}}],
                "attachments":[{"file_id":"file-1","tools":[{"type":"file_search"}]}]}"#,
        )
        .await;
    let client = fixture.client();

    let state = MessageResource
        .import(&client, "thread_1/msg_1")
        .await
        .unwrap()
        .expect("message exists");
    assert_eq!(state.content, "What is 2+2?");
    assert_eq!(state.file_ids, vec!["file-1"]);

    assert!(MessageResource.import(&client, "msg_1").await.is_err());
}

#[tokio::test]
async fn test_vector_store_file_import() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json(
            "GET",
            "/v1/vector_stores/vs_1/files/file-1",
            200,
            r#"{"id":"file-1","object":"vector_store.file","vector_store_id":"vs_1","created_at":1,"status":"completed","usage_bytes":10}"#,
        )
        .await;

    let state = VectorStoreFileResource
        .import(&fixture.client(), "vs_1/file-1")
        .await
        .unwrap()
        .expect("attached");
    assert_eq!(state.vector_store_id, "vs_1");
    assert_eq!(state.status, "completed");
}

fn job_state() -> FineTuningJobState {
    FineTuningJobState {
        id: "ftjob-1".into(),
        model: "gpt-4o-mini".into(),
        status: "running".into(),
        created_at: 0,
        finished_at: None,
        fine_tuned_model: None,
        organization_id: None,
        training_file_id: "file-1".into(),
        validation_file_id: None,
        result_files: Vec::new(),
    }
}

fn job_body(status: &str) -> String {
    serde_json::json!({
        "id": "ftjob-1",
        "object": "fine_tuning.job",
        "model": "gpt-4o-mini",
        "status": status,
        "created_at": 0,
        "training_file": "file-1",
        "hyperparameters": {"n_epochs": "auto"}
    })
    .to_string()
}

#[tokio::test]
async fn test_fine_tuning_delete_cancels_only_active_jobs() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_times("GET", "/v1/fine_tuning/jobs/ftjob-1", 200, &job_body("running"), 1)
        .await;
    fixture
        .mock_json("GET", "/v1/fine_tuning/jobs/ftjob-1", 200, &job_body("succeeded"))
        .await;
    let cancel = fixture
        .mock_json_times(
            "POST",
            "/v1/fine_tuning/jobs/ftjob-1/cancel",
            200,
            &job_body("cancelled"),
            1,
        )
        .await;
    let client = fixture.client();

    FineTuningJobResource.delete(&client, &job_state()).await.unwrap();
    // Second delete sees a finished job and leaves it alone.
    FineTuningJobResource.delete(&client, &job_state()).await.unwrap();

    cancel.assert_async().await;
}

#[tokio::test]
async fn test_chat_completion_state() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json(
            "POST",
            "/v1/chat/completions",
            200,
            r#"{"id":"chatcmpl-1","object":"chat.completion","created":1700000000,"model":"gpt-4o-mini",
                "choices":[{"index":0,"message":{"role":"assistant","content":"Hi!"},"finish_reason":"stop"}]}"#,
        )
        .await;
    let client = fixture.client();

    let cfg = ChatCompletionConfig {
        model: "gpt-4o-mini".into(),
        messages: vec![ChatMessage::new("user", "Hello")],
        ..Default::default()
    };
    let state = ChatCompletionResource.create(&client, &cfg).await.unwrap();
    assert_eq!(state.id, "chat-gpt-4o-mini-1700000000");
    assert_eq!(state.response_content, vec!["Hi!"]);
    assert_eq!(state.response_role.as_deref(), Some("assistant"));

    let empty = ChatCompletionConfig {
        model: "gpt-4o-mini".into(),
        ..Default::default()
    };
    assert!(matches!(
        ChatCompletionResource.create(&client, &empty).await,
        Err(Error::Validation { .. })
    ));
}

#[tokio::test]
async fn test_embedding_state() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json(
            "POST",
            "/v1/embeddings",
            200,
            r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,0.2]}],
                "model":"text-embedding-3-small","usage":{"prompt_tokens":1,"total_tokens":1}}"#,
        )
        .await;

    let cfg = EmbeddingConfig {
        model: "text-embedding-3-small".into(),
        input: "hello".into(),
        dimensions: None,
    };
    let state = EmbeddingResource.create(&fixture.client(), &cfg).await.unwrap();
    assert_eq!(state.id, embedding_id("text-embedding-3-small", "hello"));
    assert_eq!(state.embedding, vec![0.1, 0.2]);
    assert_eq!(state.prompt_tokens, 1);
}

#[tokio::test]
async fn test_model_data_sources() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json(
            "GET",
            "/v1/models/gpt-4o-mini",
            200,
            r#"{"id":"gpt-4o-mini","object":"model","created":1,"owned_by":"system"}"#,
        )
        .await;
    fixture
        .mock_json(
            "GET",
            "/v1/models",
            200,
            r#"{"object":"list","data":[
                {"id":"whisper-1","object":"model","created":1,"owned_by":"openai-internal"},
                {"id":"gpt-4o-mini","object":"model","created":1,"owned_by":"system"},
                {"id":"babbage-002","object":"model","created":1,"owned_by":"system"}]}"#,
        )
        .await;
    let client = fixture.client();

    let model = ModelDataSource
        .read(
            &client,
            &ModelQuery {
                model_id: "gpt-4o-mini".into(),
                filter_owner: Some("system".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(model.id, "gpt-4o-mini");

    let err = ModelDataSource
        .read(
            &client,
            &ModelQuery {
                model_id: "gpt-4o-mini".into(),
                filter_owner: Some("openai".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("owned by 'system'"));

    let models = ModelsDataSource
        .read(
            &client,
            &ModelsQuery {
                owned_by: Some("system".into()),
            },
        )
        .await
        .unwrap();
    let ids: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["babbage-002", "gpt-4o-mini"]);
}

#[tokio::test]
async fn test_assistant_and_vector_store_data_sources() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json("GET", "/v1/assistants/asst_9", 200, &assistant_body("asst_9", "lookup"))
        .await;
    fixture
        .mock_json(
            "GET",
            "/v1/vector_stores/vs_9",
            200,
            r#"{"id":"vs_9","object":"vector_store","created_at":5,"name":"docs",
                "status":"completed","usage_bytes":2048,
                "file_counts":{"in_progress":0,"completed":2,"failed":0,"cancelled":0,"total":2}}"#,
        )
        .await;
    fixture
        .mock_json("GET", "/v1/assistants/asst_gone", 404, &error_body("invalid_request_error", "No assistant found"))
        .await;
    let client = fixture.client();

    let assistant = AssistantDataSource
        .read(&client, &"asst_9".to_string())
        .await
        .unwrap();
    assert_eq!(assistant.id, "asst_9");
    assert_eq!(assistant.name.as_deref(), Some("lookup"));

    let store = VectorStoreDataSource
        .read(&client, &"vs_9".to_string())
        .await
        .unwrap();
    assert_eq!(store.name.as_deref(), Some("docs"));
    assert_eq!(store.file_counts.completed, 2);
    assert_eq!(store.usage_bytes, 2048);

    let err = AssistantDataSource
        .read(&client, &"asst_gone".to_string())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_thread_tool_resources_round_trip() {
    let mut fixture = MockServerFixture::new().await;
    let created = fixture
        .server
        .mock("POST", "/v1/threads")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "tool_resources": {
                "code_interpreter": {"file_ids": ["file-1"]},
                "file_search": {"vector_store_ids": ["vs_1"]}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"thread_1","object":"thread","created_at":10,"metadata":{},
                "tool_resources":{"code_interpreter":{"file_ids":["file-1"]},
                "file_search":{"vector_store_ids":["vs_1"]}}}"#,
        )
        .create_async()
        .await;
    let cleared = fixture
        .server
        .mock("POST", "/v1/threads/thread_1")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "tool_resources": {
                "code_interpreter": {"file_ids": []},
                "file_search": {"vector_store_ids": []}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"thread_1","object":"thread","created_at":10,"metadata":{},"tool_resources":{}}"#)
        .create_async()
        .await;
    let client = fixture.client();

    let cfg = ThreadConfig {
        file_ids: vec!["file-1".into()],
        vector_store_ids: vec!["vs_1".into()],
        ..Default::default()
    };
    let state = ThreadResource.create(&client, &cfg).await.unwrap();
    created.assert_async().await;
    assert_eq!(state.file_ids, vec!["file-1"]);
    assert_eq!(state.vector_store_ids, vec!["vs_1"]);

    let state = ThreadResource
        .update(&client, &state, &ThreadConfig::default())
        .await
        .unwrap();
    cleared.assert_async().await;
    assert!(state.file_ids.is_empty());
    assert!(state.vector_store_ids.is_empty());
}

#[tokio::test]
async fn test_chat_completion_data_source() {
    let mut fixture = MockServerFixture::new().await;
    let generated = fixture
        .server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "Say hi"}],
            "temperature": 0.5,
            "n": 1,
            "presence_penalty": 0.25,
            "frequency_penalty": -0.5,
            "logit_bias": {"50256": -100},
            "user": "tester"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"chatcmpl-7","object":"chat.completion","created":1700000001,"model":"gpt-4o-mini",
                "choices":[{"index":0,"message":{"role":"assistant","content":"Hi"},"finish_reason":"length"}],
                "usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#,
        )
        .create_async()
        .await;
    let client = fixture.client();

    let query = ChatCompletionConfig {
        model: "gpt-4o-mini".into(),
        messages: vec![ChatMessage::new("user", "Say hi")],
        temperature: Some(0.5),
        presence_penalty: Some(0.25),
        frequency_penalty: Some(-0.5),
        logit_bias: Some([("50256".to_string(), -100)].into_iter().collect()),
        user: Some("tester".into()),
        ..Default::default()
    };
    let out = ChatCompletionDataSource.read(&client, &query).await.unwrap();
    generated.assert_async().await;
    assert_eq!(out.id, "chatcmpl-7");
    assert_eq!(out.response_content, vec!["Hi"]);
    assert_eq!(out.choices[0].finish_reason.as_deref(), Some("length"));
    assert_eq!(out.usage.map(|u| u.total_tokens), Some(4));

    let err = ChatCompletionDataSource
        .read(
            &client,
            &ChatCompletionConfig {
                model: "gpt-4o-mini".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}
