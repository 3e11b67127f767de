use super::{found, ignore_not_found, ManagedResource};
use crate::client::OpenAiClient;
use crate::types::{FileObject, FileUpload};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// Where the file contents come from. Exactly one must be set.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    pub purpose: String,
    /// Inline contents; requires `filename`.
    pub content: Option<String>,
    pub filename: Option<String>,
    /// Path on local disk; the upload is named after the file.
    pub file_path: Option<String>,
}

impl FileConfig {
    async fn to_upload(&self) -> Result<FileUpload> {
        match (&self.content, &self.file_path) {
            (Some(content), None) => {
                let filename = self.filename.clone().ok_or_else(|| {
                    Error::validation_with_context(
                        "filename is required when content is given inline",
                        ErrorContext::new()
                            .with_field_path("filename")
                            .with_source("openai_file"),
                    )
                })?;
                Ok(FileUpload::new(filename, self.purpose.clone(), content.clone().into_bytes()))
            }
            (None, Some(path)) => {
                let mut upload = FileUpload::from_path(path, self.purpose.clone()).await?;
                if let Some(name) = &self.filename {
                    upload.filename = name.clone();
                }
                Ok(upload)
            }
            _ => Err(Error::validation_with_context(
                "exactly one of content or file_path must be set",
                ErrorContext::new()
                    .with_field_path("content")
                    .with_source("openai_file"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileState {
    pub id: String,
    pub filename: String,
    pub purpose: String,
    pub bytes: u64,
    pub created_at: i64,
    pub status: Option<String>,
}

impl From<FileObject> for FileState {
    fn from(f: FileObject) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            purpose: f.purpose,
            bytes: f.bytes,
            created_at: f.created_at,
            status: f.status,
        }
    }
}

pub struct FileResource;

#[async_trait]
impl ManagedResource for FileResource {
    type Config = FileConfig;
    type State = FileState;

    fn type_name(&self) -> &'static str {
        "openai_file"
    }

    async fn create(&self, client: &OpenAiClient, config: &FileConfig) -> Result<FileState> {
        let upload = config.to_upload().await?;
        Ok(client.upload_file(&upload).await?.into())
    }

    async fn read(&self, client: &OpenAiClient, state: &FileState) -> Result<Option<FileState>> {
        Ok(found(client.get_file(&state.id).await)?.map(Into::into))
    }

    /// Files are immutable upstream: upload the new contents, then remove the
    /// old file.
    async fn update(&self, client: &OpenAiClient, state: &FileState, config: &FileConfig) -> Result<FileState> {
        let new_state = self.create(client, config).await?;
        info!(old_file_id = %state.id, new_file_id = %new_state.id, "replaced file");
        if let Err(e) = ignore_not_found(client.delete_file(&state.id).await) {
            warn!(file_id = %state.id, error = %e, "failed to delete replaced file");
        }
        Ok(new_state)
    }

    async fn delete(&self, client: &OpenAiClient, state: &FileState) -> Result<()> {
        ignore_not_found(client.delete_file(&state.id).await)
    }

    async fn import(&self, client: &OpenAiClient, import_id: &str) -> Result<Option<FileState>> {
        Ok(found(client.get_file(import_id).await)?.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_source_must_be_exactly_one() {
        let both = FileConfig {
            purpose: "assistants".into(),
            content: Some("x".into()),
            filename: Some("a.txt".into()),
            file_path: Some("/tmp/a.txt".into()),
        };
        assert!(both.to_upload().await.is_err());

        let neither = FileConfig {
            purpose: "assistants".into(),
            ..Default::default()
        };
        assert!(neither.to_upload().await.is_err());

        let inline = FileConfig {
            purpose: "assistants".into(),
            content: Some("hello".into()),
            filename: Some("hello.txt".into()),
            file_path: None,
        };
        let upload = inline.to_upload().await.unwrap();
        assert_eq!(upload.content, b"hello");
        assert_eq!(upload.filename, "hello.txt");
    }

    #[tokio::test]
    async fn test_upload_from_path_uses_file_name() {
        let dir = std::env::temp_dir().join(format!("openai-file-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("train.jsonl");
        tokio::fs::write(&path, b"{}\n").await.unwrap();

        let cfg = FileConfig {
            purpose: "fine-tune".into(),
            file_path: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let upload = cfg.to_upload().await.unwrap();
        assert_eq!(upload.filename, "train.jsonl");
        assert_eq!(upload.content, b"{}\n");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
