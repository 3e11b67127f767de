use serde::{Deserialize, Serialize};

/// Uploaded file metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_details: Option<String>,
}

/// File contents to upload as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub purpose: String,
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, purpose: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            purpose: purpose.into(),
            content: content.into(),
        }
    }

    /// Read the contents from disk, naming the upload after the file.
    pub async fn from_path(path: impl AsRef<std::path::Path>, purpose: impl Into<String>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(filename, purpose, content))
    }
}
