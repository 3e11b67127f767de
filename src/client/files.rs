use crate::client::core::OpenAiClient;
use crate::types::{DeletionStatus, FileObject, FileUpload};
use crate::Result;
use reqwest::multipart::{Form, Part};
use tracing::info;

impl OpenAiClient {
    /// Upload a file as `multipart/form-data`.
    ///
    /// The form is rebuilt for every attempt since a sent body cannot be reused.
    pub async fn upload_file(&self, upload: &FileUpload) -> Result<FileObject> {
        let transport = self.transport.as_ref();
        let file: FileObject = self
            .executor
            .execute_mutation(&self.cancel, move || async move {
                let part = Part::bytes(upload.content.clone()).file_name(upload.filename.clone());
                let form = Form::new()
                    .text("purpose", upload.purpose.clone())
                    .part("file", part);
                transport.post_multipart::<FileObject>("/files", form).await
            })
            .await?;
        info!(file_id = %file.id, filename = %file.filename, bytes = file.bytes, "uploaded file");
        Ok(file)
    }

    pub async fn get_file(&self, file_id: &str) -> Result<FileObject> {
        self.get_json(&format!("/files/{}", file_id)).await
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<DeletionStatus> {
        self.delete_json(&format!("/files/{}", file_id)).await
    }
}
