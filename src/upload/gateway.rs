use reqwest::multipart::{Form, Part};

use super::{MediaUploader, UploadError, UploadFile, validate_file_url};

#[derive(serde::Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GatewayResponse {
    file_url: Option<String>,
    message: Option<String>,
}

/// Posts the file as multipart `file` to an upload endpoint answering `{ fileUrl }`.
pub struct GatewayUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl GatewayUploader {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl MediaUploader for GatewayUploader {
    #[tracing::instrument(name = "upload via gateway", skip_all, fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload(&self, file: UploadFile) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::MissingFile);
        }

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::Network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(UploadError::Network)?;
        let parsed: GatewayResponse = serde_json::from_slice(&body).unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(%status, "Upload gateway rejected file");
            return Err(UploadError::Rejected(
                parsed.message.unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }

        match parsed.file_url {
            Some(file_url) => validate_file_url(&file_url),
            None => Err(UploadError::InvalidUrl(String::from_utf8_lossy(&body).into_owned())),
        }
    }
}
