use chrono::Utc;
use secrecy::ExposeSecret;

use crate::config::Bunny;

use super::{MediaUploader, UploadError, UploadFile, validate_file_url};

/// Writes raw bytes straight into a storage zone and derives the CDN URL.
pub struct BunnyStorageUploader {
    client: reqwest::Client,
    config: Bunny,
}

impl BunnyStorageUploader {
    pub fn new(client: reqwest::Client, config: Bunny) -> Self {
        Self { client, config }
    }
}

fn folder_for(content_type: Option<&str>) -> &'static str {
    match content_type.and_then(|ct| ct.split('/').next()) {
        Some("image") => "images",
        Some("audio") => "audio",
        Some("video") => "video",
        _ => "files",
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// `{folder}/{millis}_{name}`; the same path addresses storage and CDN.
pub(crate) fn object_path(file: &UploadFile, millis: i64) -> String {
    format!(
        "{}/{}_{}",
        folder_for(file.content_type.as_deref()),
        millis,
        sanitize_file_name(&file.file_name)
    )
}

#[async_trait::async_trait]
impl MediaUploader for BunnyStorageUploader {
    #[tracing::instrument(name = "upload to storage zone", skip_all, fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload(&self, file: UploadFile) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::MissingFile);
        }

        let path = object_path(&file, Utc::now().timestamp_millis());
        let storage_url = format!(
            "{}/{}/{}",
            self.config.storage_endpoint.trim_end_matches('/'),
            self.config.storage_zone,
            path
        );

        let response = self
            .client
            .put(&storage_url)
            .header("AccessKey", self.config.access_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(file.bytes)
            .send()
            .await
            .map_err(UploadError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Storage zone rejected file");
            return Err(UploadError::Rejected(format!(
                "Storage rejected upload with status {}",
                status.as_u16()
            )));
        }

        validate_file_url(&format!(
            "{}/{}",
            self.config.cdn_base_url.trim_end_matches('/'),
            path
        ))
    }
}
