use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::{Upload, UploadMode};

mod bunny;
mod gateway;

pub use bunny::BunnyStorageUploader;
pub use gateway::GatewayUploader;

/// A file received from the console, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,
    #[error("Unreadable upload: {0}")]
    Multipart(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Upload service is unreachable")]
    Network(#[source] reqwest::Error),
    #[error("Upload service returned an invalid file URL: {0}")]
    InvalidUrl(String),
    #[error("Upload storage is not configured")]
    NotConfigured,
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFile | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
            UploadError::Rejected(_) | UploadError::Network(_) | UploadError::InvalidUrl(_) => {
                StatusCode::BAD_GATEWAY
            }
            UploadError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait::async_trait]
pub trait MediaUploader: Send + Sync {
    /// Stores the file and returns its public URL.
    async fn upload(&self, file: UploadFile) -> Result<String, UploadError>;
}

pub type SharedUploader = Arc<dyn MediaUploader>;

/// Accepts only absolute http(s) URLs.
pub fn validate_file_url(raw: &str) -> Result<String, UploadError> {
    let parsed = url::Url::parse(raw).map_err(|_| UploadError::InvalidUrl(raw.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed.to_string()),
        _ => Err(UploadError::InvalidUrl(raw.to_string())),
    }
}

pub fn build_uploader(
    config: &Upload,
    client: reqwest::Client,
) -> Result<SharedUploader, UploadError> {
    match config.mode {
        UploadMode::Gateway => Ok(Arc::new(GatewayUploader::new(
            client,
            config.gateway_url.clone(),
        ))),
        UploadMode::Bunny => {
            let bunny = config.bunny.clone().ok_or(UploadError::NotConfigured)?;
            Ok(Arc::new(BunnyStorageUploader::new(client, bunny)))
        }
    }
}
