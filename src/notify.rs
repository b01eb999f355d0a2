use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::multipart::{Form, Part};

use crate::upload::UploadFile;

pub const NO_DEVICES_REGISTERED: &str = "NO_DEVICES_REGISTERED";
pub const IMAGE_UPLOAD_FAILED: &str = "IMAGE_UPLOAD_FAILED";

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("No devices are registered to receive notifications")]
    NoDevices,
    #[error("Notification image could not be uploaded: {0}")]
    ImageUploadFailed(String),
    #[error("Dispatch service rejected the notification: {message}")]
    Rejected { code: Option<String>, message: String },
    #[error("Dispatch service is unreachable")]
    Network(#[source] reqwest::Error),
    #[error("Unreadable notification image: {0}")]
    Multipart(String),
}

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NoDevices => StatusCode::UNPROCESSABLE_ENTITY,
            DispatchError::Multipart(_) => StatusCode::BAD_REQUEST,
            DispatchError::ImageUploadFailed(_)
            | DispatchError::Rejected { .. }
            | DispatchError::Network(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The dispatch service's failure code, when it sent a recognized one.
    pub fn code(&self) -> Option<&str> {
        match self {
            DispatchError::NoDevices => Some(NO_DEVICES_REGISTERED),
            DispatchError::ImageUploadFailed(_) => Some(IMAGE_UPLOAD_FAILED),
            DispatchError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub title: String,
    pub body: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub image: Option<UploadFile>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct DispatchReceipt {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub message: String,
}

#[derive(serde::Deserialize, Default)]
struct DispatchFailure {
    error: Option<String>,
    code: Option<String>,
    details: Option<String>,
}

impl DispatchFailure {
    fn into_error(self, status: reqwest::StatusCode) -> DispatchError {
        let message = self
            .details
            .or(self.error)
            .unwrap_or_else(|| format!("status {}", status.as_u16()));

        match self.code.as_deref() {
            Some(NO_DEVICES_REGISTERED) => DispatchError::NoDevices,
            Some(IMAGE_UPLOAD_FAILED) => DispatchError::ImageUploadFailed(message),
            _ => DispatchError::Rejected {
                code: self.code,
                message,
            },
        }
    }
}

#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
}

pub type SharedDispatcher = Arc<dyn NotificationDispatcher>;

/// Client for the push dispatch service, which takes a multipart form with
/// `title`, `body`, an optional `scheduledAt` and an optional image `file`.
pub struct NotificationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl NotificationClient {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn form(request: DispatchRequest) -> Result<Form, DispatchError> {
        let mut form = Form::new()
            .text("title", request.title)
            .text("body", request.body);

        if let Some(scheduled_at) = request.scheduled_at {
            form = form.text(
                "scheduledAt",
                scheduled_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            );
        }

        if let Some(image) = request.image {
            let mut part = Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(content_type) = &image.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| DispatchError::Multipart(e.to_string()))?;
            }
            form = form.part("file", part);
        }

        Ok(form)
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for NotificationClient {
    #[tracing::instrument(name = "dispatch notification", skip_all, fields(title = %request.title, scheduled = request.scheduled_at.is_some()))]
    async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let form = Self::form(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(DispatchError::Network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(DispatchError::Network)?;

        if !status.is_success() {
            let failure: DispatchFailure = serde_json::from_slice(&body).unwrap_or_default();
            let error = failure.into_error(status);
            tracing::warn!(%status, code = ?error.code(), "Dispatch service rejected notification");
            return Err(error);
        }

        Ok(serde_json::from_slice(&body).unwrap_or(DispatchReceipt {
            data: serde_json::Value::Null,
            message: String::new(),
        }))
    }
}
