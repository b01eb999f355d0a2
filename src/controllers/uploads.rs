use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::{error::Error, state::SharedAppState, upload::UploadError};

use super::read_file;

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
}

/// Forwards the multipart `file` field to media storage.
#[tracing::instrument(name = "[POST] uploads", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file = read_file(field).await?;
        if file.bytes.is_empty() {
            return Err(UploadError::MissingFile.into());
        }
        tracing::info!(file_name = %file.file_name, size = file.bytes.len(), "Uploading file");

        let file_url = app_state.uploader.upload(file).await?;

        return Ok(Json(UploadResponse { file_url }));
    }

    Err(UploadError::MissingFile.into())
}
