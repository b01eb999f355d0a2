use axum::{Json, http::StatusCode, response::IntoResponse};
use validator::ValidationErrors;

use crate::{
    auth::error::AuthError, db::error::DatabaseError, model::error::ContentError,
    notify::DispatchError, upload::UploadError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error")]
    Database(DatabaseError),

    #[error("Auth error")]
    Auth(AuthError),

    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Content(ContentError),

    #[error("Upload error")]
    Upload(UploadError),

    #[error("Notification dispatch error")]
    Dispatch(DispatchError),

    #[error("Other error: {0}")]
    Other(anyhow::Error),
}

impl From<DatabaseError> for Error {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}

impl From<ContentError> for Error {
    fn from(value: ContentError) -> Self {
        Self::Content(value)
    }
}

impl From<UploadError> for Error {
    fn from(value: UploadError) -> Self {
        Self::Upload(value)
    }
}

impl From<DispatchError> for Error {
    fn from(value: DispatchError) -> Self {
        Self::Dispatch(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Database(database_error) => match database_error {
                DatabaseError::NotFound => StatusCode::NOT_FOUND.into_response(),
                DatabaseError::AlreadyExists => {
                    (StatusCode::CONFLICT, database_error.to_string()).into_response()
                }
                DatabaseError::VersionConflict { .. } => {
                    tracing::warn!(err.msg = %database_error, "Stale write rejected");

                    (StatusCode::CONFLICT, database_error.to_string()).into_response()
                }
                DatabaseError::DatabaseError(ref error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Database Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                DatabaseError::Malformed { .. } => {
                    tracing::error!(err.msg = %database_error, err.details = ?database_error, "Malformed Document");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            Error::Auth(auth_error) => match auth_error {
                AuthError::TokenMissing => {
                    (StatusCode::UNAUTHORIZED, auth_error.to_string()).into_response()
                }
                AuthError::JwtError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "JWT Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                AuthError::Unauthenticated => StatusCode::UNAUTHORIZED.into_response(),
                AuthError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            },
            Error::Validation(validation_error) => {
                tracing::warn!(err.msg = %validation_error, err.details = ?validation_error, "Validation Error");

                (StatusCode::BAD_REQUEST, validation_error.to_string()).into_response()
            }
            Error::Content(content_error) => {
                (content_error.status_code(), content_error.to_string()).into_response()
            }
            Error::Upload(upload_error) => {
                tracing::error!(err.msg = %upload_error, err.details = ?upload_error, "Upload Error");

                (upload_error.status_code(), upload_error.to_string()).into_response()
            }
            Error::Dispatch(dispatch_error) => {
                tracing::error!(err.msg = %dispatch_error, err.details = ?dispatch_error, "Dispatch Error");

                let body = serde_json::json!({
                    "error": dispatch_error.to_string(),
                    "code": dispatch_error.code(),
                });

                (dispatch_error.status_code(), Json(body)).into_response()
            }
            Error::Other(error) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Other Error");

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
