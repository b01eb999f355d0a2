use std::borrow::Cow;

use axum::extract::multipart::Field;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::{ValidateUrl, ValidationError, ValidationErrors};

use crate::upload::{UploadError, UploadFile};

pub mod books;
pub mod categories;
pub mod chapters;
pub mod club;
pub mod errors;
pub mod home;
pub mod me;
pub mod notifications;
pub mod series;
pub mod site_content;
pub mod stats;
pub mod uploads;
pub mod users;

/// `?expectedVersion=` carried by writes that must not clobber a newer copy.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct VersionQuery {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub expected_version: Option<i64>,
}

pub(crate) fn check(
    errors: &mut ValidationErrors,
    valid: bool,
    field: &'static str,
    code: &'static str,
    message: &'static str,
) {
    if !valid {
        errors.add(
            field,
            ValidationError::new(code).with_message(Cow::from(message)),
        );
    }
}

pub(crate) fn is_url_or_empty(value: &str) -> bool {
    value.is_empty() || value.validate_url()
}

pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if !errors.errors().is_empty() {
        return Err(errors);
    }

    Ok(())
}

pub(crate) async fn read_file(field: Field<'_>) -> Result<UploadFile, UploadError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?;

    Ok(UploadFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}
