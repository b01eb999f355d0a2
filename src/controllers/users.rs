use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::{Validate, ValidateEmail, ValidationErrors};

use crate::{
    db::{
        Stored,
        users::{
            DEFAULT_PAGE_SIZE, UserCursor, UserPage, create_user, delete_user, get_user, list_users,
            update_user,
        },
    },
    error::Error,
    model::User,
    state::SharedAppState,
};

use super::{VersionQuery, check, into_result, is_url_or_empty};

#[derive(serde::Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    after: Option<String>,
    after_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(range(min = 1, max = 100))]
    limit: Option<usize>,
}

#[derive(serde::Deserialize, Debug)]
pub struct UserRequest {
    #[serde(flatten)]
    pub user: User,
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            self.user.email.validate_email(),
            "email",
            "email_email",
            "Incorrect email format",
        );
        check(
            &mut errors,
            !self.user.uid.trim().is_empty(),
            "uid",
            "uid_required",
            "Uid is required",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.user.profile_image),
            "profileImage",
            "profile_image_url",
            "Profile image must be an uploaded file URL",
        );

        into_result(errors)
    }
}

#[tracing::instrument(name = "[GET] users", skip_all, fields(parameters))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<UserPage>, Error> {
    pagination.validate().map_err(Error::Validation)?;

    let limit = pagination.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let cursor = pagination.after.map(|email| UserCursor {
        email,
        id: pagination.after_id,
    });
    let result = list_users(app_state.store.as_ref(), cursor.as_ref(), limit).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] users/{id}", skip_all, fields(path.id = %id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<User>>, Error> {
    let result = get_user(app_state.store.as_ref(), &id).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] users", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<Stored<User>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let result = create_user(app_state.store.as_ref(), request.user).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[PUT] users/{id}", skip_all, fields(path.id = %id))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<UserRequest>,
) -> Result<Json<Stored<User>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let result = update_user(
        app_state.store.as_ref(),
        &id,
        request.user,
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[DELETE] users/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_user(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
