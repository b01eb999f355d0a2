use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationErrors};

use crate::{
    auth::Principal,
    controllers::{VersionQuery, check, into_result, is_url_or_empty},
    db::{
        Stored,
        club::{create_post, delete_post, list_posts, toggle_like, update_post},
    },
    error::Error,
    model::{
        Post,
        club::{DEFAULT_AUTHOR_NAME, DEFAULT_AVATAR_URL},
    },
    state::SharedAppState,
};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Validate for PostRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.description.trim().is_empty(),
            "description",
            "description_required",
            "Description is required",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.image_url),
            "imageUrl",
            "image_url",
            "Image must be an uploaded file URL",
        );

        into_result(errors)
    }
}

impl PostRequest {
    fn into_post(self, author: &Principal) -> Post {
        Post {
            description: self.description.trim().to_string(),
            image_url: self.image_url,
            author_name: author
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            author_avatar_url: author
                .picture
                .clone()
                .filter(|picture| !picture.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            scheduled_at: self.scheduled_at,
            likes: 0,
            liked_by: Vec::new(),
            comments: 0,
        }
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub post: Stored<Post>,
}

#[tracing::instrument(name = "[GET] club/posts", skip_all)]
pub async fn index(State(app_state): State<SharedAppState>) -> Result<Json<Vec<Stored<Post>>>, Error> {
    let result = list_posts(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] club/posts", skip_all)]
pub async fn store(
    Extension(principal): Extension<Arc<Principal>>,
    State(app_state): State<SharedAppState>,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<Stored<Post>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let post = request.into_post(&principal);
    let result = create_post(app_state.store.as_ref(), &post).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[PUT] club/posts/{id}", skip_all, fields(path.id = %id))]
pub async fn update(
    Extension(principal): Extension<Arc<Principal>>,
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<PostRequest>,
) -> Result<Json<Stored<Post>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let result = update_post(
        app_state.store.as_ref(),
        &id,
        request.into_post(&principal),
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[DELETE] club/posts/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_post(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "[POST] club/posts/{id}/like", skip_all, fields(path.id = %id))]
pub async fn like(
    Extension(principal): Extension<Arc<Principal>>,
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, Error> {
    let (post, liked) = toggle_like(app_state.store.as_ref(), &id, &principal.uid).await?;

    Ok(Json(LikeResponse { liked, post }))
}
