use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::{Validate, ValidationErrors};

use crate::{
    controllers::{VersionQuery, check, into_result, is_url_or_empty},
    db::{
        Stored,
        club::{create_bonus_scene, delete_bonus_scene, list_bonus_scenes, update_bonus_scene},
    },
    error::Error,
    model::BonusScene,
    state::SharedAppState,
};

#[derive(serde::Deserialize, Debug)]
pub struct BonusSceneRequest {
    #[serde(flatten)]
    pub scene: BonusScene,
}

impl Validate for BonusSceneRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            is_url_or_empty(&self.scene.image_url),
            "imageUrl",
            "image_url",
            "Image must be an uploaded file URL",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.scene.audio_url),
            "audioUrl",
            "audio_url",
            "Audio must be an uploaded file URL",
        );

        into_result(errors)
    }
}

#[tracing::instrument(name = "[GET] club/bonus-scenes", skip_all)]
pub async fn index(
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<Stored<BonusScene>>>, Error> {
    let result = list_bonus_scenes(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] club/bonus-scenes", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<BonusSceneRequest>,
) -> Result<(StatusCode, Json<Stored<BonusScene>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let result = create_bonus_scene(app_state.store.as_ref(), &request.scene).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[PUT] club/bonus-scenes/{id}", skip_all, fields(path.id = %id))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<BonusSceneRequest>,
) -> Result<Json<Stored<BonusScene>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let result = update_bonus_scene(
        app_state.store.as_ref(),
        &id,
        request.scene,
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[DELETE] club/bonus-scenes/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_bonus_scene(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
