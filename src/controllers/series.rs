use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::{Validate, ValidateUrl, ValidationErrors};

use crate::{
    db::{
        Stored,
        series::{
            create_episode, create_series, delete_episode, delete_series, edit_episode,
            get_series, list_series, reorder_episodes, update_series,
        },
    },
    error::Error,
    model::{Episode, EpisodeFields, Series},
    state::SharedAppState,
};

use super::{VersionQuery, chapters::ReorderRequest, check, into_result, is_url_or_empty};

#[derive(serde::Deserialize, Debug)]
pub struct SeriesRequest {
    #[serde(flatten)]
    pub series: Series,
}

impl Validate for SeriesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.series.title.trim().is_empty(),
            "title",
            "title_required",
            "Title is required",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.series.trailer_url),
            "trailerUrl",
            "trailer_url",
            "Trailer must be an uploaded file URL",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.series.thumbnail_url),
            "thumbnailUrl",
            "thumbnail_url",
            "Thumbnail must be an uploaded file URL",
        );

        into_result(errors)
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: u32,
}

impl Validate for EpisodeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.title.trim().is_empty(),
            "title",
            "title_required",
            "Episode title is required",
        );
        check(
            &mut errors,
            self.video_url.validate_url(),
            "videoUrl",
            "video_url",
            "Episodes need an uploaded video URL",
        );
        check(
            &mut errors,
            is_url_or_empty(&self.thumbnail_url),
            "thumbnailUrl",
            "thumbnail_url",
            "Thumbnail must be an uploaded file URL",
        );

        into_result(errors)
    }
}

impl From<EpisodeRequest> for EpisodeFields {
    fn from(value: EpisodeRequest) -> Self {
        EpisodeFields {
            title: value.title.trim().to_string(),
            description: value.description,
            video_url: value.video_url,
            thumbnail_url: value.thumbnail_url,
            duration: value.duration,
        }
    }
}

#[derive(serde::Serialize, Debug)]
pub struct EpisodeChange {
    pub version: i64,
    pub episode: Episode,
}

#[tracing::instrument(name = "[GET] series", skip_all)]
pub async fn index(
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<Stored<Series>>>, Error> {
    let result = list_series(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] series/{id}", skip_all, fields(path.id = %id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Series>>, Error> {
    let result = get_series(app_state.store.as_ref(), &id).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] series", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<SeriesRequest>,
) -> Result<(StatusCode, Json<Stored<Series>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let result = create_series(app_state.store.as_ref(), request.series).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[PUT] series/{id}", skip_all, fields(path.id = %id))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<Stored<Series>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let result = update_series(
        app_state.store.as_ref(),
        &id,
        request.series,
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[DELETE] series/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_series(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "[POST] series/{id}/episodes", skip_all, fields(path.id = %series_id))]
pub async fn store_episode(
    State(app_state): State<SharedAppState>,
    Path(series_id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<EpisodeRequest>,
) -> Result<(StatusCode, Json<EpisodeChange>), Error> {
    request.validate().map_err(Error::Validation)?;

    let (series, episode) = create_episode(
        app_state.store.as_ref(),
        &series_id,
        request.into(),
        version.expected_version,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(EpisodeChange {
            version: series.version,
            episode,
        }),
    ))
}

#[tracing::instrument(name = "[PUT] series/{id}/episodes/{episode_id}", skip_all, fields(path.id = %series_id, path.episode_id = %episode_id))]
pub async fn update_episode(
    State(app_state): State<SharedAppState>,
    Path((series_id, episode_id)): Path<(String, String)>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<EpisodeRequest>,
) -> Result<Json<EpisodeChange>, Error> {
    request.validate().map_err(Error::Validation)?;

    let (series, episode) = edit_episode(
        app_state.store.as_ref(),
        &series_id,
        &episode_id,
        request.into(),
        version.expected_version,
    )
    .await?;

    Ok(Json(EpisodeChange {
        version: series.version,
        episode,
    }))
}

#[tracing::instrument(name = "[DELETE] series/{id}/episodes/{episode_id}", skip_all, fields(path.id = %series_id, path.episode_id = %episode_id))]
pub async fn destroy_episode(
    State(app_state): State<SharedAppState>,
    Path((series_id, episode_id)): Path<(String, String)>,
    Query(version): Query<VersionQuery>,
) -> Result<Json<EpisodeChange>, Error> {
    let (series, episode) = delete_episode(
        app_state.store.as_ref(),
        &series_id,
        &episode_id,
        version.expected_version,
    )
    .await?;

    Ok(Json(EpisodeChange {
        version: series.version,
        episode,
    }))
}

#[tracing::instrument(name = "[POST] series/{id}/episodes/reorder", skip_all, fields(path.id = %series_id))]
pub async fn reorder_episode(
    State(app_state): State<SharedAppState>,
    Path(series_id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Stored<Series>>, Error> {
    let result = reorder_episodes(
        app_state.store.as_ref(),
        &series_id,
        request.from,
        request.to,
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}
