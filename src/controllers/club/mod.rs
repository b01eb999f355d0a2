use axum::{Json, extract::State};

use crate::{
    db::club::{get_config, save_config},
    error::Error,
    model::ClubConfig,
    state::SharedAppState,
};

pub mod bonus_scenes;
pub mod polls;
pub mod posts;

#[tracing::instrument(name = "[GET] club", skip_all)]
pub async fn show(State(app_state): State<SharedAppState>) -> Result<Json<ClubConfig>, Error> {
    let result = get_config(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[PUT] club", skip_all)]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Json(request): Json<ClubConfig>,
) -> Result<Json<ClubConfig>, Error> {
    let result = save_config(app_state.store.as_ref(), request).await?;

    Ok(Json(result.data))
}
