use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    db::categories::{add_category, delete_category, get_topics},
    error::Error,
    model::Topics,
    state::SharedAppState,
};

#[derive(serde::Deserialize, Debug)]
pub struct CategoryRequest {
    pub name: String,
}

#[tracing::instrument(name = "[GET] categories", skip_all)]
pub async fn index(State(app_state): State<SharedAppState>) -> Result<Json<Topics>, Error> {
    let result = get_topics(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] categories", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<Topics>, Error> {
    let (topics, added) = add_category(app_state.store.as_ref(), &request.name).await?;
    tracing::info!(category = %added, "Category added");

    Ok(Json(topics.data))
}

#[tracing::instrument(name = "[DELETE] categories/{index}", skip_all, fields(path.index = index))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(index): Path<usize>,
) -> Result<Json<Topics>, Error> {
    let (topics, removed) = delete_category(app_state.store.as_ref(), index).await?;
    tracing::info!(category = %removed, "Category removed");

    Ok(Json(topics.data))
}
