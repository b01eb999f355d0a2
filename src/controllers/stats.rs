use axum::{Json, extract::State};

use crate::{
    db::stats::{DashboardStats, get_stats},
    error::Error,
    state::SharedAppState,
};

#[tracing::instrument(name = "[GET] stats", skip_all)]
pub async fn index(State(app_state): State<SharedAppState>) -> Result<Json<DashboardStats>, Error> {
    let result = get_stats(app_state.store.as_ref()).await?;

    Ok(Json(result))
}
