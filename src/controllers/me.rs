use std::sync::Arc;

use axum::{Extension, Json};

use crate::{auth::Principal, error::Error};

#[tracing::instrument(name = "[GET] me", skip_all)]
pub async fn index(
    Extension(principal): Extension<Arc<Principal>>,
) -> Result<Json<Arc<Principal>>, Error> {
    Ok(Json(principal))
}
