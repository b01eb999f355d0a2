use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    db::{
        Stored,
        site_content::{get_page, get_social_accounts, save_page, save_social_accounts},
    },
    error::Error,
    model::{PageType, SiteContent, SocialAccounts},
    state::SharedAppState,
};

#[tracing::instrument(name = "[GET] site-content/{page_type}", skip_all, fields(path.page_type = %page_type))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(page_type): Path<String>,
) -> Result<Json<Stored<SiteContent>>, Error> {
    let page = PageType::try_from(page_type.as_str())?;

    let result = get_page(app_state.store.as_ref(), page).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[PUT] site-content/{page_type}", skip_all, fields(path.page_type = %page_type))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path(page_type): Path<String>,
    Json(request): Json<SiteContent>,
) -> Result<Json<Stored<SiteContent>>, Error> {
    let page = PageType::try_from(page_type.as_str())?;

    let result = save_page(app_state.store.as_ref(), page, request.content).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] social-accounts", skip_all)]
pub async fn social_accounts(
    State(app_state): State<SharedAppState>,
) -> Result<Json<SocialAccounts>, Error> {
    let result = get_social_accounts(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[PUT] social-accounts", skip_all)]
pub async fn update_social_accounts(
    State(app_state): State<SharedAppState>,
    Json(request): Json<SocialAccounts>,
) -> Result<Json<SocialAccounts>, Error> {
    let result = save_social_accounts(app_state.store.as_ref(), &request).await?;

    Ok(Json(result.data))
}
