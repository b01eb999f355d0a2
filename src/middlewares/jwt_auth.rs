use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension,
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{Principal, decode_jwt, error::AuthError},
    error::Error,
    state::SharedAppState,
    telemetry::spawn_blocking_with_tracing,
};

#[tracing::instrument(name = "[MIDDLEWARE] jwt auth", skip_all, fields(uid))]
pub async fn jwt_auth_middleware(
    State(app_state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let auth_header = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|e| Error::Other(e.into()))?,
        None => {
            return Err(Error::Auth(AuthError::TokenMissing));
        }
    };

    let mut header = auth_header.split_whitespace();
    let (bearer_option, token_option) = (header.next(), header.next());

    let bearer = match bearer_option {
        Some(value) => value.to_lowercase(),
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    if bearer != *"bearer" {
        return Err(Error::Auth(AuthError::Unauthenticated));
    }

    let token = match token_option {
        Some(value) => value.to_string(),
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    let app_state_jwt = app_state.clone();
    let token_data =
        spawn_blocking_with_tracing(move || decode_jwt(&token, &app_state_jwt.config.jwt))
            .await
            .context("decode jwt")
            .map_err(Error::Other)?
            .map_err(|_| Error::Auth(AuthError::Unauthenticated))?;

    let principal = Principal::from(token_data.claims);
    tracing::Span::current().record("uid", tracing::field::display(&principal.uid));

    req.extensions_mut().insert(Arc::new(principal));

    Ok(next.run(req).await)
}

#[tracing::instrument(name = "[MIDDLEWARE] require admin", skip_all)]
pub async fn require_admin_middleware(
    Extension(principal): Extension<Arc<Principal>>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    if !principal.is_admin() {
        tracing::warn!(uid = %principal.uid, "Non-admin caller rejected");
        return Err(Error::Auth(AuthError::Forbidden));
    }

    Ok(next.run(req).await)
}
