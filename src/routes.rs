use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{HeaderName, Request, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    controllers::{
        books, categories, chapters, club, errors, home, me, notifications, series, site_content,
        stats, uploads, users,
    },
    middlewares::{jwt_auth_middleware, require_admin_middleware},
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";
const UPLOAD_BODY_LIMIT: usize = 52_428_800; // 50MB in binary bytes.

pub fn init_router(app_state: AppState) -> Router {
    let state = Arc::new(app_state);

    let authenticated = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);
    let admin = middleware::from_fn(require_admin_middleware);

    let app = Router::new().route("/", get(home::index));

    let me_route = Router::new()
        .route("/", get(me::index))
        .route_layer(authenticated.clone());

    let stats_route = Router::new()
        .route("/", get(stats::index))
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let books_route = Router::new()
        .route("/", get(books::index).post(books::store))
        .route(
            "/{id}",
            get(books::show).put(books::update).delete(books::destroy),
        )
        .route(
            "/{id}/chapters",
            get(chapters::index).post(chapters::store),
        )
        .route("/{id}/chapters/reorder", post(chapters::reorder))
        .route(
            "/{id}/chapters/{chapter_id}",
            put(chapters::update).delete(chapters::destroy),
        )
        .route("/{id}/chapters/{chapter_id}/lock", post(chapters::lock))
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let series_route = Router::new()
        .route("/", get(series::index).post(series::store))
        .route(
            "/{id}",
            get(series::show).put(series::update).delete(series::destroy),
        )
        .route("/{id}/episodes", post(series::store_episode))
        .route("/{id}/episodes/reorder", post(series::reorder_episode))
        .route(
            "/{id}/episodes/{episode_id}",
            put(series::update_episode).delete(series::destroy_episode),
        )
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let users_route = Router::new()
        .route("/", get(users::index).post(users::store))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let categories_route = Router::new()
        .route("/", get(categories::index).post(categories::store))
        .route("/{index}", delete(categories::destroy))
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let notifications_route = Router::new()
        .route("/", get(notifications::index).post(notifications::store))
        .route("/dispatch", post(notifications::dispatch))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .route("/{id}/send", post(notifications::send))
        .route("/{id}", delete(notifications::destroy))
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let site_content_route = Router::new()
        .route(
            "/site-content/{page_type}",
            get(site_content::show).put(site_content::update),
        )
        .route(
            "/social-accounts",
            get(site_content::social_accounts).put(site_content::update_social_accounts),
        )
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let club_route = Router::new()
        .route("/", get(club::show).put(club::update))
        .route(
            "/bonus-scenes",
            get(club::bonus_scenes::index).post(club::bonus_scenes::store),
        )
        .route(
            "/bonus-scenes/{id}",
            put(club::bonus_scenes::update).delete(club::bonus_scenes::destroy),
        )
        .route("/polls", get(club::polls::index))
        .route(
            "/polls/active",
            post(club::polls::store).delete(club::polls::end),
        )
        .route("/posts", post(club::posts::store))
        .route(
            "/posts/{id}",
            put(club::posts::update).delete(club::posts::destroy),
        )
        .route_layer(admin.clone())
        .route("/polls/active", get(club::polls::active))
        .route("/polls/active/votes", post(club::polls::store_vote))
        .route("/posts", get(club::posts::index))
        .route("/posts/{id}/like", post(club::posts::like))
        .route_layer(authenticated.clone());

    let uploads_route = Router::new()
        .route("/", post(uploads::store))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .route_layer(admin.clone())
        .route_layer(authenticated.clone());

    let errors_route = Router::new()
        .route("/", get(errors::index))
        .route_layer(admin)
        .route("/", post(errors::store))
        .route_layer(authenticated);

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();
                let user_agent = request
                    .headers()
                    .get(header::USER_AGENT)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();

                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::info_span!(
                    "http_request",
                    request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    path = matched_path,
                    version = ?request.version(),
                    user_agent,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id_header));

    app.nest("/me", me_route)
        .nest("/stats", stats_route)
        .nest("/books", books_route)
        .nest("/series", series_route)
        .nest("/users", users_route)
        .nest("/categories", categories_route)
        .nest("/notifications", notifications_route)
        .merge(site_content_route)
        .nest("/club", club_route)
        .nest("/uploads", uploads_route)
        .nest("/errors", errors_route)
        .layer(CompressionLayer::new())
        .layer(request_id_middleware)
        .with_state(state)
}
