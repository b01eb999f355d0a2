use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use chrono::Utc;

use crate::{
    db::{
        Stored,
        app_errors::{list_errors, report_error},
    },
    error::Error,
    model::ErrorReport,
    state::SharedAppState,
};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReportRequest {
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub component_stack: Option<String>,
}

#[tracing::instrument(name = "[GET] errors", skip_all)]
pub async fn index(
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<Stored<ErrorReport>>>, Error> {
    let result = list_errors(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] errors", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    headers: HeaderMap,
    Json(request): Json<ErrorReportRequest>,
) -> Result<StatusCode, Error> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let report = ErrorReport {
        message: request.message,
        stack: request.stack,
        location: request.location,
        component_stack: request.component_stack,
        user_agent,
        timestamp: Utc::now(),
    };
    tracing::warn!(err.msg = %report.message, location = ?report.location, "Client error reported");

    report_error(app_state.store.as_ref(), &report).await?;

    Ok(StatusCode::CREATED)
}
