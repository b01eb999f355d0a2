use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationErrors};

use crate::{
    auth::Principal,
    controllers::{check, into_result},
    db::{
        Stored,
        club::{ActivePoll, create_poll, end_poll, get_active_poll, list_archived_polls, vote},
    },
    error::Error,
    model::Poll,
    state::SharedAppState,
};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    pub question: String,
    #[serde(default)]
    pub multi_choice: bool,
    pub options: Vec<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Validate for PollRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.question.trim().is_empty(),
            "question",
            "question_required",
            "Question is required",
        );
        check(
            &mut errors,
            !self.options.is_empty(),
            "options",
            "options_required",
            "Add at least one option",
        );
        check(
            &mut errors,
            self.options.iter().all(|label| !label.trim().is_empty()),
            "options",
            "option_label_required",
            "Every option needs a label",
        );

        into_result(errors)
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct VoteRequest {
    pub option: String,
}

#[tracing::instrument(name = "[GET] club/polls", skip_all)]
pub async fn index(
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<Stored<Poll>>>, Error> {
    let result = list_archived_polls(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] club/polls/active", skip_all)]
pub async fn active(
    Extension(principal): Extension<Arc<Principal>>,
    State(app_state): State<SharedAppState>,
) -> Result<Json<ActivePoll>, Error> {
    let result = get_active_poll(app_state.store.as_ref(), &principal.uid).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] club/polls/active", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<PollRequest>,
) -> Result<(StatusCode, Json<Stored<Poll>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let poll = Poll::new(
        request.question.trim().to_string(),
        request.multi_choice,
        request
            .options
            .into_iter()
            .map(|label| label.trim().to_string())
            .collect(),
        request.scheduled_at,
    );
    let result = create_poll(app_state.store.as_ref(), &poll).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[DELETE] club/polls/active", skip_all)]
pub async fn end(State(app_state): State<SharedAppState>) -> Result<Json<Stored<Poll>>, Error> {
    let result = end_poll(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] club/polls/active/votes", skip_all, fields(uid = %principal.uid))]
pub async fn store_vote(
    Extension(principal): Extension<Arc<Principal>>,
    State(app_state): State<SharedAppState>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<ActivePoll>, Error> {
    let poll = vote(app_state.store.as_ref(), &principal.uid, &request.option).await?;

    Ok(Json(ActivePoll {
        poll,
        has_voted: true,
    }))
}
