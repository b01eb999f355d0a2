use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidateUrl, ValidationErrors};

use crate::{
    db::{
        Stored,
        notifications::{
            claim_for_sending, create_notification, delete_notification, list_notifications,
            record_outcome,
        },
    },
    error::Error,
    model::{Notification, NotificationStatus, NotificationTarget, RichFormat},
    notify::{DispatchError, DispatchRequest},
    state::SharedAppState,
};

use super::{check, into_result, read_file};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub status: NotificationStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rich_format: RichFormat,
    #[serde(default)]
    pub target: NotificationTarget,
}

impl Validate for NotificationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.title.trim().is_empty(),
            "title",
            "title_required",
            "Title is required",
        );
        check(
            &mut errors,
            !self.message.trim().is_empty(),
            "message",
            "message_required",
            "Message is required",
        );
        check(
            &mut errors,
            self.status != NotificationStatus::Sending,
            "status",
            "status_sending",
            "A notification cannot be created mid-dispatch",
        );
        check(
            &mut errors,
            self.status != NotificationStatus::Scheduled || self.scheduled_at.is_some(),
            "scheduledAt",
            "scheduled_at_required",
            "Scheduled notifications need a date",
        );
        check(
            &mut errors,
            self.image_url.as_ref().is_none_or(|url| url.validate_url()),
            "imageUrl",
            "image_url",
            "Image must be an uploaded file URL",
        );
        check(
            &mut errors,
            match &self.target {
                NotificationTarget::Users(uids) => !uids.is_empty(),
                NotificationTarget::Audience(_) => true,
            },
            "target",
            "target_users_empty",
            "Pick at least one user",
        );

        into_result(errors)
    }
}

impl From<NotificationRequest> for Notification {
    fn from(value: NotificationRequest) -> Self {
        let scheduled_at = match value.status {
            NotificationStatus::Scheduled => value.scheduled_at,
            _ => None,
        };

        Notification {
            title: value.title.trim().to_string(),
            message: value.message,
            status: value.status,
            scheduled_at,
            deep_link: value.deep_link.filter(|link| !link.is_empty()),
            image_url: value.image_url,
            rich_format: value.rich_format,
            target: value.target,
            sent_at: None,
            last_error: None,
        }
    }
}

#[derive(serde::Serialize, Debug)]
pub struct DispatchResponse {
    pub message: String,
    pub data: serde_json::Value,
    pub notification: Stored<Notification>,
}

#[tracing::instrument(name = "[GET] notifications", skip_all)]
pub async fn index(
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<Stored<Notification>>>, Error> {
    let result = list_notifications(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] notifications", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<NotificationRequest>,
) -> Result<(StatusCode, Json<Stored<Notification>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let result = create_notification(app_state.store.as_ref(), &request.into()).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

fn parse_scheduled_at(raw: &str) -> Result<Option<DateTime<Utc>>, Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| Some(at.with_timezone(&Utc)))
        .map_err(|_| {
            let mut errors = ValidationErrors::new();
            check(
                &mut errors,
                false,
                "scheduledAt",
                "scheduled_at_format",
                "Scheduled date must be an RFC 3339 timestamp",
            );
            Error::Validation(errors)
        })
}

async fn read_dispatch_form(mut multipart: Multipart) -> Result<DispatchRequest, Error> {
    let mut request = DispatchRequest {
        title: String::new(),
        body: String::new(),
        scheduled_at: None,
        image: None,
    };

    let malformed = |e: axum::extract::multipart::MultipartError| {
        Error::Dispatch(DispatchError::Multipart(e.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => request.title = field.text().await.map_err(malformed)?,
            Some("body") => request.body = field.text().await.map_err(malformed)?,
            Some("scheduledAt") => {
                request.scheduled_at = parse_scheduled_at(&field.text().await.map_err(malformed)?)?
            }
            Some("file") => {
                let file = read_file(field).await?;
                if !file.bytes.is_empty() {
                    request.image = Some(file);
                }
            }
            _ => {}
        }
    }

    let mut errors = ValidationErrors::new();
    check(
        &mut errors,
        !request.title.trim().is_empty(),
        "title",
        "title_required",
        "Title is required",
    );
    check(
        &mut errors,
        !request.body.trim().is_empty(),
        "body",
        "body_required",
        "Message is required",
    );
    into_result(errors).map_err(Error::Validation)?;

    Ok(request)
}

/// Sends a push right away (or schedules it) and records what was sent.
#[tracing::instrument(name = "[POST] notifications/dispatch", skip_all)]
pub async fn dispatch(
    State(app_state): State<SharedAppState>,
    multipart: Multipart,
) -> Result<Json<DispatchResponse>, Error> {
    let request = read_dispatch_form(multipart).await?;

    let mut notification = Notification {
        title: request.title.clone(),
        message: request.body.clone(),
        status: NotificationStatus::Draft,
        scheduled_at: request.scheduled_at,
        deep_link: None,
        image_url: None,
        rich_format: RichFormat::default(),
        target: NotificationTarget::default(),
        sent_at: None,
        last_error: None,
    };

    let receipt = app_state.dispatcher.dispatch(request).await?;
    notification.mark_dispatched(Utc::now());
    let stored = create_notification(app_state.store.as_ref(), &notification).await?;

    Ok(Json(DispatchResponse {
        message: receipt.message,
        data: receipt.data,
        notification: stored,
    }))
}

/// Dispatches a stored draft (or a failed notification) and records the
/// outcome on it. Anything already sent is refused with 409.
#[tracing::instrument(name = "[POST] notifications/{id}/send", skip_all, fields(path.id = %id))]
pub async fn send(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Notification>>, Error> {
    let store = app_state.store.as_ref();
    let claimed = claim_for_sending(store, &id).await?;
    let mut notification = claimed.data;

    let request = DispatchRequest {
        title: notification.title.clone(),
        body: notification.message.clone(),
        scheduled_at: notification.scheduled_at,
        image: None,
    };

    // The claim blocks other writers, so the outcome write only fails if the
    // notification was deleted meanwhile.
    match app_state.dispatcher.dispatch(request).await {
        Ok(_) => {
            notification.mark_dispatched(Utc::now());
            let result = record_outcome(store, &id, claimed.version, notification)
                .await
                .inspect_err(|error| {
                    tracing::error!(err.msg = %error, "Notification dispatched but outcome not recorded");
                })?;

            Ok(Json(result))
        }
        Err(dispatch_error) => {
            notification.mark_failed(dispatch_error.to_string());
            record_outcome(store, &id, claimed.version, notification).await?;

            Err(dispatch_error.into())
        }
    }
}

#[tracing::instrument(name = "[DELETE] notifications/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_notification(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
