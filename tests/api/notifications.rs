use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{Method, StatusCode},
    routing::post,
};
use serde_json::{Value, json};

use crate::{
    AppStateTest, MultipartPart, UNREACHABLE_URL, spawn_stub, test_config,
};

type Received = Arc<Mutex<Vec<Vec<(String, String)>>>>;

/// Accepts every push and remembers the text fields (and file names) it got.
async fn accepting_dispatcher() -> (String, Received) {
    let received: Received = Arc::default();

    let router = Router::new()
        .route(
            "/send-notification",
            post(
                |State(received): State<Received>, mut multipart: Multipart| async move {
                    let mut fields = Vec::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().map(str::to_string);
                        let value = match file_name {
                            Some(file_name) => file_name,
                            None => field.text().await.unwrap(),
                        };
                        fields.push((name, value));
                    }
                    received.lock().unwrap().push(fields);

                    Json(json!({ "data": { "successCount": 3 }, "message": "Notification sent" }))
                },
            ),
        )
        .with_state(received.clone());

    let address = spawn_stub(router).await;
    (format!("{}/send-notification", address), received)
}

async fn rejecting_dispatcher(status: StatusCode, body: Value) -> String {
    let router = Router::new().route(
        "/send-notification",
        post(move || async move { (status, Json(body)) }),
    );

    format!("{}/send-notification", spawn_stub(router).await)
}

#[tokio::test]
async fn scheduled_notification_needs_a_date() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({ "title": "New book", "message": "Out now", "status": "scheduled" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({
                "title": "New book",
                "message": "Out now",
                "status": "draft",
                "scheduledAt": "2030-01-01T10:00:00Z",
                "target": ["u1", "u2"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "draft");
    assert_eq!(created["scheduledAt"], Value::Null);
    assert_eq!(created["target"], json!(["u1", "u2"]));
    assert_eq!(created["richFormat"]["lineBreaks"], true);
}

#[tokio::test]
async fn dispatch_forwards_form_and_records_notification() {
    let (dispatch_url, received) = accepting_dispatcher().await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));

    let (status, body) = test_state
        .send_multipart(
            "/notifications/dispatch",
            &[
                MultipartPart::text("title", "New chapter"),
                MultipartPart::text("body", "Chapter 3 is live"),
                MultipartPart::file("file", "banner.png", "image/png", b"\x89PNG"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notification sent");
    assert_eq!(body["data"]["successCount"], 3);
    assert_eq!(body["notification"]["status"], "sent");
    assert!(body["notification"]["sentAt"].is_string());

    let forms = received.lock().unwrap().clone();
    assert_eq!(
        forms,
        vec![vec![
            ("title".to_string(), "New chapter".to_string()),
            ("body".to_string(), "Chapter 3 is live".to_string()),
            ("file".to_string(), "banner.png".to_string()),
        ]]
    );

    let (_, list) = test_state.admin(Method::GET, "/notifications", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn future_dispatch_is_recorded_as_scheduled() {
    let (dispatch_url, received) = accepting_dispatcher().await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));

    let (status, body) = test_state
        .send_multipart(
            "/notifications/dispatch",
            &[
                MultipartPart::text("title", "Tomorrow"),
                MultipartPart::text("body", "Big release"),
                MultipartPart::text("scheduledAt", "2099-05-01T09:30:00Z"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["status"], "scheduled");
    assert_eq!(
        received.lock().unwrap()[0][2],
        (
            "scheduledAt".to_string(),
            "2099-05-01T09:30:00.000Z".to_string()
        )
    );
}

#[tokio::test]
async fn dispatch_requires_title_and_body() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .send_multipart(
            "/notifications/dispatch",
            &[MultipartPart::text("title", "Only a title")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn no_devices_is_surfaced_with_its_code() {
    let dispatch_url = rejecting_dispatcher(
        StatusCode::BAD_REQUEST,
        json!({ "error": "Failed", "code": "NO_DEVICES_REGISTERED", "details": "no tokens" }),
    )
    .await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));

    let (status, body) = test_state
        .send_multipart(
            "/notifications/dispatch",
            &[
                MultipartPart::text("title", "Hi"),
                MultipartPart::text("body", "there"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "NO_DEVICES_REGISTERED");

    let (_, list) = test_state.admin(Method::GET, "/notifications", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn image_failure_is_a_gateway_error() {
    let dispatch_url = rejecting_dispatcher(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Failed", "code": "IMAGE_UPLOAD_FAILED", "details": "bucket down" }),
    )
    .await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));

    let (status, body) = test_state
        .send_multipart(
            "/notifications/dispatch",
            &[
                MultipartPart::text("title", "Hi"),
                MultipartPart::text("body", "there"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "IMAGE_UPLOAD_FAILED");
}

#[tokio::test]
async fn sending_a_draft_records_the_outcome() {
    let (dispatch_url, _) = accepting_dispatcher().await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));
    let (_, draft) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({ "title": "New book", "message": "Out now" })),
        )
        .await;

    let (status, sent) = test_state
        .admin(
            Method::POST,
            &format!("/notifications/{}/send", draft["id"].as_str().unwrap()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["status"], "sent");
    assert_eq!(sent["version"], 3);
}

#[tokio::test]
async fn sent_notification_is_not_dispatched_again() {
    let (dispatch_url, received) = accepting_dispatcher().await;
    let test_state = AppStateTest::new_with_config(test_config(UNREACHABLE_URL, &dispatch_url));
    let (_, draft) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({ "title": "New book", "message": "Out now" })),
        )
        .await;
    let uri = format!("/notifications/{}/send", draft["id"].as_str().unwrap());

    let (first, _) = test_state.admin(Method::POST, &uri, None).await;
    let (second, _) = test_state.admin(Method::POST, &uri, None).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(received.lock().unwrap().len(), 1);

    let (_, list) = test_state.admin(Method::GET, "/notifications", None).await;
    assert_eq!(list[0]["status"], "sent");
}

#[tokio::test]
async fn notifications_cannot_be_created_mid_dispatch() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({ "title": "New book", "message": "Out now", "status": "sending" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_dispatcher_marks_draft_failed() {
    let test_state = AppStateTest::new();
    let (_, draft) = test_state
        .admin(
            Method::POST,
            "/notifications",
            Some(json!({ "title": "New book", "message": "Out now" })),
        )
        .await;
    let id = draft["id"].as_str().unwrap();

    let (status, body) = test_state
        .admin(Method::POST, &format!("/notifications/{}/send", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], Value::Null);

    let (_, list) = test_state.admin(Method::GET, "/notifications", None).await;
    assert_eq!(list[0]["status"], "failed");
    assert_eq!(list[0]["lastError"], "Dispatch service is unreachable");

    let (status, _) = test_state
        .admin(Method::POST, &format!("/notifications/{}/send", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY, "failed notifications may be retried");

    let (status, _) = test_state
        .admin(Method::DELETE, &format!("/notifications/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
