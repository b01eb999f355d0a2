use std::sync::{Arc, Mutex};

use audiobook_admin::config::{Bunny, Config, UploadMode};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{post, put},
};
use secrecy::SecretString;
use serde_json::json;

use crate::{
    AppStateTest, MultipartPart, UNREACHABLE_URL, spawn_stub, test_config,
};

/// Object path, `AccessKey` header and body size of the last PUT.
type StoredObject = Arc<Mutex<Option<(String, Option<String>, usize)>>>;

async fn storage_zone(status: StatusCode) -> (String, StoredObject) {
    let stored: StoredObject = Arc::default();

    let router = Router::new()
        .route(
            "/{*path}",
            put(
                move |State(stored): State<StoredObject>,
                      Path(path): Path<String>,
                      headers: HeaderMap,
                      body: Bytes| async move {
                    let access_key = headers
                        .get("AccessKey")
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    *stored.lock().unwrap() = Some((
                        path.trim_start_matches('/').to_string(),
                        access_key,
                        body.len(),
                    ));

                    status
                },
            ),
        )
        .with_state(stored.clone());

    (spawn_stub(router).await, stored)
}

fn bunny_config(storage_endpoint: &str) -> Config {
    let mut config = test_config(UNREACHABLE_URL, UNREACHABLE_URL);
    config.upload.mode = UploadMode::Bunny;
    config.upload.bunny = Some(Bunny {
        storage_endpoint: storage_endpoint.to_string(),
        storage_zone: "audiobooks".to_string(),
        access_key: SecretString::from("zone-key".to_string()),
        cdn_base_url: "https://cdn.test/".to_string(),
    });
    config
}

/// Echoes back a CDN URL built from the uploaded file name and size.
async fn accepting_gateway() -> String {
    let router = Router::new().route(
        "/bunnyupload",
        post(|mut multipart: Multipart| async move {
            while let Some(field) = multipart.next_field().await.unwrap() {
                if field.name() == Some("file") {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.unwrap();
                    return (
                        StatusCode::OK,
                        Json(json!({
                            "fileUrl": format!("https://cdn.test/uploads/{}/{}", bytes.len(), file_name)
                        })),
                    );
                }
            }

            (StatusCode::BAD_REQUEST, Json(json!({ "message": "No file" })))
        }),
    );

    format!("{}/bunnyupload", spawn_stub(router).await)
}

async fn gateway_answering(status: StatusCode, body: serde_json::Value) -> String {
    let router = Router::new().route(
        "/bunnyupload",
        post(move || async move { (status, Json(body)) }),
    );

    format!("{}/bunnyupload", spawn_stub(router).await)
}

#[tokio::test]
async fn upload_returns_gateway_file_url() {
    let gateway_url = accepting_gateway().await;
    let test_state = AppStateTest::new_with_config(test_config(&gateway_url, UNREACHABLE_URL));

    let (status, body) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "cover.png", "image/png", b"12345")],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "fileUrl": "https://cdn.test/uploads/5/cover.png" }));
}

#[tokio::test]
async fn gateway_rejection_carries_its_message() {
    let gateway_url = gateway_answering(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Storage quota exceeded" }),
    )
    .await;
    let test_state = AppStateTest::new_with_config(test_config(&gateway_url, UNREACHABLE_URL));

    let (status, body) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "a.mp3", "audio/mpeg", b"id3")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Storage quota exceeded");
}

#[tokio::test]
async fn relative_file_url_is_rejected() {
    let gateway_url = gateway_answering(StatusCode::OK, json!({ "fileUrl": "/tmp/a.mp3" })).await;
    let test_state = AppStateTest::new_with_config(test_config(&gateway_url, UNREACHABLE_URL));

    let (status, _) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "a.mp3", "audio/mpeg", b"id3")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn missing_file_is_a_bad_request() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .send_multipart("/uploads", &[MultipartPart::text("note", "no file here")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "empty.png", "image/png", b"")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_gateway_is_a_gateway_error() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "a.png", "image/png", b"png")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn members_cannot_upload() {
    let test_state = AppStateTest::new();
    let token = test_state.member_token("reader");

    let (status, _) = test_state
        .send(Method::POST, "/uploads", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn storage_zone_upload_returns_cdn_url() {
    let (endpoint, stored) = storage_zone(StatusCode::CREATED).await;
    let test_state = AppStateTest::new_with_config(bunny_config(&endpoint));

    let (status, body) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "my cover.png", "image/png", b"12345")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (path, access_key, size) = stored.lock().unwrap().clone().unwrap();
    assert!(path.starts_with("audiobooks/images/"), "{}", path);
    assert!(path.ends_with("_my_cover.png"), "{}", path);
    assert_eq!(access_key.as_deref(), Some("zone-key"));
    assert_eq!(size, 5);

    let object = path.trim_start_matches("audiobooks/");
    assert_eq!(body["fileUrl"], format!("https://cdn.test/{}", object));
}

#[tokio::test]
async fn storage_zone_rejection_is_a_gateway_error() {
    let (endpoint, _) = storage_zone(StatusCode::UNAUTHORIZED).await;
    let test_state = AppStateTest::new_with_config(bunny_config(&endpoint));

    let (status, body) = test_state
        .send_multipart(
            "/uploads",
            &[MultipartPart::file("file", "a.mp3", "audio/mpeg", b"id3")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Storage rejected upload with status 401");
}
