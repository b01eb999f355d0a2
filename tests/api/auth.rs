use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};

use crate::{ADMIN_NAME, ADMIN_UID, AppStateTest, read_response};

#[tokio::test]
async fn home_is_public() {
    let test_state = AppStateTest::new();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = read_response(response).await;
    assert_eq!(body, "Alive");
}

#[tokio::test]
async fn should_throw_error_when_request_does_not_contain_header_authorization() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state.send(Method::GET, "/books", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_auth_header_does_not_contain_bearer() {
    let test_state = AppStateTest::new();

    let request = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, "not-bearer random-string")
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_jwt_token_is_invalid() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .send(Method::GET, "/me", Some("random-string"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn members_cannot_reach_admin_routes() {
    let test_state = AppStateTest::new();

    for uri in ["/books", "/users", "/stats", "/club/polls", "/errors"] {
        let (status, _) = test_state.member("reader", Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[tokio::test]
async fn me_returns_token_principal() {
    let test_state = AppStateTest::new();

    let (status, body) = test_state.admin(Method::GET, "/me", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], ADMIN_UID);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["name"], ADMIN_NAME);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let test_state = AppStateTest::new();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test_state.generate_response(request).await;

    assert!(response.headers().contains_key("x-request-id"));
}
