use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::AppStateTest;

async fn seed_users(test_state: &AppStateTest, count: usize) {
    for i in 0..count {
        let (status, _) = test_state
            .admin(
                Method::POST,
                "/users",
                Some(json!({ "uid": format!("uid-{:02}", i), "email": format!("user{:02}@x.io", i) })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn default_page_holds_ten_users() {
    let test_state = AppStateTest::new();
    seed_users(&test_state, 12).await;

    let (status, page) = test_state.admin(Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["users"].as_array().unwrap().len(), 10);
    assert_eq!(page["hasMore"], true);
    assert_eq!(
        page["nextCursor"],
        json!({ "email": "user09@x.io", "id": "uid-09" })
    );

    let (_, rest) = test_state
        .admin(Method::GET, "/users?after=user09@x.io&afterId=uid-09", None)
        .await;
    let emails: Vec<&str> = rest["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["user10@x.io", "user11@x.io"]);
    assert_eq!(rest["hasMore"], false);
}

#[tokio::test]
async fn limit_is_bounded() {
    let test_state = AppStateTest::new();

    for uri in ["/users?limit=0", "/users?limit=101"] {
        let (status, _) = test_state.admin(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let (status, _) = test_state
        .admin(Method::GET, "/users?limit=100", None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_fields_are_validated_and_uid_is_the_key() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/users",
            Some(json!({ "uid": "u1", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = test_state
        .admin(
            Method::POST,
            "/users",
            Some(json!({ "uid": "u1", "email": "u1@x.io", "name": "Una" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "u1");

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/users",
            Some(json!({ "uid": "u1", "email": "again@x.io" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = test_state
        .admin(
            Method::PUT,
            "/users/u1",
            Some(json!({ "uid": "changed", "email": "u1@x.io", "isSubscriber": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["uid"], "u1");
    assert_eq!(updated["isSubscriber"], true);

    let (status, _) = test_state.admin(Method::DELETE, "/users/u1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
