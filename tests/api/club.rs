use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::{ADMIN_NAME, AppStateTest};

async fn open_poll(test_state: &AppStateTest) -> serde_json::Value {
    let (status, poll) = test_state
        .admin(
            Method::POST,
            "/club/polls/active",
            Some(json!({ "question": "Next read?", "options": ["Dune", "Emma", "Ulysses"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    poll
}

#[tokio::test]
async fn poll_starts_with_keyed_options_at_zero() {
    let test_state = AppStateTest::new();

    let poll = open_poll(&test_state).await;

    assert_eq!(poll["id"], "active");
    assert_eq!(poll["totalVotes"], 0);
    assert_eq!(poll["status"], "active");
    assert_eq!(
        poll["options"],
        json!([
            {"key": "A", "label": "Dune", "votes": 0},
            {"key": "B", "label": "Emma", "votes": 0},
            {"key": "C", "label": "Ulysses", "votes": 0}
        ])
    );

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/club/polls/active",
            Some(json!({ "question": "Another?", "options": ["x"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn poll_needs_question_and_labelled_options() {
    let test_state = AppStateTest::new();

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/club/polls/active",
            Some(json!({ "question": "Q", "options": ["ok", " "] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_state
        .admin(
            Method::POST,
            "/club/polls/active",
            Some(json!({ "question": "Q", "options": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn members_vote_once() {
    let test_state = AppStateTest::new();
    open_poll(&test_state).await;

    let (status, _) = test_state
        .member("reader", Method::GET, "/club/polls/active", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, voted) = test_state
        .member(
            "reader",
            Method::POST,
            "/club/polls/active/votes",
            Some(json!({ "option": "B" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voted["hasVoted"], true);
    assert_eq!(voted["totalVotes"], 1);
    assert_eq!(voted["options"][1]["votes"], 1);

    let (status, _) = test_state
        .member(
            "reader",
            Method::POST,
            "/club/polls/active/votes",
            Some(json!({ "option": "A" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = test_state
        .member(
            "other",
            Method::POST,
            "/club/polls/active/votes",
            Some(json!({ "option": "Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, seen_by_reader) = test_state
        .member("reader", Method::GET, "/club/polls/active", None)
        .await;
    assert_eq!(seen_by_reader["hasVoted"], true);
    assert_eq!(seen_by_reader["totalVotes"], 1);

    let (_, seen_by_other) = test_state
        .member("other", Method::GET, "/club/polls/active", None)
        .await;
    assert_eq!(seen_by_other["hasVoted"], false);
}

#[tokio::test]
async fn ended_poll_is_archived() {
    let test_state = AppStateTest::new();
    let poll = open_poll(&test_state).await;
    test_state
        .member(
            "reader",
            Method::POST,
            "/club/polls/active/votes",
            Some(json!({ "option": "A" })),
        )
        .await;

    let (status, archived) = test_state
        .admin(Method::DELETE, "/club/polls/active", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["id"], poll["pollId"]);
    assert_eq!(archived["status"], "archived");
    assert_eq!(archived["totalVotes"], 1);
    assert!(archived["endedAt"].is_string());

    let (status, _) = test_state
        .member("reader", Method::GET, "/club/polls/active", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = test_state
        .member(
            "late",
            Method::POST,
            "/club/polls/active/votes",
            Some(json!({ "option": "A" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = test_state.admin(Method::GET, "/club/polls", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    open_poll(&test_state).await;
}

#[tokio::test]
async fn posts_take_author_from_caller_and_count_likes() {
    let test_state = AppStateTest::new();

    let (status, post) = test_state
        .admin(
            Method::POST,
            "/club/posts",
            Some(json!({ "description": "Welcome!", "likes": 40 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["authorName"], ADMIN_NAME);
    assert_eq!(post["authorAvatarUrl"], "https://i.ibb.co/QDgYxYm/user.jpg");
    assert_eq!(post["likes"], 0);
    let like_uri = format!("/club/posts/{}/like", post["id"].as_str().unwrap());

    let (status, liked) = test_state
        .member("reader", Method::POST, &like_uri, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["liked"], true);
    assert_eq!(liked["post"]["likes"], 1);
    assert_eq!(liked["post"]["likedBy"], json!(["reader"]));

    let (_, unliked) = test_state
        .member("reader", Method::POST, &like_uri, None)
        .await;
    assert_eq!(unliked["liked"], false);
    assert_eq!(unliked["post"]["likes"], 0);

    let (status, _) = test_state
        .member(
            "reader",
            Method::POST,
            "/club/posts",
            Some(json!({ "description": "spam" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, posts) = test_state
        .member("reader", Method::GET, "/club/posts", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn club_config_drops_holiday_media_when_off() {
    let test_state = AppStateTest::new();

    let (status, empty) = test_state.admin(Method::GET, "/club", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["welcomeMessage"], "");

    let (status, saved) = test_state
        .admin(
            Method::PUT,
            "/club",
            Some(json!({
                "welcomeMessage": "Hi",
                "quoteOfWeek": "Fear is the mind-killer.",
                "isHolidaySpecial": false,
                "holidaySpecial": { "title": "Winter" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(saved.get("holidaySpecial").is_none());

    let (_, current) = test_state.admin(Method::GET, "/club", None).await;
    assert_eq!(current["quoteOfWeek"], "Fear is the mind-killer.");
}

#[tokio::test]
async fn bonus_scenes_default_their_title() {
    let test_state = AppStateTest::new();

    let (status, scene) = test_state
        .admin(Method::POST, "/club/bonus-scenes", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(scene["title"], "New Scene");

    let uri = format!("/club/bonus-scenes/{}", scene["id"].as_str().unwrap());
    let (status, updated) = test_state
        .admin(
            Method::PUT,
            &uri,
            Some(json!({ "title": "Balcony", "audioUrl": "https://cdn.test/audio/b.mp3" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Balcony");

    let (status, _) = test_state.admin(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, scenes) = test_state
        .admin(Method::GET, "/club/bonus-scenes", None)
        .await;
    assert_eq!(scenes, json!([]));
}
