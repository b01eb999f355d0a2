use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::{AppStateTest, book_body};

async fn book_with_chapters(test_state: &AppStateTest, count: usize) -> String {
    let (_, created) = test_state
        .admin(Method::POST, "/books", Some(book_body("Dune")))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    for i in 0..count {
        let (status, _) = test_state
            .admin(
                Method::POST,
                &format!("/books/{}/chapters", id),
                Some(json!({
                    "chapterName": format!("Chapter {}", i),
                    "chapterType": "audio",
                    "chapterUrl": format!("https://cdn.test/audio/{}.mp3", i)
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    id
}

fn summary(chapters: &Value) -> Vec<(i64, i64, bool, bool)> {
    chapters
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["chapterId"].as_i64().unwrap(),
                c["order"].as_i64().unwrap(),
                c["isFree"].as_bool().unwrap(),
                c["isLocked"].as_bool().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn appended_chapters_are_locked_after_the_free_first() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 3).await;

    let (status, list) = test_state
        .admin(Method::GET, &format!("/books/{}/chapters", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["version"], 4);
    assert_eq!(
        summary(&list["chapters"]),
        vec![(0, 0, true, false), (1, 1, false, true), (2, 2, false, true)]
    );
    assert_eq!(list["chapters"][0]["isDownloadable"], true);
}

#[tokio::test]
async fn text_chapter_derives_plain_text() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 0).await;

    let (status, change) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters", id),
            Some(json!({
                "chapterName": "Prologue",
                "chapterType": "text",
                "contentBlocks": [
                    {"type": "paragraph", "content": "It was dark."},
                    {"type": "image", "url": "https://cdn.test/images/night.png"},
                    {"type": "paragraph", "content": "Then light."}
                ],
                "textContent": "ignored"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(change["chapter"]["textContent"], "It was dark.\nThen light.");
    assert_eq!(change["chapter"]["isDownloadable"], false);
    assert_eq!(change["chapter"]["isFree"], true);
}

#[tokio::test]
async fn invalid_chapter_is_rejected() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 0).await;

    let (status, _) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters", id),
            Some(json!({ "chapterName": "", "chapterType": "audio", "chapterUrl": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters", id),
            Some(json!({ "chapterName": "Ep", "chapterType": "series", "seriesId": "missing" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reorder_rederives_access_from_position() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 3).await;

    let (status, list) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters/reorder", id),
            Some(json!({ "from": 2, "to": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary(&list["chapters"]),
        vec![(2, 0, true, false), (0, 1, false, true), (1, 2, false, true)]
    );

    let (status, _) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters/reorder", id),
            Some(json!({ "from": 0, "to": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn lock_toggle_changes_one_flag() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 3).await;

    let (status, change) = test_state
        .admin(Method::POST, &format!("/books/{}/chapters/1/lock", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(change["chapter"]["isLocked"], false);

    let (_, list) = test_state
        .admin(Method::GET, &format!("/books/{}/chapters", id), None)
        .await;
    assert_eq!(
        summary(&list["chapters"]),
        vec![(0, 0, true, false), (1, 1, false, false), (2, 2, false, true)]
    );
}

#[tokio::test]
async fn delete_renumbers_and_frees_new_first() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 3).await;

    let (status, change) = test_state
        .admin(Method::DELETE, &format!("/books/{}/chapters/0", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(change["chapter"]["chapterId"], 0);

    let (_, list) = test_state
        .admin(Method::GET, &format!("/books/{}/chapters", id), None)
        .await;
    assert_eq!(
        summary(&list["chapters"]),
        vec![(1, 0, true, false), (2, 1, false, true)]
    );

    let (status, _) = test_state
        .admin(Method::DELETE, &format!("/books/{}/chapters/0", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_chapter_write_is_a_conflict() {
    let test_state = AppStateTest::new();
    let id = book_with_chapters(&test_state, 2).await;

    let (status, _) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters/1/lock?expectedVersion=1", id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn series_chapter_records_episode_count() {
    let test_state = AppStateTest::new();
    let (_, series) = test_state
        .admin(Method::POST, "/series", Some(json!({ "title": "Nights" })))
        .await;
    let series_id = series["id"].as_str().unwrap();
    for title in ["one", "two"] {
        test_state
            .admin(
                Method::POST,
                &format!("/series/{}/episodes", series_id),
                Some(json!({ "title": title, "videoUrl": "https://cdn.test/video/e.mp4" })),
            )
            .await;
    }
    let id = book_with_chapters(&test_state, 0).await;

    let (status, change) = test_state
        .admin(
            Method::POST,
            &format!("/books/{}/chapters", id),
            Some(json!({ "chapterName": "Watch", "chapterType": "series", "seriesId": series_id })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(change["chapter"]["episodeCount"], 2);
    assert_eq!(change["chapter"]["chapterType"], "series");
}
