use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::{Validate, ValidateUrl, ValidationErrors};

use crate::{
    db::books::{
        create_chapter, delete_chapter, edit_chapter, get_book, reorder_chapters, toggle_lock,
    },
    error::Error,
    model::{Chapter, ChapterContent, ContentBlock, ordering::sort_by_order},
    state::SharedAppState,
};

use super::{VersionQuery, check, into_result};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRequest {
    pub chapter_name: String,
    #[serde(flatten)]
    pub content: ChapterContent,
}

impl ChapterRequest {
    /// The stored body; text chapters get their plain text re-derived.
    fn into_parts(self) -> (String, ChapterContent) {
        let content = match self.content {
            ChapterContent::Text { content_blocks, .. } => ChapterContent::text(content_blocks),
            other => other,
        };

        (self.chapter_name.trim().to_string(), content)
    }
}

impl Validate for ChapterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            !self.chapter_name.trim().is_empty(),
            "chapterName",
            "chapter_name_required",
            "Chapter name is required",
        );

        match &self.content {
            ChapterContent::Audio { chapter_url } => check(
                &mut errors,
                chapter_url.validate_url(),
                "chapterUrl",
                "chapter_url",
                "Audio chapters need an uploaded audio URL",
            ),
            ChapterContent::Text { content_blocks, .. } => check(
                &mut errors,
                content_blocks.iter().all(|block| match block {
                    ContentBlock::Paragraph { .. } => true,
                    ContentBlock::Image { url } => url.validate_url(),
                }),
                "contentBlocks",
                "content_block_image_url",
                "Image blocks need an uploaded image URL",
            ),
            ChapterContent::Series { series_id, .. } => check(
                &mut errors,
                !series_id.trim().is_empty(),
                "seriesId",
                "series_id_required",
                "Series chapters must reference a series",
            ),
        }

        into_result(errors)
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(serde::Serialize, Debug)]
pub struct ChapterChange {
    /// Book version after the write, for the next `expectedVersion`.
    pub version: i64,
    pub chapter: Chapter,
}

#[derive(serde::Serialize, Debug)]
pub struct ChapterList {
    pub version: i64,
    pub chapters: Vec<Chapter>,
}

#[tracing::instrument(name = "[GET] books/{id}/chapters", skip_all, fields(path.id = %book_id))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Path(book_id): Path<String>,
) -> Result<Json<ChapterList>, Error> {
    let book = get_book(app_state.store.as_ref(), &book_id).await?;
    let mut chapters = book.data.chapters;
    sort_by_order(&mut chapters);

    Ok(Json(ChapterList {
        version: book.version,
        chapters,
    }))
}

#[tracing::instrument(name = "[POST] books/{id}/chapters", skip_all, fields(path.id = %book_id))]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Path(book_id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<ChapterRequest>,
) -> Result<(StatusCode, Json<ChapterChange>), Error> {
    request.validate().map_err(Error::Validation)?;
    let (chapter_name, content) = request.into_parts();

    let (book, chapter) = create_chapter(
        app_state.store.as_ref(),
        &book_id,
        chapter_name,
        content,
        version.expected_version,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ChapterChange {
            version: book.version,
            chapter,
        }),
    ))
}

#[tracing::instrument(name = "[PUT] books/{id}/chapters/{chapter_id}", skip_all, fields(path.id = %book_id, path.chapter_id = chapter_id))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path((book_id, chapter_id)): Path<(String, i64)>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<ChapterRequest>,
) -> Result<Json<ChapterChange>, Error> {
    request.validate().map_err(Error::Validation)?;
    let (chapter_name, content) = request.into_parts();

    let (book, chapter) = edit_chapter(
        app_state.store.as_ref(),
        &book_id,
        chapter_id,
        chapter_name,
        content,
        version.expected_version,
    )
    .await?;

    Ok(Json(ChapterChange {
        version: book.version,
        chapter,
    }))
}

#[tracing::instrument(name = "[DELETE] books/{id}/chapters/{chapter_id}", skip_all, fields(path.id = %book_id, path.chapter_id = chapter_id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path((book_id, chapter_id)): Path<(String, i64)>,
    Query(version): Query<VersionQuery>,
) -> Result<Json<ChapterChange>, Error> {
    let (book, chapter) = delete_chapter(
        app_state.store.as_ref(),
        &book_id,
        chapter_id,
        version.expected_version,
    )
    .await?;

    Ok(Json(ChapterChange {
        version: book.version,
        chapter,
    }))
}

#[tracing::instrument(name = "[POST] books/{id}/chapters/reorder", skip_all, fields(path.id = %book_id))]
pub async fn reorder(
    State(app_state): State<SharedAppState>,
    Path(book_id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ChapterList>, Error> {
    let book = reorder_chapters(
        app_state.store.as_ref(),
        &book_id,
        request.from,
        request.to,
        version.expected_version,
    )
    .await?;

    Ok(Json(ChapterList {
        version: book.version,
        chapters: book.data.chapters,
    }))
}

#[tracing::instrument(name = "[POST] books/{id}/chapters/{chapter_id}/lock", skip_all, fields(path.id = %book_id, path.chapter_id = chapter_id))]
pub async fn lock(
    State(app_state): State<SharedAppState>,
    Path((book_id, chapter_id)): Path<(String, i64)>,
    Query(version): Query<VersionQuery>,
) -> Result<Json<ChapterChange>, Error> {
    let (book, chapter) = toggle_lock(
        app_state.store.as_ref(),
        &book_id,
        chapter_id,
        version.expected_version,
    )
    .await?;

    Ok(Json(ChapterChange {
        version: book.version,
        chapter,
    }))
}
