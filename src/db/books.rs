use crate::{
    error::Error,
    model::{
        Book, Chapter, ChapterContent, Series,
        chapter::{add_chapter, move_chapter, remove_chapter, toggle_chapter_lock, update_chapter},
        error::ContentError,
    },
};

use super::{
    DocumentStore, Stored, collections::{AUDIOBOOKS, SERIES}, fetch, fetch_all, fetch_optional,
    insert, modify, newest_first, remove,
};

#[tracing::instrument(name = "list books", skip_all)]
pub async fn list_books(store: &dyn DocumentStore) -> Result<Vec<Stored<Book>>, Error> {
    Ok(newest_first(fetch_all(store, AUDIOBOOKS).await?))
}

#[tracing::instrument(name = "get book", skip(store))]
pub async fn get_book(store: &dyn DocumentStore, id: &str) -> Result<Stored<Book>, Error> {
    fetch(store, AUDIOBOOKS, id).await
}

/// New books never carry chapters; those are added one by one.
#[tracing::instrument(name = "create book", skip_all, fields(title = %book.title))]
pub async fn create_book(store: &dyn DocumentStore, mut book: Book) -> Result<Stored<Book>, Error> {
    book.chapters.clear();

    insert(store, AUDIOBOOKS, &book).await
}

/// Replaces the metadata of a book; its chapters are kept as stored.
#[tracing::instrument(name = "update book", skip(store, book))]
pub async fn update_book(
    store: &dyn DocumentStore,
    id: &str,
    book: Book,
    expected_version: Option<i64>,
) -> Result<Stored<Book>, Error> {
    let (stored, _) = modify(store, AUDIOBOOKS, id, expected_version, |current: &mut Book| {
        let chapters = std::mem::take(&mut current.chapters);
        *current = book;
        current.chapters = chapters;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete book", skip(store))]
pub async fn delete_book(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, AUDIOBOOKS, id).await
}

/// Series chapters carry the episode count of the series at write time.
async fn resolve_content(
    store: &dyn DocumentStore,
    content: ChapterContent,
) -> Result<ChapterContent, Error> {
    match content {
        ChapterContent::Series { series_id, .. } => {
            let series = fetch_optional::<Series>(store, SERIES, &series_id)
                .await?
                .ok_or_else(|| ContentError::UnknownSeries(series_id.clone()))?;

            Ok(ChapterContent::Series {
                series_id,
                episode_count: series.data.episode_count(),
            })
        }
        other => Ok(other),
    }
}

async fn modify_chapters<R, F>(
    store: &dyn DocumentStore,
    book_id: &str,
    expected_version: Option<i64>,
    f: F,
) -> Result<(Stored<Book>, R), Error>
where
    F: FnOnce(&mut Vec<Chapter>) -> Result<R, ContentError>,
{
    modify(store, AUDIOBOOKS, book_id, expected_version, |book: &mut Book| {
        Ok(f(&mut book.chapters)?)
    })
    .await
}

#[tracing::instrument(name = "add chapter", skip(store, content))]
pub async fn create_chapter(
    store: &dyn DocumentStore,
    book_id: &str,
    chapter_name: String,
    content: ChapterContent,
    expected_version: Option<i64>,
) -> Result<(Stored<Book>, Chapter), Error> {
    let content = resolve_content(store, content).await?;

    modify_chapters(store, book_id, expected_version, |chapters| {
        Ok(add_chapter(chapters, chapter_name, content))
    })
    .await
}

#[tracing::instrument(name = "update chapter", skip(store, content))]
pub async fn edit_chapter(
    store: &dyn DocumentStore,
    book_id: &str,
    chapter_id: i64,
    chapter_name: String,
    content: ChapterContent,
    expected_version: Option<i64>,
) -> Result<(Stored<Book>, Chapter), Error> {
    let content = resolve_content(store, content).await?;

    modify_chapters(store, book_id, expected_version, |chapters| {
        update_chapter(chapters, chapter_id, chapter_name, content)
    })
    .await
}

#[tracing::instrument(name = "delete chapter", skip(store))]
pub async fn delete_chapter(
    store: &dyn DocumentStore,
    book_id: &str,
    chapter_id: i64,
    expected_version: Option<i64>,
) -> Result<(Stored<Book>, Chapter), Error> {
    modify_chapters(store, book_id, expected_version, |chapters| {
        remove_chapter(chapters, chapter_id)
    })
    .await
}

#[tracing::instrument(name = "reorder chapters", skip(store))]
pub async fn reorder_chapters(
    store: &dyn DocumentStore,
    book_id: &str,
    from: usize,
    to: usize,
    expected_version: Option<i64>,
) -> Result<Stored<Book>, Error> {
    let (book, _) = modify_chapters(store, book_id, expected_version, |chapters| {
        move_chapter(chapters, from, to)
    })
    .await?;

    Ok(book)
}

#[tracing::instrument(name = "toggle chapter lock", skip(store))]
pub async fn toggle_lock(
    store: &dyn DocumentStore,
    book_id: &str,
    chapter_id: i64,
    expected_version: Option<i64>,
) -> Result<(Stored<Book>, Chapter), Error> {
    modify_chapters(store, book_id, expected_version, |chapters| {
        toggle_chapter_lock(chapters, chapter_id)
    })
    .await
}
