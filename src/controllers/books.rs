use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::{Validate, ValidateUrl, ValidationErrors};

use crate::{
    db::{
        Stored,
        books::{create_book, delete_book, get_book, list_books, update_book},
    },
    error::Error,
    model::Book,
    state::SharedAppState,
};

use super::{VersionQuery, check, into_result, is_url_or_empty};

#[derive(serde::Deserialize, Debug)]
pub struct BookRequest {
    #[serde(flatten)]
    pub book: Book,
}

impl Validate for BookRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let book = &self.book;

        check(
            &mut errors,
            !book.title.trim().is_empty(),
            "title",
            "title_required",
            "Title is required",
        );
        check(
            &mut errors,
            book.book_cover.validate_url(),
            "bookCover",
            "book_cover_url",
            "Book cover must be an uploaded file URL",
        );
        check(
            &mut errors,
            is_url_or_empty(&book.audio_url),
            "audioUrl",
            "audio_url",
            "Audio must be an uploaded file URL",
        );

        into_result(errors)
    }
}

#[tracing::instrument(name = "[GET] books", skip_all)]
pub async fn index(State(app_state): State<SharedAppState>) -> Result<Json<Vec<Stored<Book>>>, Error> {
    let result = list_books(app_state.store.as_ref()).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] books/{id}", skip_all, fields(path.id = %id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Book>>, Error> {
    let result = get_book(app_state.store.as_ref(), &id).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[POST] books", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Json(request): Json<BookRequest>,
) -> Result<(StatusCode, Json<Stored<Book>>), Error> {
    request.validate().map_err(Error::Validation)?;

    let result = create_book(app_state.store.as_ref(), request.book).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "[PUT] books/{id}", skip_all, fields(path.id = %id))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
    Query(version): Query<VersionQuery>,
    Json(request): Json<BookRequest>,
) -> Result<Json<Stored<Book>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let result = update_book(
        app_state.store.as_ref(),
        &id,
        request.book,
        version.expected_version,
    )
    .await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[DELETE] books/{id}", skip_all, fields(path.id = %id))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    delete_book(app_state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
