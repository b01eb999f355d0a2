use axum::http::StatusCode;

/// Domain operations that were refused on otherwise valid input.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ContentError {
    #[error("Chapter {0} does not exist")]
    ChapterNotFound(i64),
    #[error("Episode {0} does not exist")]
    EpisodeNotFound(String),
    #[error("Series {0} does not exist")]
    UnknownSeries(String),
    #[error("Position {index} is out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Category is empty")]
    EmptyCategory,
    #[error("Category {0} already exists")]
    DuplicateCategory(String),
    #[error("Unknown page type {0}")]
    UnknownPage(String),
    #[error("There is no active poll")]
    NoActivePoll,
    #[error("A poll is already active")]
    PollAlreadyActive,
    #[error("Option {0} is not part of the active poll")]
    UnknownOption(String),
    #[error("You have already voted in this poll")]
    AlreadyVoted,
    #[error("Notification {0} has already been dispatched")]
    AlreadyDispatched(String),
    #[error("Too many concurrent updates, try again")]
    Contention,
}

impl ContentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::ChapterNotFound(_)
            | ContentError::EpisodeNotFound(_)
            | ContentError::UnknownPage(_)
            | ContentError::NoActivePoll => StatusCode::NOT_FOUND,
            ContentError::UnknownSeries(_)
            | ContentError::IndexOutOfRange { .. }
            | ContentError::UnknownOption(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ContentError::EmptyCategory => StatusCode::BAD_REQUEST,
            ContentError::DuplicateCategory(_)
            | ContentError::PollAlreadyActive
            | ContentError::AlreadyVoted
            | ContentError::AlreadyDispatched(_) => StatusCode::CONFLICT,
            ContentError::Contention => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
