use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::track_searcher::SearchError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, strum_macros::AsRefStr)]
pub enum Error {
    TrackNotFound,
    Search(SearchError),
    SerializeTrack,
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        Error::Search(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = self.client_status_and_message();

        tracing::debug!("{} -> {} {}", self.as_ref(), status_code, self);

        // Error bodies are fixed plain-text lines; clients match on them.
        (status_code, format!("{message}\n")).into_response()
    }
}

impl Error {
    pub fn client_status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::TrackNotFound => (
                StatusCode::NOT_FOUND,
                "Not Found: Couldn't find a track matching your query.",
            ),

            Self::Search(SearchError::Argument(_)) => (
                StatusCode::BAD_REQUEST,
                "Bad Request: title and at least one of artist and album must be passed as query parameters.",
            ),
            Self::Search(SearchError::Unexpected(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error: An unexpected error occurred.",
            ),
            Self::Search(SearchError::RateLimit(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable: Too many requests to spotify at this time. Please come back another time.",
            ),
            Self::Search(SearchError::ExternalService(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable: The Spotify service used by this API bahaves unexpectedly.",
            ),

            // A searcher handed us something outside its contract. Answer
            // with the generic 500 rather than guessing at a kinder status.
            Self::Search(SearchError::Other(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error: This should never happen.",
            ),

            Self::SerializeTrack => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error: Unable to serialize track.",
            ),
        }
    }
}
