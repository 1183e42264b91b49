use async_trait::async_trait;

use crate::models::track::Track;

/// Failure taxonomy reported by a [`TrackSearcher`].
///
/// The four recognized kinds each map to a fixed HTTP response (see
/// `crate::error`). `Other` is the explicit catch-all arm for anything a
/// searcher reports outside the taxonomy; reaching it means the searcher
/// broke its contract, and the handler answers 500 rather than guessing.
/// The carried string is diagnostic only and never leaks into a response
/// body.
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::AsRefStr)]
pub enum SearchError {
    Argument(String),
    Unexpected(String),
    RateLimit(String),
    ExternalService(String),
    Other(String),
}

impl core::fmt::Display for SearchError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for SearchError {}

/// The single capability this API needs from a search backend.
///
/// Implementations own validation (a missing title, or missing artist and
/// album together, is an `Argument` failure) and signal "no match" by
/// returning the empty sentinel `Track::default()` with no error.
#[async_trait]
pub trait TrackSearcher: Send + Sync {
    async fn find_closest_match(
        &self,
        title: &str,
        artist: &str,
        album: &str,
    ) -> Result<Track, SearchError>;
}

/// Canned searcher for handler and router tests.
#[cfg(test)]
pub struct StubSearcher {
    pub track: Track,
    pub err: Option<SearchError>,
}

#[cfg(test)]
#[async_trait]
impl TrackSearcher for StubSearcher {
    async fn find_closest_match(
        &self,
        _title: &str,
        _artist: &str,
        _album: &str,
    ) -> Result<Track, SearchError> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(self.track.clone()),
        }
    }
}
