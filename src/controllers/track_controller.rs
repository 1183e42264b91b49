use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::AppState;

/// The search parameters carried by the query string. Absent keys come out
/// as empty strings; whether that combination is searchable is the
/// searcher's call, not ours.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl SearchQuery {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            artist: self.artist.trim().to_string(),
            album: self.album.trim().to_string(),
        }
    }
}

pub struct TrackController;

impl TrackController {
    /// GET /tracks/search?title=..&artist=..&album=..
    ///
    /// Delegates to the injected searcher and translates its outcome into
    /// exactly one response: the serialized track on a match, 404 on the
    /// empty sentinel, or the fixed error body for the failure kind.
    pub async fn find_closest_match(
        State(state): State<AppState>,
        Query(params): Query<SearchQuery>,
    ) -> Result<Response> {
        let query = params.trimmed();

        let track = state
            .searcher
            .find_closest_match(&query.title, &query.artist, &query.album)
            .await?;

        if track.is_empty() {
            return Err(Error::TrackNotFound);
        }

        let body = serde_json::to_string(&track).map_err(|err| {
            tracing::error!("failed to serialize track {track:?}: {err}");
            Error::SerializeTrack
        })?;

        Ok((StatusCode::OK, body).into_response())
    }
}
