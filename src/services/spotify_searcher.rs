use std::env;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::track::Track;
use crate::services::track_searcher::{SearchError, TrackSearcher};

const DEFAULT_SEARCH_URL: &str = "https://ws.spotify.com/search/1/track.json";
const DEFAULT_TERRITORY: &str = "se";

/// Track searcher backed by the Spotify metadata search endpoint.
///
/// Queries the endpoint with the combined title/artist/album terms, keeps
/// only tracks available in the configured territory, and picks the
/// closest-scoring candidate. Upstream trouble is folded into the
/// [`SearchError`] taxonomy: throttling becomes `RateLimit`, everything
/// else on the wire becomes `ExternalService`.
pub struct SpotifySearcher {
    client: reqwest::Client,
    search_url: String,
    territory: String,
}

impl SpotifySearcher {
    pub fn new(search_url: impl Into<String>, territory: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url: search_url.into(),
            territory: territory.into(),
        }
    }

    /// Reads `SPOTIFY_SEARCH_URL` and `SPOTIFY_TERRITORY`, falling back to
    /// the public endpoint and the `se` territory.
    pub fn from_env() -> Self {
        let search_url =
            env::var("SPOTIFY_SEARCH_URL").unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string());
        let territory =
            env::var("SPOTIFY_TERRITORY").unwrap_or_else(|_| DEFAULT_TERRITORY.to_string());
        Self::new(search_url, territory)
    }

    fn closest_match(&self, page: SearchPage, title: &str, artist: &str) -> Track {
        page.tracks
            .into_iter()
            .filter(|entry| available_in(&entry.album.availability.territories, &self.territory))
            .max_by_key(|entry| match_score(entry, title, artist))
            .map(TrackEntry::into_track)
            .unwrap_or_default()
    }
}

#[async_trait]
impl TrackSearcher for SpotifySearcher {
    async fn find_closest_match(
        &self,
        title: &str,
        artist: &str,
        album: &str,
    ) -> Result<Track, SearchError> {
        if title.is_empty() || (artist.is_empty() && album.is_empty()) {
            return Err(SearchError::Argument(
                "title and at least one of artist and album are required".to_string(),
            ));
        }

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", build_query(title, artist, album))])
            .send()
            .await
            .map_err(|err| SearchError::ExternalService(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            return Err(SearchError::RateLimit(format!(
                "spotify search returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(SearchError::ExternalService(format!(
                "spotify search returned {status}"
            )));
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|err| SearchError::ExternalService(err.to_string()))?;

        tracing::debug!("spotify search returned {} candidate(s)", page.tracks.len());

        Ok(self.closest_match(page, title, artist))
    }
}

fn build_query(title: &str, artist: &str, album: &str) -> String {
    let mut query = title.to_string();
    if !artist.is_empty() {
        query.push_str(&format!(" artist:{artist}"));
    }
    if !album.is_empty() {
        query.push_str(&format!(" album:{album}"));
    }
    query
}

/// `territories` is the space-separated code list from the availability
/// block; "worldwide" matches everything.
fn available_in(territories: &str, territory: &str) -> bool {
    territories.eq_ignore_ascii_case("worldwide")
        || territories
            .split_whitespace()
            .any(|code| code.eq_ignore_ascii_case(territory))
}

fn match_score(entry: &TrackEntry, title: &str, artist: &str) -> u32 {
    let mut score = 0;

    if entry.name.eq_ignore_ascii_case(title) {
        score += 4;
    } else if entry.name.to_lowercase().contains(&title.to_lowercase()) {
        score += 2;
    }

    if !artist.is_empty()
        && entry
            .artists
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(artist))
    {
        score += 2;
    }

    score
}

// Wire shape of the search endpoint's JSON payload. Only the fields the
// matcher needs are deserialized.

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    name: String,
    href: String,
    #[serde(default)]
    artists: Vec<ArtistEntry>,
    #[serde(default)]
    album: AlbumEntry,
}

#[derive(Debug, Deserialize)]
struct ArtistEntry {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    availability: Availability,
}

#[derive(Debug, Default, Deserialize)]
struct Availability {
    #[serde(default)]
    territories: String,
}

impl TrackEntry {
    fn into_track(self) -> Track {
        Track {
            name: self.name,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            album: self.album.name,
            href: self.href,
            territories: self.album.availability.territories,
        }
    }
}
