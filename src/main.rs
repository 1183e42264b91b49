use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use uuid::Uuid;

use crate::{
    routes::track_routes::TrackRoutes,
    services::{spotify_searcher::SpotifySearcher, track_searcher::TrackSearcher},
};

pub use self::error::{Error, Result};

mod controllers;
mod error;
mod models;
mod routes;
mod services;

#[derive(Clone)]
struct AppState {
    searcher: Arc<dyn TrackSearcher>,
}

#[tokio::main]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!("Starting Track Search API...");

    let searcher = SpotifySearcher::from_env();
    let app_state = AppState {
        searcher: Arc::new(searcher),
    };

    let routes_all = app(app_state);

    let host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, routes_all).await?;

    Ok(())
}

fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/tracks", TrackRoutes::routes())
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(
                    |response: &Response<Body>, latency: Duration, _span: &Span| {
                        let status = response.status();
                        let latency_ms = latency.as_millis();

                        match status.as_u16() {
                            200..=299 => tracing::info!("{} ({}ms)", status, latency_ms),
                            400..=499 => tracing::warn!("⚠️ {} ({}ms)", status, latency_ms),
                            500..=599 => tracing::error!("❌ {} ({}ms)", status, latency_ms),
                            _ => tracing::info!("{} ({}ms)", status, latency_ms),
                        }
                    },
                ),
        )
        .layer(CorsLayer::very_permissive())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "track_search_api=debug,tower_http=info,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::models::track::Track;
    use crate::services::track_searcher::StubSearcher;

    async fn request(router: Router, uri: &str) -> anyhow::Result<(StatusCode, String)> {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok((status, String::from_utf8(body.to_vec())?))
    }

    fn app_with_stub(searcher: StubSearcher) -> Router {
        app(AppState {
            searcher: Arc::new(searcher),
        })
    }

    #[tokio::test]
    async fn search_without_a_title_is_a_bad_request() -> anyhow::Result<()> {
        // The real searcher rejects the arguments before touching the network.
        let router = app(AppState {
            searcher: Arc::new(SpotifySearcher::new("http://localhost:1", "se")),
        });

        let (status, body) = request(router, "/tracks/search?artist=nirvana").await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "Bad Request: title and at least one of artist and album must be passed as query parameters.\n"
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_with_a_match_returns_the_serialized_track() -> anyhow::Result<()> {
        let track = Track {
            name: "Come As You Are".to_string(),
            artists: vec!["Nirvana".to_string()],
            album: "Nirvana".to_string(),
            href: "spotify:track:5r35Zd5Onw3aV3Gm9XdgtI".to_string(),
            territories: "SE NO DK".to_string(),
        };
        let router = app_with_stub(StubSearcher {
            track: track.clone(),
            err: None,
        });

        let (status, body) = request(router, "/tracks/search?title=come&artist=nirvana").await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_string(&track).unwrap());

        Ok(())
    }

    #[tokio::test]
    async fn search_with_no_match_is_not_found() -> anyhow::Result<()> {
        let router = app_with_stub(StubSearcher {
            track: Track::default(),
            err: None,
        });

        let (status, body) =
            request(router, "/tracks/search?title=qwerasdfzxcv&artist=nirvana").await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found: Couldn't find a track matching your query.\n");

        Ok(())
    }

    #[tokio::test]
    async fn a_searcher_breaking_its_contract_is_an_internal_error() -> anyhow::Result<()> {
        use crate::services::track_searcher::SearchError;

        let router = app_with_stub(StubSearcher {
            track: Track::default(),
            err: Some(SearchError::Other("This error is really unexpected.".to_string())),
        });

        let (status, body) = request(router, "/tracks/search?title=come&artist=nirvana").await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error: This should never happen.\n");

        Ok(())
    }

    #[tokio::test]
    async fn query_values_are_percent_decoded_and_trimmed() -> anyhow::Result<()> {
        let track = Track {
            name: "Human Behaviour".to_string(),
            artists: vec!["Björk".to_string()],
            album: "Debut".to_string(),
            href: "spotify:track:3jAs2jhHIMjzWrQ5uEirdp".to_string(),
            territories: "SE".to_string(),
        };
        let router = app_with_stub(StubSearcher {
            track: track.clone(),
            err: None,
        });

        let (status, body) = request(
            router,
            "/tracks/search?title=%20human%20behaviour%20&artist=bj%C3%B6rk",
        ).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_string(&track).unwrap());

        Ok(())
    }
}
