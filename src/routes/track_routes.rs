use axum::{routing::get, Router};

use crate::{controllers::track_controller::TrackController, AppState};

pub struct TrackRoutes;

impl TrackRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new().route("/search", get(TrackController::find_closest_match))
    }
}
