//! Service status endpoint.
//!
//! GET /api/v1/status
//!
//! Returns the server version, the day-boundary policy used for streaks and
//! how many users currently have cached activity.

use axum::{extract::State, routing::get, Json, Router};

use crate::garden::SharedGarden;
use crate::models::ServiceStatus;

pub fn routes(garden: SharedGarden) -> Router {
    Router::new()
        .route("/api/v1/status", get(get_status))
        .with_state(garden)
}

async fn get_status(State(garden): State<SharedGarden>) -> Json<ServiceStatus> {
    Json(garden.status())
}
