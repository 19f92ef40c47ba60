//! Plant endpoint.
//!
//! GET /api/v1/garden/{login}?refresh=
//!
//! Returns the user profile, commit stats, plant health and a mood message.
//! `refresh=true` refetches from GitHub instead of using cached activity.
//!
//! Used by: the plant view and its refresh button

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::garden::SharedGarden;
use crate::models::GardenSnapshot;

pub fn routes(garden: SharedGarden) -> Router {
    Router::new()
        .route("/api/v1/garden/{login}", get(get_garden))
        .with_state(garden)
}

#[derive(Debug, Deserialize)]
struct GardenQuery {
    #[serde(default)]
    refresh: bool,
}

async fn get_garden(
    State(garden): State<SharedGarden>,
    Path(login): Path<String>,
    Query(query): Query<GardenQuery>,
) -> Result<Json<GardenSnapshot>> {
    let snapshot = garden.snapshot(&login, query.refresh).await?;
    Ok(Json(snapshot))
}
