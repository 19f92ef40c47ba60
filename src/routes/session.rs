//! Last-used login endpoints.
//!
//! - GET /api/v1/session
//!   Returns the remembered login, if any.
//!   Used by: startup, to skip the username prompt
//!
//! - PUT /api/v1/session { login: string }
//!   Validates and remembers a login.
//!
//! - DELETE /api/v1/session
//!   Forgets the login ("change user").

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::github::validate_login;
use crate::models::SessionInfo;
use crate::session::SessionStore;

pub type SharedSession = Arc<SessionStore>;

pub fn routes(store: SharedSession) -> Router {
    Router::new()
        .route(
            "/api/v1/session",
            get(get_session).put(put_session).delete(delete_session),
        )
        .with_state(store)
}

async fn get_session(State(store): State<SharedSession>) -> Json<SessionInfo> {
    Json(store.load())
}

#[derive(Debug, Deserialize)]
struct SessionRequest {
    login: String,
}

async fn put_session(
    State(store): State<SharedSession>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionInfo>> {
    let login = validate_login(&request.login)?;
    let info = store.save(&login)?;
    Ok(Json(info))
}

async fn delete_session(State(store): State<SharedSession>) -> Result<Json<()>> {
    store.clear()?;
    Ok(Json(()))
}
