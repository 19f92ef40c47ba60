//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `InvalidUsername` → 400
//! - `NotFound` → 404
//! - `RateLimited` → 429 (with `Retry-After` when known)
//! - `Transport` → 502
//! - `Internal` → 500
//!
//! The derivation core never produces these; they only come from the GitHub
//! boundary, the session file and lock handling.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("User '{0}' not found. Please check the username and try again.")]
    NotFound(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Failed to reach GitHub: {0}")]
    Transport(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            AppError::RateLimited { retry_after } => *retry_after,
            _ => None,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        let mut response = (status, body).into_response();
        if let Some(wait) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&wait.as_secs().to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
