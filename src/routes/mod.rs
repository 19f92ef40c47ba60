//! API route handlers - maps HTTP endpoints to garden operations.
//!
//! Each submodule defines routes for a feature area:
//! - `garden`: Plant snapshot for a GitHub user (GET /api/v1/garden/{login})
//! - `session`: Remembered login across restarts
//! - `status`: Version, day policy and cache info

pub mod garden;
pub mod session;
pub mod status;

use axum::Router;

use crate::garden::SharedGarden;
use session::SharedSession;

pub fn create_router(garden: SharedGarden, session: SharedSession) -> Router {
    Router::new()
        .merge(garden::routes(garden.clone()))
        .merge(session::routes(session))
        .merge(status::routes(garden))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::activity::Clock;
    use crate::error::AppError;
    use crate::garden::GardenService;
    use crate::github::testing::FakeSource;
    use crate::github::ActivitySource;
    use crate::models::RawEvent;
    use crate::session::SessionStore;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-15T18:00:00+00:00").unwrap()
    }

    fn app_with(source: FakeSource, dir: &tempfile::TempDir) -> Router {
        let source: Arc<dyn ActivitySource> = Arc::new(source);
        let garden = Arc::new(GardenService::new(
            source,
            Duration::from_secs(60),
            Clock::Fixed(now()),
        ));
        let session = Arc::new(SessionStore::new(dir.path().join("session.json")));
        create_router(garden, session)
    }

    fn daily_pushes(days: i64) -> Vec<RawEvent> {
        (0..days)
            .map(|d| RawEvent::push(now().with_timezone(&Utc) - TimeDelta::days(d) - TimeDelta::hours(1)))
            .collect()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn garden_returns_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new().with_user("octocat", daily_pushes(10)), &dir);

        let (status, json) = send(app, get("/api/v1/garden/octocat")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["login"], "octocat");
        assert_eq!(json["stats"]["total_commits"], 10);
        assert_eq!(json["stats"]["current_streak"], 10);
        assert_eq!(json["stats"]["longest_streak"], 10);
        assert_eq!(json["stats"]["commit_history"].as_array().unwrap().len(), 10);
        // 50 + 100, then 20 misses: 2 + 16 * 5
        assert_eq!(json["health"]["current"], 68);
        assert_eq!(json["health"]["state"], "okay");
        assert_eq!(json["health"]["trend"], "improving");
        assert!(json["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn garden_unknown_user_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new(), &dir);

        let (status, json) = send(app, get("/api/v1/garden/ghost")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn garden_rate_limit_is_429_with_retry_after() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::failing(AppError::RateLimited {
            retry_after: Some(Duration::from_secs(120)),
        });
        let app = app_with(source, &dir);

        let resp = app.oneshot(get("/api/v1/garden/octocat")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers()[header::RETRY_AFTER], "120");
    }

    #[tokio::test]
    async fn garden_transport_failure_is_502() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::failing(AppError::Transport("boom".into())), &dir);

        let (status, _) = send(app, get("/api/v1/garden/octocat?refresh=true")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn garden_invalid_login_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new(), &dir);

        let (status, _) = send(app, get("/api/v1/garden/-bad-")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new(), &dir);

        let (status, json) = send(app.clone(), get("/api/v1/session")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["login"].is_null());

        let put = Request::builder()
            .method("PUT")
            .uri("/api/v1/session")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"login": "octocat"}).to_string()))
            .unwrap();
        let (status, json) = send(app.clone(), put).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["login"], "octocat");

        let (_, json) = send(app.clone(), get("/api/v1/session")).await;
        assert_eq!(json["login"], "octocat");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/v1/session")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), delete).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(app, get("/api/v1/session")).await;
        assert!(json["login"].is_null());
    }

    #[tokio::test]
    async fn session_rejects_invalid_login() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new(), &dir);

        let put = Request::builder()
            .method("PUT")
            .uri("/api/v1/session")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"login": "no spaces"}"#))
            .unwrap();
        let (status, _) = send(app, put).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn status_reports_day_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(FakeSource::new(), &dir);

        let (status, json) = send(app, get("/api/v1/status")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["day_boundary"], "fixed");
        assert_eq!(json["cache"]["ttl_secs"], 60);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
