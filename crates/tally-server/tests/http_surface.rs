//! Tests of the thin HTTP shaping over the orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use tally_backends::{
    BackendClient, BackendError, EventPage, EventStore, UserDirectory, UserPage,
};
use tally_cache::MemorySnapshotStore;
use tally_core::{UserRecord, UserStatus};
use tally_server::{AppState, UsageService, build_app};

struct SinglePageDirectory;

#[async_trait]
impl UserDirectory for SinglePageDirectory {
    async fn list_users(&self, _page_token: Option<&str>) -> Result<UserPage, BackendError> {
        Ok(UserPage {
            users: vec![UserRecord {
                enabled: true,
                status: UserStatus::Confirmed,
            }],
            next_token: None,
        })
    }
}

struct EmptyEventStore;

#[async_trait]
impl EventStore for EmptyEventStore {
    async fn scan_events(
        &self,
        _window_start: OffsetDateTime,
        _continuation: Option<&str>,
    ) -> Result<EventPage, BackendError> {
        Ok(EventPage::default())
    }
}

struct UnavailableDirectory;

#[async_trait]
impl UserDirectory for UnavailableDirectory {
    async fn list_users(&self, _page_token: Option<&str>) -> Result<UserPage, BackendError> {
        Err(BackendError::status("user directory", 503))
    }
}

fn app_with(directory: Arc<dyn UserDirectory>) -> axum::Router {
    let service = UsageService::new(
        Arc::new(MemorySnapshotStore::new()),
        BackendClient::new(directory, Arc::new(EmptyEventStore)),
        "usage",
        Duration::hours(24),
    );
    build_app(AppState {
        usage: Arc::new(service),
    })
}

#[tokio::test]
async fn usage_endpoint_serves_snapshot_with_cache_headers() {
    let app = app_with(Arc::new(SinglePageDirectory));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats/usage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );
    assert_eq!(
        headers.get("cache-control").unwrap().to_str().unwrap(),
        "immutable"
    );
    // Absolute HTTP-date, e.g. "Thu, 02 May 2024 12:00:00 GMT".
    let expires = headers.get("expires").unwrap().to_str().unwrap();
    assert!(expires.ends_with("GMT"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["confirmedUsers"], 1);
    assert_eq!(stats["MAUs"], 0);
    assert_eq!(stats["WAUs"], 0);
}

#[tokio::test]
async fn backend_outage_maps_to_internal_server_error() {
    let app = app_with(Arc::new(UnavailableDirectory));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats/usage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["error"], "Internal server error");
}

#[tokio::test]
async fn healthz_reports_up() {
    let app = app_with(Arc::new(SinglePageDirectory));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
