//! HTTP handlers. Thin shaping over the orchestrator; no business logic.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::server::AppState;

pub async fn healthz() -> impl IntoResponse {
    Json(json!({"status": "up"}))
}

/// Serve the usage snapshot.
///
/// Fresh and cached results are shaped identically: the snapshot body with
/// `Cache-Control: immutable` and an absolute `Expires` HTTP-date, so
/// intermediaries can hold the response until the snapshot itself expires.
pub async fn usage(State(state): State<AppState>) -> Response {
    match state.usage.invoke(tally_core::now_utc()).await {
        Ok(snapshot) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("immutable"));
            let expires = httpdate::fmt_http_date(snapshot.expires_at.into());
            if let Ok(value) = HeaderValue::from_str(&expires) {
                headers.insert(header::EXPIRES, value);
            }
            (StatusCode::OK, headers, snapshot.body).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "usage invocation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

pub async fn metrics() -> Response {
    match crate::metrics::render_metrics() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics exporter not initialized",
        )
            .into_response(),
    }
}
