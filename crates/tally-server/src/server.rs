use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, handlers, usage::UsageService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub usage: Arc<UsageService>,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/stats/usage", get(handlers::usage))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct TallyServer {
    addr: SocketAddr,
    app: Router,
}

impl TallyServer {
    pub fn new(cfg: &ServerConfig, state: AppState) -> Result<Self, String> {
        let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
            .parse()
            .map_err(|e| format!("invalid server address: {e}"))?;
        Ok(Self {
            addr,
            app: build_app(state),
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!(addr = %self.addr, "tally server listening");
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown handler");
    }
}
