//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown broadcast fires

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{IntakeConfig, ListenerConfig};
use crate::forwarder::Forwarder;
use crate::http::handlers;
use crate::state::{ErrorLog, Heartbeat};

/// Static description of the intake, reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeInfo {
    pub service: String,
    pub env: String,
    pub site: String,
}

impl IntakeInfo {
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self {
            service: config.service.clone(),
            env: config.env.clone(),
            site: config.site.clone(),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub heartbeat: Arc<Heartbeat>,
    pub errors: Arc<ErrorLog>,
    pub forwarder: Option<Arc<Forwarder>>,
    pub intake: Arc<IntakeInfo>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ListenerConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::home))
            .route("/health", get(handlers::health))
            .route("/heartbeat", get(handlers::heartbeat))
            .route("/api/status", get(handlers::status))
            .route("/api/trigger-error", post(handlers::trigger_error))
            .route("/api/test-app-logs", post(handlers::test_app_logs))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until shutdown is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
