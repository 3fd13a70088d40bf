//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;

use heartbeat_relay::config::RelayConfig;
use heartbeat_relay::forwarder::LogEntry;
use heartbeat_relay::{HttpServer, Services, Shutdown};

/// One POST as seen by the mock intake.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ReceivedBatch {
    pub api_key: Option<String>,
    pub entries: Vec<LogEntry>,
    pub accepted: bool,
}

#[derive(Clone, Default)]
struct IntakeState {
    received: Arc<Mutex<Vec<ReceivedBatch>>>,
    status: Arc<AtomicU16>,
}

/// Programmable stand-in for the log intake.
pub struct MockIntake {
    pub addr: SocketAddr,
    state: IntakeState,
}

#[allow(dead_code)]
impl MockIntake {
    pub fn url(&self) -> String {
        format!("http://{}/api/v2/logs", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<ReceivedBatch> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn accepted_entries(&self) -> Vec<LogEntry> {
        self.received()
            .into_iter()
            .filter(|b| b.accepted)
            .flat_map(|b| b.entries)
            .collect()
    }

    /// Poll until `predicate` holds on the accepted entries, or time out.
    pub async fn wait_for<F>(&self, predicate: F) -> Vec<LogEntry>
    where
        F: Fn(&[LogEntry]) -> bool,
    {
        for _ in 0..100 {
            let entries = self.accepted_entries();
            if predicate(&entries) {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("mock intake never received the expected entries: {:?}", self.accepted_entries());
    }
}

async fn intake_handler(
    State(state): State<IntakeState>,
    headers: HeaderMap,
    Json(entries): Json<Vec<LogEntry>>,
) -> StatusCode {
    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let api_key = headers
        .get("dd-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    state.received.lock().unwrap().push(ReceivedBatch {
        api_key,
        entries,
        accepted: status.is_success(),
    });
    status
}

/// Start a mock intake answering 202 Accepted.
pub async fn start_mock_intake() -> MockIntake {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = IntakeState::default();
    state.status.store(202, Ordering::SeqCst);

    let app = Router::new()
        .route("/api/v2/logs", post(intake_handler))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockIntake { addr, state }
}

/// Config pointing at `intake` with a test key and background noise off.
#[allow(dead_code)]
pub fn relay_config(intake: &MockIntake, max_entries: usize) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.intake.api_key = Some("test-key".into());
    config.intake.url = Some(intake.url());
    config.intake.timeout_secs = 2;
    config.batch.max_entries = max_entries;
    config.batch.flush_interval_secs = 1;
    config.mock_errors.enabled = false;
    config
}

/// Start the relay's HTTP server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_relay(services: &Services, config: &RelayConfig, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config.listener, services.app_state(config));
    tokio::spawn(server.run(listener, shutdown.subscribe()));
    addr
}
