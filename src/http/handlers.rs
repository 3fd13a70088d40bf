use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use thiserror::Error;

use crate::http::server::AppState;
use crate::state::{ErrorKind, ErrorRecord, HeartbeatState};

const HOME_PAGE: &str = "<!doctype html>\n<html><head><title>heartbeat-relay</title></head>\n<body><h1>heartbeat-relay</h1>\n<p>See <a href=\"/api/status\">/api/status</a> and <a href=\"/heartbeat\">/heartbeat</a>.</p>\n</body></html>\n";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct IntakeStatus {
    pub logs_enabled: bool,
    pub service: String,
    pub env: String,
    pub site: String,
    pub buffered_entries: usize,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub heartbeat: HeartbeatState,
    pub error_count: u64,
    pub recent_errors: Vec<ErrorRecord>,
    pub intake: IntakeStatus,
}

#[derive(Serialize)]
pub struct TriggerResponse {
    pub status: &'static str,
    pub error: String,
    pub id: String,
}

#[derive(Serialize)]
pub struct TestLogsResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub tested_types: [&'static str; 4],
}

pub async fn home() -> Html<&'static str> {
    tracing::info!("Home page accessed");
    Html(HOME_PAGE)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn heartbeat(State(state): State<AppState>) -> Json<HeartbeatState> {
    Json(state.heartbeat.snapshot().as_ref().clone())
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let errors = state.errors.snapshot();
    let intake = IntakeStatus {
        logs_enabled: state.forwarder.is_some(),
        service: state.intake.service.clone(),
        env: state.intake.env.clone(),
        site: state.intake.site.clone(),
        buffered_entries: state.forwarder.as_ref().map_or(0, |f| f.buffered()),
    };

    Json(StatusResponse {
        heartbeat: state.heartbeat.snapshot().as_ref().clone(),
        error_count: errors.error_count,
        recent_errors: errors.recent_errors,
        intake,
    })
}

#[tracing::instrument(name = "trigger_error", skip_all)]
pub async fn trigger_error(State(state): State<AppState>) -> Json<TriggerResponse> {
    let record = state.errors.record(ErrorKind::ManualError);
    tracing::error!("{}", record.message);

    Json(TriggerResponse {
        status: "error_triggered",
        error: record.message,
        id: record.id,
    })
}

#[derive(Debug, Error)]
#[error("attempted to divide {dividend} by zero")]
struct DivisionByZero {
    dividend: i64,
}

fn checked_divide(dividend: i64, divisor: i64) -> Result<i64, DivisionByZero> {
    dividend
        .checked_div(divisor)
        .ok_or(DivisionByZero { dividend })
}

/// Emit one log line per level so the intake side can be checked by hand.
#[tracing::instrument(name = "test_app_logs", skip_all)]
pub async fn test_app_logs() -> Json<TestLogsResponse> {
    tracing::info!("--- Starting Application Log Test ---");
    tracing::info!("This is a test INFO message from the application logger.");
    tracing::warn!("This is a test WARNING message from the application logger.");
    tracing::error!("This is a test ERROR message from the application logger.");

    if let Err(e) = checked_divide(1, 0) {
        tracing::error!(error = %e, error_debug = ?e, "This is a test EXCEPTION log.");
    }

    tracing::info!("--- Application Log Test Complete ---");

    Json(TestLogsResponse {
        status: "test_completed",
        message: "Check your console and the log intake for the test messages.",
        tested_types: ["info", "warn", "error", "error with error value"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_divide() {
        assert_eq!(checked_divide(10, 2).unwrap(), 5);
        let err = checked_divide(1, 0).unwrap_err();
        assert_eq!(err.to_string(), "attempted to divide 1 by zero");
    }
}
