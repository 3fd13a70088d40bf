//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → handlers.rs (read snapshots / record manual errors)
//!     → JSON response
//! ```
//!
//! Handlers never wait on the log intake; forwarding happens on the
//! flusher task.

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer, IntakeInfo};
