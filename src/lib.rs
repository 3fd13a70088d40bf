//! Heartbeat relay library.
//!
//! A small web service that keeps a heartbeat, generates demo errors, and
//! forwards its own structured logs in batches to a remote HTTP log intake.

pub mod config;
pub mod error;
pub mod forwarder;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod state;
pub mod tasks;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
pub use lifecycle::{Services, Shutdown};
