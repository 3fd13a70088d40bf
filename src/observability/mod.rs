//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events
//!         → logging.rs (console, pretty or JSON)
//!         → intake_layer.rs (→ forwarder, when an API key is set)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → remote log intake
//!     → Prometheus scrape (optional)
//! ```

pub mod intake_layer;
pub mod logging;
pub mod metrics;

pub use intake_layer::IntakeLayer;
pub use logging::init_logging;
