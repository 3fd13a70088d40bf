//! Structured logging setup.
//!
//! Console output via `tracing-subscriber`'s fmt layer (pretty or JSON);
//! when a sink is given, events are also handed to it through
//! [`IntakeLayer`]. `RUST_LOG` overrides the configured level.

use std::sync::Arc;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::forwarder::LogSink;
use crate::observability::intake_layer::{intake_filter, IntakeLayer};

/// Install the global subscriber.
pub fn init_logging(
    config: &ObservabilityConfig,
    sink: Option<Arc<dyn LogSink>>,
) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));
    let intake = sink.map(|sink| IntakeLayer::new(sink).with_filter(intake_filter()));

    let registry = tracing_subscriber::registry().with(filter).with(intake);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    }
}
