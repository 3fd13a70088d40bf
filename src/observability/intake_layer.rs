//! `tracing` layer that hands events to a [`LogSink`].

use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::forwarder::{LogRecord, LogSink};

/// Target prefix of the forwarder's own diagnostics.
pub const FORWARDER_TARGET: &str = "heartbeat_relay::forwarder";

pub struct IntakeLayer {
    sink: Arc<dyn LogSink>,
}

impl IntakeLayer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

/// Events worth forwarding: INFO and above, never the forwarder's own.
pub fn intake_filter() -> Targets {
    Targets::new()
        .with_default(LevelFilter::INFO)
        .with_target(FORWARDER_TARGET, LevelFilter::OFF)
}

impl<S> Layer<S> for IntakeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut record = LogRecord::new(*meta.level(), meta.target(), visitor.finish());
        record.function = ctx.event_span(event).map(|span| span.name().to_string());
        record.line = meta.line();
        record.module = meta.module_path().map(str::to_owned);

        self.sink.emit(record);
    }
}

/// Collects the `message` field and renders the rest as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Default)]
    struct CaptureSink(Mutex<Vec<LogRecord>>);

    impl LogSink for CaptureSink {
        fn emit(&self, record: LogRecord) {
            self.0.lock().unwrap().push(record);
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Vec<LogRecord> {
        let sink = Arc::new(CaptureSink::default());
        let subscriber = tracing_subscriber::registry()
            .with(IntakeLayer::new(sink.clone()).with_filter(intake_filter()));
        tracing::subscriber::with_default(subscriber, f);
        let records = sink.0.lock().unwrap().clone();
        records
    }

    #[test]
    fn test_event_becomes_record() {
        let records = capture(|| {
            tracing::warn!(target: "demo", count = 3, kind = "disk", "Running low");
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, Level::WARN);
        assert_eq!(record.logger, "demo");
        assert_eq!(record.message, "Running low count=3 kind=disk");
        assert!(record.line.is_some());
        assert_eq!(
            record.module.as_deref(),
            Some("heartbeat_relay::observability::intake_layer::tests")
        );
        assert!(record.function.is_none());
    }

    #[test]
    fn test_span_name_becomes_function() {
        let records = capture(|| {
            let span = tracing::info_span!("trigger_error");
            let _entered = span.enter();
            tracing::error!("boom");
        });
        assert_eq!(records[0].function.as_deref(), Some("trigger_error"));
    }

    #[test]
    fn test_forwarder_diagnostics_and_debug_are_skipped() {
        let records = capture(|| {
            tracing::warn!(target: "heartbeat_relay::forwarder::flusher", "send failed");
            tracing::debug!("noise");
            tracing::info!("kept");
        });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "kept");
    }
}
