//! Log records handed to a sink.

use chrono::{DateTime, Utc};
use tracing::Level;

/// A single log event, detached from whatever produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Logger name; the `tracing` target for events.
    pub logger: String,
    pub message: String,
    pub thread_name: Option<String>,
    /// Innermost span the event was emitted in.
    pub function: Option<String>,
    pub line: Option<u32>,
    pub module: Option<String>,
}

impl LogRecord {
    /// Build a record stamped with the current time and thread.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            thread_name: std::thread::current().name().map(str::to_owned),
            function: None,
            line: None,
            module: None,
        }
    }

    /// Lowercase severity name, e.g. `warn`.
    pub fn severity(&self) -> String {
        self.level.as_str().to_ascii_lowercase()
    }
}

/// Receiver of log records.
///
/// Implementations must not block: `emit` is called inline from whatever
/// code produced the record, including request handlers.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: LogRecord);
}
