//! Log forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! tracing event
//!     → observability::intake_layer (event → LogRecord)
//!     → LogSink::emit (record.rs)
//!     → entry.rs (LogRecord → LogEntry wire format)
//!     → batch.rs (pending; sealed at max_entries)
//!     → flusher.rs (timer or wake-up)
//!     → client.rs (one POST per batch)
//! ```
//!
//! # Design Decisions
//! - Best effort: failures are logged locally and never reach callers
//! - Failed batches are kept, bounded by `batch.max_retained`
//! - No retries or backoff beyond the next scheduled flush
//! - Nothing is drained on shutdown

pub mod batch;
pub mod client;
pub mod entry;
pub mod flusher;
pub mod record;

pub use client::{HttpIntakeClient, IntakeClient, IntakeError};
pub use entry::{EntryTemplate, LogEntry};
pub use flusher::{FlushOutcome, Forwarder};
pub use record::{LogRecord, LogSink};
