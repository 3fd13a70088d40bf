//! Batching forwarder: buffers entries and ships them to the intake.
//!
//! `emit` never touches the network. Size-triggered batches and the
//! periodic flush are both sent from the task running [`Forwarder::run`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::BatchConfig;
use crate::forwarder::batch::LogBatch;
use crate::forwarder::client::IntakeClient;
use crate::forwarder::entry::{EntryTemplate, LogEntry};
use crate::forwarder::record::{LogRecord, LogSink};
use crate::observability::metrics;

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was buffered; no request was made.
    Idle,
    /// Entries accepted by the intake.
    Sent(usize),
    /// The request failed and the entries were kept.
    Retained(usize),
}

pub struct Forwarder {
    batch: Mutex<LogBatch<LogEntry>>,
    template: EntryTemplate,
    client: Arc<dyn IntakeClient>,
    flush_interval: Duration,
    wake: Notify,
    send_lock: tokio::sync::Mutex<()>,
}

impl Forwarder {
    pub fn new(template: EntryTemplate, config: &BatchConfig, client: Arc<dyn IntakeClient>) -> Self {
        Self {
            batch: Mutex::new(LogBatch::new(config.max_entries, config.max_retained)),
            template,
            client,
            flush_interval: Duration::from_secs(config.flush_interval_secs),
            wake: Notify::new(),
            send_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Format and buffer a record. Wakes the flusher when a batch fills up.
    pub fn emit(&self, record: LogRecord) {
        let entry = self.template.entry(record);
        let sealed = self.batch().push(entry);
        if sealed {
            self.wake.notify_one();
        }
    }

    /// Send everything buffered as a single request.
    pub async fn flush(&self) -> FlushOutcome {
        let _guard = self.send_lock.lock().await;
        let entries = self.batch().take_all();
        self.send(entries).await
    }

    /// Send size-triggered batches in order, stopping at the first failure.
    pub async fn flush_sealed(&self) -> FlushOutcome {
        let _guard = self.send_lock.lock().await;
        let mut sent = 0;
        loop {
            let next = self.batch().take_sealed();
            let Some(entries) = next else { break };
            match self.send(entries).await {
                FlushOutcome::Sent(n) => sent += n,
                retained @ FlushOutcome::Retained(_) => return retained,
                FlushOutcome::Idle => {}
            }
        }
        if sent == 0 {
            FlushOutcome::Idle
        } else {
            FlushOutcome::Sent(sent)
        }
    }

    /// Entries currently buffered, including sealed batches.
    pub fn buffered(&self) -> usize {
        self.batch().len()
    }

    /// Flush loop. Runs until shutdown; unsent entries are not drained.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.flush_interval.as_secs(),
            "Log flusher starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.flush().await;
                }
                _ = self.wake.notified() => {
                    self.flush_sealed().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(buffered = self.buffered(), "Log flusher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn send(&self, entries: Vec<LogEntry>) -> FlushOutcome {
        self.report_dropped();
        if entries.is_empty() {
            return FlushOutcome::Idle;
        }

        let count = entries.len();
        let outcome = match self.client.send_batch(&entries).await {
            Ok(()) => {
                tracing::info!(count, "Sent log entries to intake");
                metrics::record_intake_sent(count);
                FlushOutcome::Sent(count)
            }
            Err(e) => {
                tracing::warn!(count, error = %e, "Failed to send log entries, keeping them for the next flush");
                self.batch().restore(entries);
                metrics::record_intake_retained(count);
                FlushOutcome::Retained(count)
            }
        };
        metrics::record_buffered(self.buffered());
        outcome
    }

    fn report_dropped(&self) {
        let dropped = self.batch().take_dropped();
        if dropped > 0 {
            tracing::warn!(dropped, "Log buffer over capacity, oldest entries dropped");
            metrics::record_intake_dropped(dropped);
        }
    }

    fn batch(&self) -> MutexGuard<'_, LogBatch<LogEntry>> {
        self.batch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for Forwarder {
    fn emit(&self, record: LogRecord) {
        Forwarder::emit(self, record);
    }
}
