//! Synthetic error records and the bounded history of recent ones.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    DatabaseTimeout,
    NetworkError,
    ValidationError,
    ProcessingError,
    ManualError,
}

impl ErrorKind {
    /// Kinds the mock generator picks from.
    pub const SYNTHETIC: [ErrorKind; 4] = [
        ErrorKind::DatabaseTimeout,
        ErrorKind::NetworkError,
        ErrorKind::ValidationError,
        ErrorKind::ProcessingError,
    ];

    pub fn random_synthetic() -> Self {
        *Self::SYNTHETIC
            .choose(&mut rand::thread_rng())
            .unwrap_or(&ErrorKind::ProcessingError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DatabaseTimeout => "DatabaseTimeout",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::ProcessingError => "ProcessingError",
            ErrorKind::ManualError => "ManualError",
        }
    }

    fn id_tag(&self) -> &'static str {
        match self {
            ErrorKind::DatabaseTimeout => "DAT",
            ErrorKind::NetworkError => "NET",
            ErrorKind::ValidationError => "VAL",
            ErrorKind::ProcessingError => "PRO",
            ErrorKind::ManualError => "MANUAL",
        }
    }

    fn message(&self, id: &str) -> String {
        let detail = match self {
            ErrorKind::DatabaseTimeout => "Query exceeded the 30s deadline",
            ErrorKind::NetworkError => "Upstream connection reset by peer",
            ErrorKind::ValidationError => "Payload failed schema validation",
            ErrorKind::ProcessingError => "Worker aborted while processing job",
            ErrorKind::ManualError => {
                return format!("[MANUAL ERROR] User triggered test error (ID: {})", id);
            }
        };
        format!("[{}] {} (ID: {})", self.as_str(), detail, id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    pub id: String,
}

/// Fixed-capacity history; the oldest record is evicted on overflow.
#[derive(Debug, Clone)]
pub struct RecentErrors {
    records: VecDeque<ErrorRecord>,
    capacity: usize,
}

impl RecentErrors {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, returning the evicted one if the history was full.
    pub fn push(&mut self, record: ErrorRecord) -> Option<ErrorRecord> {
        let evicted = if self.records.len() == self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records oldest first.
    pub fn to_vec(&self) -> Vec<ErrorRecord> {
        self.records.iter().cloned().collect()
    }
}

/// Read-only view served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSnapshot {
    pub error_count: u64,
    pub recent_errors: Vec<ErrorRecord>,
}

struct ErrorLogInner {
    recent: RecentErrors,
    total: u64,
}

/// Error counter plus recent history, updated together.
pub struct ErrorLog {
    inner: Mutex<ErrorLogInner>,
    sequence: AtomicU64,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ErrorLogInner {
                recent: RecentErrors::new(capacity),
                total: 0,
            }),
            sequence: AtomicU64::new(0),
        }
    }

    /// Create and store a record of the given kind.
    pub fn record(&self, kind: ErrorKind) -> ErrorRecord {
        let id = self.next_id(kind);
        let record = ErrorRecord {
            timestamp: Utc::now(),
            kind,
            message: kind.message(&id),
            id,
        };

        {
            let mut inner = self.lock();
            inner.recent.push(record.clone());
            inner.total += 1;
        }
        metrics::record_error(kind.as_str());
        record
    }

    pub fn snapshot(&self) -> ErrorSnapshot {
        let inner = self.lock();
        ErrorSnapshot {
            error_count: inner.total,
            recent_errors: inner.recent.to_vec(),
        }
    }

    /// `ERR-<TAG>-<sequence>-<random>`; the sequence keeps ids unique per
    /// process.
    fn next_id(&self, kind: ErrorKind) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let salt: u16 = rand::thread_rng().gen_range(0x1000..=0xFFFF);
        format!("ERR-{}-{:06}-{:04X}", kind.id_tag(), seq, salt)
    }

    fn lock(&self) -> MutexGuard<'_, ErrorLogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
