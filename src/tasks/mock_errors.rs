//! Mock error generator.
//!
//! Purely cosmetic: records a synthetic error at random intervals so there
//! is something to look at in the log backend.

use std::sync::Arc;
use std::time::Duration;
use rand::Rng;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::MockErrorConfig;
use crate::state::{ErrorKind, ErrorLog, ErrorRecord};

pub struct MockErrorTask {
    errors: Arc<ErrorLog>,
    min_interval: u64,
    max_interval: u64,
}

impl MockErrorTask {
    pub fn new(errors: Arc<ErrorLog>, config: &MockErrorConfig) -> Self {
        Self {
            errors,
            min_interval: config.min_interval_secs,
            max_interval: config.max_interval_secs.max(config.min_interval_secs),
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            min_interval_secs = self.min_interval,
            max_interval_secs = self.max_interval,
            "Mock error generator starting"
        );

        loop {
            let delay = self.next_delay();
            tokio::select! {
                _ = time::sleep(delay) => {
                    self.generate();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Mock error generator received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn next_delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_interval..=self.max_interval);
        Duration::from_secs(secs)
    }

    #[tracing::instrument(name = "mock_error_generator", skip(self))]
    fn generate(&self) -> ErrorRecord {
        let record = self.errors.record(ErrorKind::random_synthetic());
        tracing::error!("{}", record.message);
        record
    }
}
