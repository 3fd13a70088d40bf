//! Periodic heartbeat.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HeartbeatConfig;
use crate::observability::metrics;
use crate::state::Heartbeat;

pub struct HeartbeatTask {
    heartbeat: Arc<Heartbeat>,
    interval: Duration,
}

impl HeartbeatTask {
    pub fn new(heartbeat: Arc<Heartbeat>, config: &HeartbeatConfig) -> Self {
        Self {
            heartbeat,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Beat immediately, then once per interval until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Heartbeat task starting");

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.beat();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Heartbeat task received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    #[tracing::instrument(name = "heartbeat", skip(self))]
    fn beat(&self) {
        let state = self.heartbeat.beat();
        metrics::record_heartbeat();
        tracing::info!(
            uptime_seconds = state.uptime_seconds,
            "Heartbeat #{} - Application running normally",
            state.count
        );
    }
}
