//! Startup orchestration.
//!
//! Builds the shared state and the optional forwarder from configuration,
//! then spawns the background tasks. Logging must be initialized with
//! [`Services::log_sink`] before [`Services::spawn_tasks`] so the first
//! heartbeat is forwarded.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::RelayConfig;
use crate::forwarder::{EntryTemplate, Forwarder, HttpIntakeClient, IntakeClient, IntakeError, LogSink};
use crate::http::server::{AppState, IntakeInfo};
use crate::lifecycle::Shutdown;
use crate::state::{ErrorLog, Heartbeat};
use crate::tasks::{HeartbeatTask, MockErrorTask};

pub struct Services {
    pub heartbeat: Arc<Heartbeat>,
    pub errors: Arc<ErrorLog>,
    /// Present only when an intake API key is configured.
    pub forwarder: Option<Arc<Forwarder>>,
}

impl Services {
    /// Build services, posting to the configured HTTP intake.
    pub fn build(config: &RelayConfig) -> Result<Self, IntakeError> {
        let client: Option<Arc<dyn IntakeClient>> = if config.intake.enabled() {
            Some(Arc::new(HttpIntakeClient::new(&config.intake)?))
        } else {
            None
        };
        Ok(Self::with_client(config, client))
    }

    /// Build services around an arbitrary intake client.
    pub fn with_client(config: &RelayConfig, client: Option<Arc<dyn IntakeClient>>) -> Self {
        let forwarder = client.map(|client| {
            Arc::new(Forwarder::new(
                EntryTemplate::from_config(&config.intake),
                &config.batch,
                client,
            ))
        });

        Self {
            heartbeat: Arc::new(Heartbeat::new()),
            errors: Arc::new(ErrorLog::new(config.mock_errors.history_capacity)),
            forwarder,
        }
    }

    /// Sink for the logging layer, if forwarding is enabled.
    pub fn log_sink(&self) -> Option<Arc<dyn LogSink>> {
        self.forwarder
            .clone()
            .map(|forwarder| forwarder as Arc<dyn LogSink>)
    }

    /// State shared with HTTP handlers.
    pub fn app_state(&self, config: &RelayConfig) -> AppState {
        AppState {
            heartbeat: self.heartbeat.clone(),
            errors: self.errors.clone(),
            forwarder: self.forwarder.clone(),
            intake: Arc::new(IntakeInfo::from_config(&config.intake)),
        }
    }

    /// Spawn heartbeat, mock error and flusher tasks.
    pub fn spawn_tasks(&self, config: &RelayConfig, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        let heartbeat = HeartbeatTask::new(self.heartbeat.clone(), &config.heartbeat);
        handles.push(tokio::spawn(heartbeat.run(shutdown.subscribe())));

        if config.mock_errors.enabled {
            let generator = MockErrorTask::new(self.errors.clone(), &config.mock_errors);
            handles.push(tokio::spawn(generator.run(shutdown.subscribe())));
        } else {
            tracing::info!("Mock error generator disabled");
        }

        if let Some(forwarder) = &self.forwarder {
            handles.push(tokio::spawn(forwarder.clone().run(shutdown.subscribe())));
        }

        handles
    }
}
