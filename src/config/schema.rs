//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the heartbeat relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Remote log intake settings.
    pub intake: IntakeConfig,

    /// Log batching settings.
    pub batch: BatchConfig,

    /// Heartbeat task settings.
    pub heartbeat: HeartbeatConfig,

    /// Mock error generator settings.
    pub mock_errors: MockErrorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Remote log intake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Intake site, e.g. "us5.datadoghq.com".
    pub site: String,

    /// Service name attached to every entry.
    pub service: String,

    /// Environment name attached to every entry.
    pub env: String,

    /// Hostname attached to every entry.
    pub host: String,

    /// Source tag (`ddsource`).
    pub source: String,

    /// API key. When absent the forwarder is disabled.
    pub api_key: Option<String>,

    /// Environment variable the API key is read from.
    pub api_key_env: String,

    /// Full intake URL. Overrides the one derived from `site`.
    pub url: Option<String>,

    /// Timeout for a single intake POST in seconds.
    pub timeout_secs: u64,
}

impl IntakeConfig {
    /// Resolve the URL entries are posted to.
    pub fn endpoint(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("https://http-intake.logs.{}/api/v2/logs", self.site),
        }
    }

    /// Whether an API key is configured.
    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            site: "us5.datadoghq.com".to_string(),
            service: "heartbeat-relay-demo".to_string(),
            env: "demo".to_string(),
            host: "heartbeat-relay".to_string(),
            source: "rust".to_string(),
            api_key: None,
            api_key_env: "DD_API_KEY".to_string(),
            url: None,
            timeout_secs: 10,
        }
    }
}

/// Log batching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Entries that seal a batch for immediate sending.
    pub max_entries: usize,

    /// Interval of the timer-driven flush in seconds.
    pub flush_interval_secs: u64,

    /// Upper bound on buffered entries while the intake is failing.
    /// Oldest entries are dropped beyond this.
    pub max_retained: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            flush_interval_secs: 5,
            max_retained: 1_000,
        }
    }
}

/// Heartbeat configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Heartbeat interval in seconds.
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

/// Mock error generator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockErrorConfig {
    /// Enable the generator.
    pub enabled: bool,

    /// Lower bound of the random delay between errors, in seconds.
    pub min_interval_secs: u64,

    /// Upper bound of the random delay between errors, in seconds.
    pub max_interval_secs: u64,

    /// Number of recent errors kept for the status endpoint.
    pub history_capacity: usize,
}

impl Default for MockErrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_secs: 45,
            max_interval_secs: 90,
            history_capacity: 10,
        }
    }
}

/// Console log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Console output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
