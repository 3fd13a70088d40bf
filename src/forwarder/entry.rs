//! Wire format of entries posted to the intake.

use serde::{Deserialize, Serialize};

use crate::config::IntakeConfig;
use crate::forwarder::record::LogRecord;

/// One log object in the JSON array sent to the intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ddsource: String,
    pub ddtags: String,
    pub hostname: String,
    pub message: String,
    pub service: String,
    pub status: String,
    pub logger: LoggerInfo,
    pub code: CodeLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerInfo {
    pub name: String,
    pub thread_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeLocation {
    pub function: Option<String>,
    pub line: Option<u32>,
    pub module: Option<String>,
}

/// Static attributes stamped onto every entry.
#[derive(Debug, Clone)]
pub struct EntryTemplate {
    pub source: String,
    pub service: String,
    pub env: String,
    pub hostname: String,
}

impl EntryTemplate {
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self {
            source: config.source.clone(),
            service: config.service.clone(),
            env: config.env.clone(),
            hostname: config.host.clone(),
        }
    }

    /// Format a record into an intake entry.
    pub fn entry(&self, record: LogRecord) -> LogEntry {
        let status = record.severity();
        let tags = [
            format!("env:{}", self.env),
            format!("service:{}", self.service),
            format!("logger:{}", record.logger),
            format!("status:{}", status),
        ];
        let message = format!(
            "{} - {} - {} - {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
            record.logger,
            record.level,
            record.message,
        );

        LogEntry {
            ddsource: self.source.clone(),
            ddtags: tags.join(","),
            hostname: self.hostname.clone(),
            message,
            service: self.service.clone(),
            status,
            logger: LoggerInfo {
                name: record.logger,
                thread_name: record.thread_name,
            },
            code: CodeLocation {
                function: record.function,
                line: record.line,
                module: record.module,
            },
        }
    }
}
