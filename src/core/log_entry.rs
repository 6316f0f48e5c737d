//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process-wide facts stamped onto every entry.
///
/// Built once when the logger is created; every entry of a run carries an
/// identical copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub app_version: String,
    pub platform: String,
    pub environment: String,
    pub process_id: u32,
    pub host: String,
}

impl EntryMetadata {
    /// Collect metadata for the running process
    pub fn detect(app_version: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            platform: std::env::consts::OS.to_string(),
            environment: environment.into(),
            process_id: std::process::id(),
            host: detect_host(),
        }
    }
}

impl Default for EntryMetadata {
    fn default() -> Self {
        Self::detect(env!("CARGO_PKG_VERSION"), "development")
    }
}

fn detect_host() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Error captured alongside an error-level entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture an error value.
    ///
    /// `name` is the short type name, `stack` is the `source()` chain with
    /// one cause per line.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let full_name = std::any::type_name::<E>();
        let name = full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name)
            .trim_end_matches('>')
            .to_string();

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        Self {
            name,
            message: err.to_string(),
            stack: if causes.is_empty() { None } else { Some(causes.join("\n")) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(flatten)]
    pub metadata: EntryMetadata,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            level,
            timestamp: Utc::now(),
            message: Self::sanitize_message(&message),
            context: None,
            error: None,
            metadata: EntryMetadata::default(),
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = if context.is_empty() { None } else { Some(context) };
        self
    }

    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_metadata(mut self, metadata: EntryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
