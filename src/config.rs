//! Logger configuration
//!
//! Values are read once at application start, either from the process
//! environment or from a JSON document, and handed to
//! [`Logger::from_config`](crate::Logger::from_config).

use crate::core::{diagnostics, EntryMetadata, LogLevel, Result};
use crate::providers::local_buffer::DEFAULT_LOCAL_BUFFER_SIZE;
use crate::providers::console::DEFAULT_APP_TAG;
use crate::providers::RemoteConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ENV_ENVIRONMENT: &str = "PETTRACK_ENV";
pub const ENV_LOG_LEVEL: &str = "PETTRACK_LOG_LEVEL";
pub const ENV_LOG_TOKEN: &str = "PETTRACK_LOG_TOKEN";
pub const ENV_LOG_ENDPOINT: &str = "PETTRACK_LOG_ENDPOINT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Debug in development, info in production
    pub fn default_min_level(&self) -> LogLevel {
        match self {
            Environment::Development => LogLevel::Debug,
            Environment::Production => LogLevel::Info,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: '{}'", s)),
        }
    }
}

/// Configuration for the logging core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub environment: Environment,
    /// Tag shown in pretty console output
    pub app_name: String,
    pub app_version: String,
    /// Overrides the environment's default minimum level
    pub min_level: Option<LogLevel>,
    /// Remote shipping; omitted when no token is configured
    pub remote: Option<RemoteConfig>,
    pub local_buffer_size: usize,
}

impl LoggerConfig {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            app_name: DEFAULT_APP_TAG.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            min_level: None,
            remote: None,
            local_buffer_size: DEFAULT_LOCAL_BUFFER_SIZE,
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                diagnostics::warn(format!("{}, using default", e));
                Environment::default()
            }),
            None => Environment::default(),
        };

        let mut config = Self::new(environment);

        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            match raw.parse::<LogLevel>() {
                Ok(level) => config.min_level = Some(level),
                Err(e) => diagnostics::warn(format!("{}, using environment default", e)),
            }
        }

        if let Some(token) = lookup(ENV_LOG_TOKEN).filter(|t| !t.trim().is_empty()) {
            let mut remote = RemoteConfig::new(token);
            if let Some(endpoint) = lookup(ENV_LOG_ENDPOINT).filter(|e| !e.trim().is_empty()) {
                remote = remote.with_endpoint(endpoint);
            }
            config.remote = Some(remote);
        }

        config
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn with_local_buffer_size(mut self, size: usize) -> Self {
        self.local_buffer_size = size;
        self
    }

    pub fn effective_min_level(&self) -> LogLevel {
        self.min_level
            .unwrap_or_else(|| self.environment.default_min_level())
    }

    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata::detect(self.app_version.clone(), self.environment.as_str())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
