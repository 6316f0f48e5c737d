//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Durable store failure with the key involved
    #[error("Storage error for key '{key}': {message}")]
    StorageError { key: String, message: String },

    /// Request could not be delivered (connection refused, DNS, TLS, ...)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Request exceeded the client-side timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Remote endpoint answered with a non-success status
    #[error("Remote endpoint rejected batch with HTTP {status}")]
    HttpStatus { status: u16 },

    /// Provider panicked while handling a call
    #[error("Provider '{provider}' panicked: {message}")]
    ProviderPanicked { provider: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::StorageError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        LoggerError::TransportError(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(timeout: std::time::Duration) -> Self {
        LoggerError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a provider panic error
    pub fn provider_panicked(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ProviderPanicked {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for failures that mean the batch never reached the endpoint
    /// and should be parked for a later retry.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self,
            LoggerError::TransportError(_)
                | LoggerError::Timeout { .. }
                | LoggerError::HttpStatus { .. }
        )
    }
}
