//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They work with
//! both [`Logger`](crate::Logger) and [`ChildLogger`](crate::ChildLogger).
//!
//! # Examples
//!
//! ```
//! use pettrack_logger::prelude::*;
//! use pettrack_logger::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "App launched");
//!
//! let pet_id = 42;
//! info!(logger, "Opened profile for pet {}", pet_id);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use pettrack_logger::prelude::*;
/// # let logger = Logger::new();
/// use pettrack_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Upload failed with status {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use pettrack_logger::prelude::*;
/// # let logger = Logger::new();
/// use pettrack_logger::debug;
/// debug!(logger, "Map tiles cached: {}", 128);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warn-level message.
///
/// # Examples
///
/// ```
/// # use pettrack_logger::prelude::*;
/// # let logger = Logger::new();
/// use pettrack_logger::warn;
/// warn!(logger, "Sync retry {} of {}", 1, 3);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
