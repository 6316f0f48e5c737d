//! Child loggers with bound context

use super::{log_context::LogContext, log_level::LogLevel, logger::Logger};

/// A logger view that merges fixed bindings into every entry.
///
/// Call-time context wins over bindings on key collisions. Level
/// filtering and providers are those of the parent `Logger`.
///
/// # Example
///
/// ```
/// use pettrack_logger::prelude::*;
///
/// let logger = Logger::new();
/// let walks = logger.child(LogContext::new().with_field("screen", "walks"));
/// walks.info("Walk started");
/// ```
#[derive(Clone)]
pub struct ChildLogger {
    parent: Logger,
    bindings: LogContext,
}

impl ChildLogger {
    pub(crate) fn new(parent: Logger, bindings: LogContext) -> Self {
        Self { parent, bindings }
    }

    pub fn bindings(&self) -> &LogContext {
        &self.bindings
    }

    pub fn parent(&self) -> &Logger {
        &self.parent
    }

    /// Derive a further child; the new bindings override these
    pub fn child(&self, bindings: LogContext) -> ChildLogger {
        ChildLogger::new(self.parent.clone(), bindings.merged_over(&self.bindings))
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.parent
            .log_with_context(level, message, self.bindings.clone());
    }

    pub fn log_with_context(&self, level: LogLevel, message: impl Into<String>, context: LogContext) {
        self.parent
            .log_with_context(level, message, context.merged_over(&self.bindings));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn debug_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Debug, message, context);
    }

    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    pub fn warn_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Warn, message, context);
    }

    pub fn error_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }

    pub fn error_with_error<E>(&self, message: impl Into<String>, error: &E, context: Option<LogContext>)
    where
        E: std::error::Error + ?Sized,
    {
        let context = match context {
            Some(context) => context.merged_over(&self.bindings),
            None => self.bindings.clone(),
        };
        self.parent.error_with_error(message, error, Some(context));
    }
}
