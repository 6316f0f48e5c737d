//! Console provider implementation

use crate::config::Environment;
use crate::core::{LogEntry, LogLevel, Provider, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

/// Default application tag shown in pretty output
pub const DEFAULT_APP_TAG: &str = "PetTracker";

/// Output stream an entry is routed to, one per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleStream {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for ConsoleStream {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => ConsoleStream::Debug,
            LogLevel::Info => ConsoleStream::Info,
            LogLevel::Warn => ConsoleStream::Warn,
            LogLevel::Error => ConsoleStream::Error,
        }
    }
}

/// Destination for formatted console lines
pub trait ConsoleWriter: Send {
    fn write_line(&mut self, stream: ConsoleStream, line: &str) -> std::io::Result<()>;
}

/// Process stdout/stderr: debug and info to stdout, warn and error to stderr
///
/// The four [`ConsoleStream`]s collapse onto two sinks here, so debug and
/// info lines share stdout and warn and error lines share stderr. Supply a
/// custom [`ConsoleWriter`] to keep them apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl ConsoleWriter for StdConsole {
    fn write_line(&mut self, stream: ConsoleStream, line: &str) -> std::io::Result<()> {
        match stream {
            ConsoleStream::Debug | ConsoleStream::Info => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", line)
            }
            ConsoleStream::Warn | ConsoleStream::Error => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{}", line)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// Human-readable lines with pretty-printed context
    #[default]
    Pretty,
    /// One serialized entry per line
    Json,
}

pub struct ConsoleProvider {
    writer: Mutex<Box<dyn ConsoleWriter>>,
    format: ConsoleFormat,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    app_tag: String,
}

impl ConsoleProvider {
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(Box::new(StdConsole)),
            format: ConsoleFormat::Pretty,
            use_colors: true,
            app_tag: DEFAULT_APP_TAG.to_string(),
        }
    }

    /// Pretty, coloured output in development; JSON lines otherwise
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::new(),
            Environment::Production => Self::new()
                .with_format(ConsoleFormat::Json)
                .with_colors(false),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: ConsoleFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_app_tag(mut self, tag: impl Into<String>) -> Self {
        self.app_tag = tag.into();
        self
    }

    /// Send output somewhere other than stdout/stderr
    #[must_use]
    pub fn with_writer<W: ConsoleWriter + 'static>(mut self, writer: W) -> Self {
        self.writer = Mutex::new(Box::new(writer));
        self
    }

    pub fn format(&self) -> ConsoleFormat {
        self.format
    }

    fn format_pretty(&self, entry: &LogEntry) -> String {
        let level_str = format!("{:5}", entry.level.to_str());
        #[cfg(feature = "console")]
        let level_str = if self.use_colors {
            level_str.color(entry.level.color_code()).to_string()
        } else {
            level_str
        };

        let mut output = format!(
            "[{}] [{}] [{}] {}",
            entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            level_str,
            self.app_tag,
            entry.message
        );

        if let Some(ref error) = entry.error {
            output.push_str(&format!(" | {}: {}", error.name, error.message));
            if let Some(ref stack) = error.stack {
                output.push('\n');
                output.push_str(stack);
            }
        }

        if let Some(ref context) = entry.context {
            if !context.is_empty() {
                output.push('\n');
                output.push_str(&context.to_pretty_json());
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> Result<String> {
        Ok(serde_json::to_string(entry)?)
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ConsoleProvider {
    fn name(&self) -> &str {
        "console"
    }

    fn log(&self, entry: &LogEntry) -> Result<()> {
        let output = match self.format {
            ConsoleFormat::Pretty => self.format_pretty(entry),
            ConsoleFormat::Json => self.format_json(entry)?,
        };

        self.writer
            .lock()
            .write_line(ConsoleStream::from(entry.level), &output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntryMetadata, ErrorInfo, LogContext};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(ConsoleStream, String)>>>);

    impl ConsoleWriter for Captured {
        fn write_line(&mut self, stream: ConsoleStream, line: &str) -> std::io::Result<()> {
            self.0.lock().push((stream, line.to_string()));
            Ok(())
        }
    }

    fn provider(format: ConsoleFormat) -> (ConsoleProvider, Captured) {
        let captured = Captured::default();
        let provider = ConsoleProvider::new()
            .with_format(format)
            .with_colors(false)
            .with_writer(captured.clone());
        (provider, captured)
    }

    #[test]
    fn test_pretty_line_layout() {
        let (provider, captured) = provider(ConsoleFormat::Pretty);
        let entry = LogEntry::new(LogLevel::Info, "Pet saved");

        provider.log(&entry).unwrap();

        let lines = captured.0.lock();
        assert_eq!(lines.len(), 1);
        let (stream, line) = &lines[0];
        assert_eq!(*stream, ConsoleStream::Info);
        assert!(line.contains("[INFO ]"));
        assert!(line.contains("[PetTracker]"));
        assert!(line.ends_with("Pet saved"));
    }

    #[test]
    fn test_pretty_includes_context_and_error() {
        let (provider, captured) = provider(ConsoleFormat::Pretty);
        let entry = LogEntry::new(LogLevel::Error, "Sync failed")
            .with_context(LogContext::new().with_field("pet_id", 7))
            .with_error(ErrorInfo::new("NetworkError", "offline").with_stack("caused by: dns"));

        provider.log(&entry).unwrap();

        let (stream, line) = captured.0.lock()[0].clone();
        assert_eq!(stream, ConsoleStream::Error);
        assert!(line.contains("| NetworkError: offline"));
        assert!(line.contains("caused by: dns"));
        assert!(line.contains("\"pet_id\": 7"));
    }

    #[test]
    fn test_levels_route_to_distinct_streams() {
        let (provider, captured) = provider(ConsoleFormat::Pretty);
        for level in LogLevel::ALL {
            provider.log(&LogEntry::new(level, "m")).unwrap();
        }
        let streams: Vec<_> = captured.0.lock().iter().map(|(s, _)| *s).collect();
        assert_eq!(
            streams,
            vec![
                ConsoleStream::Debug,
                ConsoleStream::Info,
                ConsoleStream::Warn,
                ConsoleStream::Error
            ]
        );
    }

    #[test]
    fn test_json_is_single_canonical_line() {
        let (provider, captured) = provider(ConsoleFormat::Json);
        let entry = LogEntry::new(LogLevel::Warn, "Low on food")
            .with_context(LogContext::new().with_field("grams_left", 40))
            .with_metadata(EntryMetadata::detect("1.4.0", "production"));

        provider.log(&entry).unwrap();

        let (_, line) = captured.0.lock()[0].clone();
        assert!(!line.contains('\n'));
        let parsed: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_environment_selects_format() {
        assert_eq!(
            ConsoleProvider::for_environment(Environment::Development).format(),
            ConsoleFormat::Pretty
        );
        assert_eq!(
            ConsoleProvider::for_environment(Environment::Production).format(),
            ConsoleFormat::Json
        );
    }

    #[test]
    fn test_flush_and_cleanup_are_noops() {
        let (provider, captured) = provider(ConsoleFormat::Pretty);
        assert!(provider.capabilities() == crate::core::ProviderCapabilities::NONE);
        provider.flush().unwrap();
        provider.cleanup().unwrap();
        assert!(captured.0.lock().is_empty());
    }
}
