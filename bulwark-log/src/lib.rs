//! Bulwark Logging
//!
//! Installs a `tracing` subscriber configured from the environment. The
//! library crates only emit `tracing` events; binaries and tests call
//! [`init`] once to get them on stderr.
//!
//! # Usage
//!
//! ```rust
//! bulwark_log::init();
//! tracing::info!(port = 8080, "server started");
//! ```
//!
//! # Environment Variables
//!
//! - `BULWARK_DEBUG=1` - Enable debug logging
//! - `BULWARK_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `BULWARK_LOG_FORMAT=json|pretty|compact` - Set output format
//! - `BULWARK_LOG_COLOR=1|0` - Enable/disable colors
//! - `BULWARK_LOG_MODULE=1|0` - Include the event target
//!
//! `RUST_LOG`, when set, takes precedence over `BULWARK_LOG_LEVEL`.

use std::env;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Log Levels
// ============================================================================

/// Log level for Bulwark logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
    /// Off (no logging)
    Off,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by [`EnvFilter`].
    pub fn as_filter(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_filter().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Compact single-line output
    Compact,
    /// JSON lines for structured logging
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LogError {
    /// A global subscriber was already set.
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether ANSI colors are enabled
    pub color: bool,
    /// Whether to include the event target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Create config from an explicit set of variables.
    ///
    /// Unknown keys are ignored, unparseable values fall back to defaults.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut debug = false;
        let mut level = None;
        let mut format = Format::Json;
        let mut color = None;
        let mut module_path = true;

        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "BULWARK_DEBUG" => debug = flag(value),
                "BULWARK_LOG_LEVEL" => level = Level::parse(value),
                "BULWARK_LOG_FORMAT" => format = Format::parse(value).unwrap_or(format),
                "BULWARK_LOG_COLOR" => color = Some(flag(value)),
                "BULWARK_LOG_MODULE" => module_path = flag(value),
                _ => {}
            }
        }

        let level = level.unwrap_or(if debug { Level::Debug } else { Level::Info });

        Self {
            debug,
            level,
            format,
            // JSON output never carries escape codes
            color: color.unwrap_or(false) && format != Format::Json,
            module_path,
        }
    }

    /// Build the filter, preferring `RUST_LOG` when it is set.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_filter()))
    }
}

fn flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

// ============================================================================
// Public API
// ============================================================================

/// Install the global subscriber from the environment.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let _ = try_init();
}

/// Install the global subscriber, reporting failure.
pub fn try_init() -> Result<(), LogError> {
    try_init_with(&LogConfig::from_env())
}

/// Install the global subscriber from an explicit configuration.
pub fn try_init_with(config: &LogConfig) -> Result<(), LogError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.module_path)
        .with_ansi(config.color)
        .with_writer(std::io::stderr);

    let result = match config.format {
        Format::Json => builder.json().try_init(),
        Format::Pretty => builder.pretty().try_init(),
        Format::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| LogError::Install(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("invalid"), None);
        assert_eq!(Level::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = LogConfig::from_vars(Vec::<(String, String)>::new());
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_debug_lowers_level() {
        let config = LogConfig::from_vars([("BULWARK_DEBUG", "1")]);
        assert!(config.debug);
        assert_eq!(config.level, Level::Debug);

        // An explicit level wins over the debug flag
        let config =
            LogConfig::from_vars([("BULWARK_DEBUG", "true"), ("BULWARK_LOG_LEVEL", "error")]);
        assert_eq!(config.level, Level::Error);
    }

    #[test]
    fn test_color_disabled_for_json() {
        let config = LogConfig::from_vars([("BULWARK_LOG_COLOR", "1")]);
        assert!(!config.color);

        let config =
            LogConfig::from_vars([("BULWARK_LOG_COLOR", "1"), ("BULWARK_LOG_FORMAT", "pretty")]);
        assert!(config.color);
        assert_eq!(config.format, Format::Pretty);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = LogConfig::from_vars([
            ("BULWARK_LOG_LEVEL", "loud"),
            ("BULWARK_LOG_FORMAT", "xml"),
            ("UNRELATED", "x"),
        ]);
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, Format::Json);
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert!(try_init().is_err());
        tracing::info!(target: "bulwark_log::tests", "after init");
    }
}
