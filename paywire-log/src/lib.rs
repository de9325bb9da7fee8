//! Paywire Logging
//!
//! Installs a [`tracing`] subscriber configured from `PAYWIRE_*` environment
//! variables. Every Paywire crate logs through the `tracing` macros; this crate
//! only decides where those events go and in which shape.
//!
//! # Usage
//!
//! ```rust
//! paywire_log::init();
//!
//! tracing::info!(port = 8080, "Server started");
//! ```
//!
//! # Environment Variables
//!
//! - `PAYWIRE_DEBUG=1` - Enable debug logging
//! - `PAYWIRE_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `PAYWIRE_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `PAYWIRE_LOG_COLOR=1|0` - Enable/disable colors
//! - `PAYWIRE_LOG_MODULE=1|0` - Include the event target (module path)
//!
//! `RUST_LOG`, when present, takes precedence over `PAYWIRE_LOG_LEVEL`.

use once_cell::sync::{Lazy, OnceCell};
use std::env;

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level for emitted events.
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
        match s.to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
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
        f.write_str(&self.as_directive().to_uppercase())
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
    /// Compact single-line format
    Compact,
    /// JSON lines for log shippers
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
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

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);
static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
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
    /// Read the configuration from `PAYWIRE_*` environment variables.
    pub fn from_env() -> Self {
        let debug = flag("PAYWIRE_DEBUG").unwrap_or(false);

        let mut level = env::var("PAYWIRE_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(Level::Info);
        if debug && level > Level::Debug {
            level = Level::Debug;
        }

        let format = env::var("PAYWIRE_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let color = flag("PAYWIRE_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        let module_path = flag("PAYWIRE_LOG_MODULE").unwrap_or(true);

        Self {
            debug,
            level,
            format,
            color,
            module_path,
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Public API
// ============================================================================

/// The process-wide configuration, read from the environment on first use.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Install the global subscriber using [`config()`].
///
/// Safe to call more than once; only the first call has an effect.
pub fn init() {
    INSTALLED.get_or_init(|| try_init(config()));
}

/// Install a global subscriber for `config`.
///
/// Returns `false` when another subscriber was already installed.
pub fn try_init(config: &LogConfig) -> bool {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        Format::Json => registry
            .with(fmt::layer().json().with_target(config.module_path))
            .try_init(),
        Format::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.color)
                    .with_target(config.module_path),
            )
            .try_init(),
        Format::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.color)
                    .with_target(config.module_path),
            )
            .try_init(),
    };

    installed.is_ok()
}

// ============================================================================
// Tests
// ============================================================================
