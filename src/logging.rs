//! Tracing subscriber setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Output goes to stderr so rendered pages on stdout stay
//! clean.

use std::env;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG: &str = "LIFTLOG_LOG";
pub const ENV_LOG_FORMAT: &str = "LIFTLOG_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "warn";

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    #[default]
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `liftlog=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// `LIFTLOG_LOG`, then `RUST_LOG`, then `warn`.
    pub fn from_env() -> Self {
        let level = env::var(ENV_LOG)
            .or_else(|_| env::var("RUST_LOG"))
            .ok()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

        let format = match env::var(ENV_LOG_FORMAT).as_deref() {
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        };

        Self { level, format }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
            .add_directive(
                "hyper=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "reqwest=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
    }

    /// Install the global subscriber.
    ///
    /// Fails if a subscriber is already installed.
    pub fn init(&self) -> Result<(), tracing_subscriber::util::TryInitError> {
        let registry = tracing_subscriber::registry().with(self.filter());
        match self.format {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr))
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
                .try_init(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_precedence() {
        env::remove_var(ENV_LOG);
        env::remove_var(ENV_LOG_FORMAT);
        env::set_var("RUST_LOG", "info");
        assert_eq!(LoggingConfig::from_env().level, "info");

        env::set_var(ENV_LOG, "liftlog=debug");
        env::set_var(ENV_LOG_FORMAT, "pretty");
        let config = LoggingConfig::from_env();
        assert_eq!(config.level, "liftlog=debug");
        assert_eq!(config.format, LogFormat::Pretty);

        env::remove_var(ENV_LOG);
        env::remove_var(ENV_LOG_FORMAT);
        env::remove_var("RUST_LOG");
        assert_eq!(LoggingConfig::from_env(), LoggingConfig::default());
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let config = LoggingConfig {
            level: "[[nonsense".to_string(),
            format: LogFormat::Compact,
        };
        let filter = config.filter();
        assert!(filter.to_string().contains("warn"));
    }
}
