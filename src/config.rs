//! Client configuration.
//!
//! Use the builder methods to customize, or [`ClientConfig::from_env`] to
//! read the `LIFTLOG_*` environment variables.
//!
//! ```ignore
//! use liftlog::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://lift.example.com")
//!     .with_workouts_page_size(10);
//! ```

use std::time::Duration;
use tracing::warn;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_EXERCISES_PAGE_SIZE: usize = 12;
pub const DEFAULT_WORKOUTS_PAGE_SIZE: usize = 6;

pub const ENV_API_URL: &str = "LIFTLOG_API_URL";
pub const ENV_EXERCISES_PAGE_SIZE: &str = "LIFTLOG_EXERCISES_PAGE_SIZE";
pub const ENV_WORKOUTS_PAGE_SIZE: &str = "LIFTLOG_WORKOUTS_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "LIFTLOG_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash
    pub base_url: String,
    /// Exercises shown per page
    pub exercises_page_size: usize,
    /// Workouts shown per page
    pub workouts_page_size: usize,
    /// Transport timeout for the reqwest adapter; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            exercises_page_size: DEFAULT_EXERCISES_PAGE_SIZE,
            workouts_page_size: DEFAULT_WORKOUTS_PAGE_SIZE,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Zero is ignored.
    pub fn with_exercises_page_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.exercises_page_size = size;
        }
        self
    }

    /// Zero is ignored.
    pub fn with_workouts_page_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.workouts_page_size = size;
        }
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(size) = parse_positive(ENV_EXERCISES_PAGE_SIZE, lookup(ENV_EXERCISES_PAGE_SIZE)) {
            config.exercises_page_size = size;
        }
        if let Some(size) = parse_positive(ENV_WORKOUTS_PAGE_SIZE, lookup(ENV_WORKOUTS_PAGE_SIZE)) {
            config.workouts_page_size = size;
        }
        if let Some(secs) = parse_positive(ENV_TIMEOUT_SECS, lookup(ENV_TIMEOUT_SECS)) {
            config.request_timeout = Some(Duration::from_secs(secs as u64));
        }

        config
    }
}

fn parse_positive(key: &str, raw: Option<String>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(key, value = %raw, "ignoring invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.exercises_page_size, 12);
        assert_eq!(config.workouts_page_size, 6);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("https://lift.example.com/")
            .with_exercises_page_size(0)
            .with_workouts_page_size(10)
            .with_request_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.base_url, "https://lift.example.com");
        assert_eq!(config.exercises_page_size, 12);
        assert_eq!(config.workouts_page_size, 10);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_lookup_overrides_and_invalid_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://10.0.0.2:3000/"),
            (ENV_EXERCISES_PAGE_SIZE, "twelve"),
            (ENV_WORKOUTS_PAGE_SIZE, "8"),
            (ENV_TIMEOUT_SECS, "0"),
        ]));
        assert_eq!(config.base_url, "http://10.0.0.2:3000");
        assert_eq!(config.exercises_page_size, DEFAULT_EXERCISES_PAGE_SIZE);
        assert_eq!(config.workouts_page_size, 8);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_API_URL, "http://env.test");
        std::env::set_var(ENV_TIMEOUT_SECS, "30");
        let config = ClientConfig::from_env();
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_TIMEOUT_SECS);

        assert_eq!(config.base_url, "http://env.test");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }
}
