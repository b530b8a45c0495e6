//! # Configuration Management
//!
//! The [`CoreConfig`] object is constructed once at startup by the host and
//! threaded through the subsystems; there is no ambient global configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default application-shell resources protected by the fetch interceptor.
pub const DEFAULT_SHELL_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/favicon.ico",
    "/manifest.json",
];

/// Top-level configuration for the client core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    /// Origin the fetch interceptor protects; requests to other origins pass
    /// through unintercepted.
    pub origin: String,

    /// Fixed allow-list of application-shell paths served with the
    /// stale-while-revalidate strategy.
    pub shell_paths: Vec<String>,

    /// Event bus buffer capacity.
    pub event_buffer_size: usize,

    /// Directory name for the blob store, relative to the platform cache
    /// directory.
    pub cache_directory: String,

    /// File name of the settings database, relative to the platform data
    /// directory.
    pub settings_db: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            origin: "https://localhost:8080".to_string(),
            shell_paths: DEFAULT_SHELL_PATHS.iter().map(|s| s.to_string()).collect(),
            event_buffer_size: 100,
            cache_directory: "soundbox-cache".to_string(),
            settings_db: "soundbox-settings.db".to_string(),
        }
    }
}

impl CoreConfig {
    /// Set the protected origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Replace the application-shell allow-list.
    pub fn with_shell_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shell_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.origin.starts_with("http://") && !self.origin.starts_with("https://") {
            return Err(Error::Config(format!(
                "origin must be an http(s) URL, got '{}'",
                self.origin
            )));
        }
        if self.origin.ends_with('/') {
            return Err(Error::Config(
                "origin must not carry a trailing slash".to_string(),
            ));
        }
        if let Some(bad) = self.shell_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(Error::Config(format!(
                "shell path '{}' must be absolute",
                bad
            )));
        }
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "event_buffer_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_origin() {
        let config = CoreConfig::default().with_origin("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_trailing_slash_origin() {
        let config = CoreConfig::default().with_origin("https://example.com/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_relative_shell_path() {
        let config = CoreConfig::default().with_shell_paths(["app.js"]);
        assert!(config.validate().is_err());
    }
}
