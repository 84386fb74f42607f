use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_CHANNEL_URL, DEFAULT_REFRESH_PERIOD_SECS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream
    pub posts_endpoint: String,
    pub channel_url: String,
    pub request_timeout: Duration,

    // Refresh
    pub refresh_period_secs: u32,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Copy action
    pub clipboard_backend: ClipboardBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// The host system clipboard
    System,
    /// An in-process buffer, for headless hosts
    Memory,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Upstream
            posts_endpoint: required_env("POSTS_ENDPOINT")?,
            channel_url: env_or_default("CHANNEL_URL", DEFAULT_CHANNEL_URL),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 15)?),

            // Refresh
            refresh_period_secs: parse_env_u32(
                "REFRESH_PERIOD_SECS",
                DEFAULT_REFRESH_PERIOD_SECS,
            )?,

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Copy action
            clipboard_backend: parse_clipboard_backend(&env_or_default(
                "CLIPBOARD_BACKEND",
                "system",
            ))?,
        })
    }

    /// Configuration pointing at the given upstream, with defaults elsewhere.
    #[must_use]
    pub fn for_endpoint(posts_endpoint: &str) -> Self {
        Self {
            posts_endpoint: posts_endpoint.to_string(),
            channel_url: DEFAULT_CHANNEL_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            refresh_period_secs: DEFAULT_REFRESH_PERIOD_SECS,
            web_host: "127.0.0.1".to_string(),
            web_port: 8080,
            clipboard_backend: ClipboardBackend::Memory,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts_endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "POSTS_ENDPOINT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if !self.posts_endpoint.starts_with("http://") && !self.posts_endpoint.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                name: "POSTS_ENDPOINT".to_string(),
                message: format!("must be an http(s) URL, got '{}'", self.posts_endpoint),
            });
        }
        if self.channel_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "CHANNEL_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.refresh_period_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "REFRESH_PERIOD_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Full URL of the upstream posts endpoint.
    #[must_use]
    pub fn posts_url(&self) -> String {
        format!("{}/api/posts", self.posts_endpoint.trim_end_matches('/'))
    }

    /// Channel root without a trailing slash.
    #[must_use]
    pub fn channel_root(&self) -> &str {
        self.channel_url.trim_end_matches('/')
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_clipboard_backend(value: &str) -> Result<ClipboardBackend, ConfigError> {
    match value.to_lowercase().as_str() {
        "system" => Ok(ClipboardBackend::System),
        "memory" => Ok(ClipboardBackend::Memory),
        _ => Err(ConfigError::InvalidValue {
            name: "CLIPBOARD_BACKEND".to_string(),
            message: format!("must be 'system' or 'memory', got '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_url_strips_trailing_slash() {
        let config = Config::for_endpoint("https://mirror.example.com/");
        assert_eq!(config.posts_url(), "https://mirror.example.com/api/posts");

        let config = Config::for_endpoint("https://mirror.example.com");
        assert_eq!(config.posts_url(), "https://mirror.example.com/api/posts");
    }

    #[test]
    fn test_channel_root() {
        let mut config = Config::for_endpoint("https://mirror.example.com");
        assert_eq!(config.channel_root(), "https://t.me/oprosokolopolit");

        config.channel_url = "https://t.me/somechannel/".to_string();
        assert_eq!(config.channel_root(), "https://t.me/somechannel");
    }

    #[test]
    fn test_validate() {
        assert!(Config::for_endpoint("https://mirror.example.com")
            .validate()
            .is_ok());
        assert!(Config::for_endpoint("").validate().is_err());
        assert!(Config::for_endpoint("mirror.example.com").validate().is_err());

        let mut config = Config::for_endpoint("https://mirror.example.com");
        config.refresh_period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_clipboard_backend() {
        assert_eq!(parse_clipboard_backend("system").unwrap(), ClipboardBackend::System);
        assert_eq!(parse_clipboard_backend("MEMORY").unwrap(), ClipboardBackend::Memory);
        assert!(parse_clipboard_backend("x11").is_err());
    }

    #[test]
    fn test_parse_u32_default() {
        assert_eq!(parse_env_u32("NONEXISTENT_VAR", 30).unwrap(), 30);
    }
}
