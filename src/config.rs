//! Runtime configuration.
//!
//! Compile-time defaults with environment-variable overrides, resolved once
//! at startup. Unparseable values fall back to the default and are logged.

use crate::scrape::ScrapeConfig;
use crate::server::DEFAULT_PORT;
use std::time::Duration;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP/WebSocket server listens on.
    pub port: u16,

    /// Scrape loop settings.
    pub scrape: ScrapeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            scrape: ScrapeConfig::default(),
        }
    }
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// Recognized variables: `VOTEWATCH_PORT`, `VOTEWATCH_TARGET_URL`,
    /// `VOTEWATCH_POLL_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parsed::<u16>("VOTEWATCH_PORT") {
            config.port = port;
        }
        if let Ok(url) = std::env::var("VOTEWATCH_TARGET_URL") {
            config.scrape.target_url = url;
        }
        if let Some(secs) = env_parsed::<u64>("VOTEWATCH_POLL_SECS") {
            config.scrape.poll_interval = Duration::from_secs(secs);
        }

        config
    }
}

/// Parses an environment variable, warning and falling back on bad values.
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(var = name, value = %value, "Ignoring unparseable value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.scrape.poll_interval, Duration::from_secs(10));
        assert!(config.scrape.target_url.starts_with("https://"));
    }
}
