//! Configuration loading for the flight endpoint and lookup client.
//!
//! Sources, highest precedence first:
//! 1. Environment variables prefixed with `FLIGHT_MINT_` (sections split on `__`,
//!    e.g. `FLIGHT_MINT_CACHE__TTL_SECS=30`)
//! 2. A TOML file (`flight-mint.toml` in the working directory unless overridden)
//! 3. Built-in defaults

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "flight-mint.toml";
const ENV_PREFIX: &str = "FLIGHT_MINT_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the endpoint listens on.
    pub bind: String,
}

/// The public flight-state feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Freshness window for reusing an upstream response.
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:3000".to_string() }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opensky-network.org/api".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: crate::sources::caching::DEFAULT_TTL_SECS as u64,
            max_entries: crate::sources::caching::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Load from `config_path` (or `flight-mint.toml`) plus environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::from_figment(Self::figment(&config_file))
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.upstream.base_url.trim().is_empty() {
            return Err(Error::config_validation("upstream.base_url must not be empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::config_validation("upstream.timeout_secs must be greater than 0"));
        }
        if self.upstream.username.is_some() != self.upstream.password.is_some() {
            return Err(Error::config_validation(
                "upstream.username and upstream.password must be set together",
            ));
        }
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(Error::config_validation("cache.ttl_secs must be greater than 0"));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(Error::config_validation("cache.max_entries must be greater than 0"));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            Error::config_validation(format!("server.bind '{}' is invalid: {e}", self.server.bind))
        })
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.cache.ttl_secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.upstream.base_url, "https://opensky-network.org/api");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_bind() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();
        assert!(matches!(config.validate(), Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_half_credentials() {
        let mut config = Config::default();
        config.upstream.username = Some("pilot".to_string());
        assert!(config.validate().is_err());
        config.upstream.password = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_ttl_only_when_enabled() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_figment(Config::figment(Path::new("/nonexistent/flight-mint.toml")))
            .unwrap();
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbind = \"0.0.0.0:8080\"\n\n[cache]\nttl_secs = 30\n"
        )
        .unwrap();

        let config = Config::from_figment(Config::figment(file.path())).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.cache.max_entries, CacheConfig::default().max_entries);
        assert_eq!(config.cache_ttl(), chrono::Duration::seconds(30));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\ntimeout_secs = 0\n").unwrap();
        assert!(Config::from_figment(Config::figment(file.path())).is_err());
    }
}
