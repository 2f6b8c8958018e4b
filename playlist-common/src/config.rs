//! Configuration loading and profile resolution
//!
//! A profile name selects `<config_dir>/<profile>-config.toml`. The file is
//! read once at startup into an [`AppConfig`] that the binaries pass down to
//! constructors.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_CONFIG_DIR: &str = "./configs";
pub const PROFILE_ENV_VAR: &str = "PLAYLIST_PROFILE";
pub const CONFIG_DIR_ENV_VAR: &str = "PLAYLIST_CONFIG_DIR";

/// Whole configuration profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub rpc: ListenConfig,
    pub web: ListenConfig,
    pub logging: LoggingConfig,
}

/// Record store connection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection string, selects the target database
    pub url: String,
    /// Upper bound on every store operation
    pub timeout_secs: u64,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://playlist.db?mode=rwc".to_string(),
            timeout_secs: 60,
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Listen address of one HTTP service
///
/// Shared by the `rpc` and `web` sections. Port 0 means "not set" and is
/// replaced by the section's default port after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}

impl ListenConfig {
    pub const RPC_DEFAULT_PORT: u16 = 50051;
    pub const WEB_DEFAULT_PORT: u16 = 9999;

    /// `host:port`, suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for HTTP clients of this service
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a profile from TOML text
    ///
    /// Missing sections and keys take their defaults. A port left at 0 (or
    /// absent) takes the service's default port.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load `<config_dir>/<profile>-config.toml`
    pub fn load(profile: &str, config_dir: &Path) -> Result<Self> {
        let path = profile_path(profile, config_dir);
        info!("Loading config file {}", path.display());

        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;

        Self::parse(&content).map_err(|e| {
            Error::Config(format!("Parse TOML failed for {}: {}", path.display(), e))
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.fill_default_ports();
        Ok(config)
    }

    fn fill_default_ports(&mut self) {
        if self.rpc.port == 0 {
            self.rpc.port = ListenConfig::RPC_DEFAULT_PORT;
        }
        if self.web.port == 0 {
            self.web.port = ListenConfig::WEB_DEFAULT_PORT;
        }
    }

    /// Defaults for every section, as if an empty profile file was loaded
    pub fn with_defaults() -> Self {
        let mut config = AppConfig::default();
        config.fill_default_ports();
        config
    }
}

/// Path of a profile's config file
pub fn profile_path(profile: &str, config_dir: &Path) -> PathBuf {
    config_dir.join(format!("{}-config.toml", profile))
}

/// Resolve which profile and directory to load
///
/// Priority order, highest first:
/// 1. Command-line argument
/// 2. Environment variable (`PLAYLIST_PROFILE`, `PLAYLIST_CONFIG_DIR`)
/// 3. Compiled default (`default`, `./configs`)
pub fn resolve_profile(cli_profile: Option<&str>, cli_dir: Option<&Path>) -> (String, PathBuf) {
    let profile = cli_profile
        .map(str::to_string)
        .or_else(|| non_empty_env(PROFILE_ENV_VAR))
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let dir = cli_dir
        .map(Path::to_path_buf)
        .or_else(|| non_empty_env(CONFIG_DIR_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

    (profile, dir)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::with_defaults());
        assert_eq!(config.database.timeout(), Duration::from_secs(60));
        assert_eq!(config.rpc.port, 50051);
        assert_eq!(config.web.port, 9999);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite::memory:"

            [web]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.timeout_secs, 60);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.rpc.port, 50051);
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, "127.0.0.1");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[database\nurl = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_listen_addresses() {
        let listen = ListenConfig {
            host: "0.0.0.0".to_string(),
            port: 50051,
        };
        assert_eq!(listen.bind_addr(), "0.0.0.0:50051");
        assert_eq!(listen.base_url(), "http://0.0.0.0:50051");
    }

    #[test]
    fn test_profile_path() {
        let path = profile_path("staging", Path::new("/etc/playlist"));
        assert_eq!(path, PathBuf::from("/etc/playlist/staging-config.toml"));
    }
}
