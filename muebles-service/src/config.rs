//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. `SERVER_HOST` / `SERVER_PORT` environment variables
//! 2. Environment variables (prefix: `MUEBLES_`, nesting: `__`, e.g. `MUEBLES_SERVICE__PORT`)
//! 3. Current working directory: ./config.toml
//! 4. XDG config directory: ~/.config/muebles-service/config.toml
//! 5. System directory: /etc/muebles-service/config.toml
//! 6. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{Mueble, COLLECTION};

/// Directory name used under XDG and /etc
const APP_DIR: &str = "muebles-service";

/// Log levels accepted by `service.log_level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// CORS modes accepted by `middleware.cors_mode`
const CORS_MODES: &[&str] = &["permissive", "restrictive", "disabled"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection holding the furniture documents
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Documents loaded into the store at startup
    #[serde(default)]
    pub seed: Vec<Mueble>,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS configuration (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl ServiceConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the service runs in the local development environment
    pub fn is_dev(&self) -> bool {
        self.environment.eq_ignore_ascii_case("dev")
    }
}

impl MiddlewareConfig {
    /// Request body size limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            seed: Vec::new(),
        }
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_collection() -> String {
    COLLECTION.to_string()
}

// Middleware default functions
fn default_body_limit_mb() -> usize {
    10 // 10 MB
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/muebles-service/config.toml
    /// 3. System directory: /etc/muebles-service/config.toml
    ///
    /// Environment variables override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::from_figment(Self::with_env(figment))
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search paths and loads directly from the given file,
    /// still applying environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()));

        Self::from_figment(Self::with_env(figment))
    }

    /// Extract and validate a configuration from an assembled figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed("MUEBLES_").split("__"))
            .merge(
                Env::raw()
                    .only(&["SERVER_HOST", "SERVER_PORT"])
                    .map(|key| legacy_key(key.as_str()).into()),
            )
    }

    /// Candidate config file paths, highest priority first
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_DIR).join("config.toml"));
        paths
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            return Err(invalid("service.name must not be empty"));
        }
        if self.service.port == 0 {
            return Err(invalid("service.port must be non-zero"));
        }
        let level = self.service.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(invalid(format!(
                "service.log_level '{}' is not one of {:?}",
                self.service.log_level, LOG_LEVELS
            )));
        }
        if self.store.collection.trim().is_empty() {
            return Err(invalid("store.collection must not be empty"));
        }
        if !CORS_MODES.contains(&self.middleware.cors_mode.as_str()) {
            return Err(invalid(format!(
                "middleware.cors_mode '{}' is not one of {:?}",
                self.middleware.cors_mode, CORS_MODES
            )));
        }
        Ok(())
    }

    /// Resolve `service.host:service.port` to a bindable address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        (self.service.host.as_str(), self.service.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                invalid(format!(
                    "service.host '{}' does not resolve to an address",
                    self.service.host
                ))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                host: default_host(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            store: StoreConfig::default(),
            middleware: MiddlewareConfig::default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Config(Box::new(figment::Error::from(message.into())))
}

// SERVER_HOST/SERVER_PORT predate the prefixed variables
fn legacy_key(key: &str) -> String {
    if key.eq_ignore_ascii_case("SERVER_HOST") {
        "service.host".to_string()
    } else if key.eq_ignore_ascii_case("SERVER_PORT") {
        "service.port".to_string()
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.name, "muebles-service");
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.store.collection, "muebles");
        assert_eq!(config.middleware.body_limit_mb, 10);
        assert!(config.service.is_dev());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "muebles-test"
port = 4100
environment = "production"

[store]
collection = "inventario"

[[store.seed]]
codigo = 1
nombre = "Mesa"
precio = 150
categoria = "Comedor"
"#
        )
        .unwrap();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file.path()));
        let config = Config::from_figment(figment).unwrap();

        assert_eq!(config.service.name, "muebles-test");
        assert_eq!(config.service.port, 4100);
        assert_eq!(config.service.host, "0.0.0.0");
        assert!(!config.service.is_dev());
        assert_eq!(config.store.collection, "inventario");
        assert_eq!(config.store.seed.len(), 1);
        assert_eq!(config.store.seed[0].precio, 150.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.service.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.middleware.cors_mode = "open".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.store.collection = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.service.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_listen_addr() {
        let mut config = Config::default();
        config.service.host = "127.0.0.1".to_string();
        config.service.port = 3456;
        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:3456".parse().unwrap());
    }

    #[test]
    fn test_legacy_env_keys() {
        assert_eq!(legacy_key("server_host"), "service.host");
        assert_eq!(legacy_key("SERVER_PORT"), "service.port");
        assert_eq!(legacy_key("other"), "other");
    }

    #[test]
    fn test_body_limit_bytes() {
        assert_eq!(MiddlewareConfig::default().body_limit_bytes(), 10 * 1024 * 1024);
    }
}
