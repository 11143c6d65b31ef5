//! Configuration loading

use anyhow::{Context, Result};
use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Prefix for environment overrides, e.g. `QSL_LOG__AUTH__JWT_SECRET`
const ENV_PREFIX: &str = "QSL_LOG";
const ENV_SEPARATOR: &str = "__";

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
const DEFAULT_COOKIE_SECRET: &str = "change-me-too-in-production";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL; the file is created if missing
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/qsl-log.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Path of the database file, if the URL points at one
    pub fn file_path(&self) -> Option<&Path> {
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(Path::new(path))
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub cookie_secret: String,
    pub cookie_name: String,
    pub token_duration_secs: u64,
    /// Add `Secure` to the session cookie (needs HTTPS in front)
    pub secure_cookies: bool,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            cookie_secret: DEFAULT_COOKIE_SECRET.to_string(),
            cookie_name: qsl_auth::cookie::DEFAULT_COOKIE_NAME.to_string(),
            token_duration_secs: 24 * 60 * 60,
            secure_cookies: false,
            // argon2 crate defaults
            hash_memory_kib: 19 * 1024,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl AuthConfig {
    /// Names of secrets still set to their built-in default
    pub fn default_secrets(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            names.push("auth.jwt_secret");
        }
        if self.cookie_secret == DEFAULT_COOKIE_SECRET {
            names.push("auth.cookie_secret");
        }
        names
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus `QSL_LOG__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: &str, env: Environment) -> Result<Self> {
        if Path::new(path).exists() {
            info!("Loading configuration from {}", path);
        } else {
            info!("Config file not found at {}, using defaults", path);
        }

        let config = ::config::Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}
