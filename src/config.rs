//! # Configuration
//!
//! Application configuration loading and management.
//!
//! The configuration is loaded once at startup and handed to the
//! components that need it; nothing reads it from global state.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `MARKET_INFO_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MARKET_INFO_CONFIG_FILE` | TOML configuration file | `config.toml` |
//! | `MARKET_INFO_ENVIRONMENT` | `local`, `dev` or `prod` | `local` |
//! | `MARKET_INFO_REST_HOST` | REST server host | `0.0.0.0` |
//! | `MARKET_INFO_REST_PORT` | REST server port | `8080` |
//! | `MARKET_INFO_REST_REQUEST_TIMEOUT_SECS` | Per-request timeout | `4` |
//! | `MARKET_INFO_LOG_LEVEL` | Log level | `debug` locally, else `info` |
//! | `MARKET_INFO_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `MARKET_INFO_DATABASE_URL` | Full Postgres URL, overrides the parts below | unset |
//! | `MARKET_INFO_DATABASE_HOST` | Postgres host | `localhost` |
//! | `MARKET_INFO_DATABASE_PORT` | Postgres port | `5432` |
//! | `MARKET_INFO_DATABASE_NAME` | Database name | `market_info` |
//! | `MARKET_INFO_DATABASE_USERNAME` | Database user | `postgres` |
//! | `MARKET_INFO_DATABASE_PASSWORD` | Database password | empty |
//! | `MARKET_INFO_DATABASE_SSL_MODE` | `disable`, `prefer`, `require`, ... | `prefer` |
//! | `MARKET_INFO_CLICKHOUSE_URL` | ClickHouse HTTP endpoint | `http://localhost:8123` |
//! | `MARKET_INFO_CLICKHOUSE_DATABASE` | ClickHouse database | `market_info` |
//! | `MARKET_INFO_CLICKHOUSE_USERNAME` | ClickHouse user | `default` |
//! | `MARKET_INFO_CLICKHOUSE_PASSWORD` | ClickHouse password | empty |
//!
//! # Examples
//!
//! ```ignore
//! use market_info_storage::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("REST server: {}:{}", config.rest.host, config.rest.port);
//! ```

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Prefix of every environment variable read by [`AppConfig::load`].
pub const ENV_PREFIX: &str = "MARKET_INFO_";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine.
    #[default]
    Local,
    /// Shared development deployment.
    Dev,
    /// Production.
    Prod,
}

impl Environment {
    /// Default log level for the environment.
    #[must_use]
    pub const fn default_log_level(self) -> &'static str {
        match self {
            Self::Local => "debug",
            Self::Dev | Self::Prod => "info",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(ConfigError::invalid(
                "environment",
                format!("unknown env '{other}', must be one of: local, dev, prod"),
            )),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Time allowed for in-flight requests to finish on shutdown, in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl RestConfig {
    /// Returns the socket address for the REST server.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid("rest.host:port", format!("{e}")))
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    ///
    /// Falls back to the environment's default when unset.
    #[serde(default)]
    pub level: Option<String>,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual parts.
    #[serde(default)]
    pub url: Option<String>,

    /// Database host.
    #[serde(default = "default_database_host")]
    pub host: String,

    /// Database port.
    #[serde(default = "default_database_port")]
    pub port: u16,

    /// Database name.
    #[serde(default = "default_database_name")]
    pub name: String,

    /// Database user.
    #[serde(default = "default_database_username")]
    pub username: String,

    /// Database password.
    #[serde(default)]
    pub password: String,

    /// SSL mode (`disable`, `allow`, `prefer`, `require`, `verify-ca`, `verify-full`).
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,

    /// Maximum connection pool size.
    #[serde(default = "default_pool_size")]
    pub max_connections: u32,

    /// Minimum connection pool size.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Apply pending schema migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_database_host(),
            port: default_database_port(),
            name: default_database_name(),
            username: default_database_username(),
            password: String::new(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_pool_size(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connection_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Builds Postgres connection options.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or SSL mode is invalid.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| ConfigError::invalid("database.url", e.to_string()));
        }

        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|e| ConfigError::invalid("database.ssl_mode", e.to_string()))?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode))
    }

    /// Returns the connection timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle connection timeout.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

// ============================================================================
// ClickHouse Configuration
// ============================================================================

/// ClickHouse configuration for the order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// HTTP endpoint of the server.
    #[serde(default = "default_clickhouse_url")]
    pub url: String,

    /// Database name.
    #[serde(default = "default_database_name")]
    pub database: String,

    /// User name.
    #[serde(default = "default_clickhouse_username")]
    pub username: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Create the history table at startup if it is missing.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: default_clickhouse_url(),
            database: default_database_name(),
            username: default_clickhouse_username(),
            password: String::new(),
            run_migrations: true,
        }
    }
}

impl ClickHouseConfig {
    /// Checks that the endpoint is an HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheme is missing or unsupported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rest = self
            .url
            .strip_prefix("http://")
            .or_else(|| self.url.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ConfigError::invalid(
                "clickhouse.url",
                format!("'{}' is not an http(s) URL", self.url),
            )),
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// ClickHouse configuration.
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Loads configuration using `lookup` for unprefixed variable names.
    fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config_path = lookup("CONFIG_FILE").unwrap_or_else(|| "config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies variable overrides to the configuration.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(env) = lookup("ENVIRONMENT") {
            self.environment = env.parse()?;
        }

        // REST configuration
        if let Some(host) = lookup("REST_HOST") {
            self.rest.host = host;
        }
        if let Some(port) = lookup("REST_PORT") {
            self.rest.port = parse_var("rest.port", &port)?;
        }
        if let Some(timeout) = lookup("REST_REQUEST_TIMEOUT_SECS") {
            self.rest.request_timeout_secs = parse_var("rest.request_timeout_secs", &timeout)?;
        }

        // Logging configuration
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log.level = Some(level);
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Database configuration
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("DATABASE_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("DATABASE_PORT") {
            self.database.port = parse_var("database.port", &port)?;
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database.name = name;
        }
        if let Some(username) = lookup("DATABASE_USERNAME") {
            self.database.username = username;
        }
        if let Some(password) = lookup("DATABASE_PASSWORD") {
            self.database.password = password;
        }
        if let Some(ssl_mode) = lookup("DATABASE_SSL_MODE") {
            self.database.ssl_mode = ssl_mode;
        }

        // ClickHouse configuration
        if let Some(url) = lookup("CLICKHOUSE_URL") {
            self.clickhouse.url = url;
        }
        if let Some(database) = lookup("CLICKHOUSE_DATABASE") {
            self.clickhouse.database = database;
        }
        if let Some(username) = lookup("CLICKHOUSE_USERNAME") {
            self.clickhouse.username = username;
        }
        if let Some(password) = lookup("CLICKHOUSE_PASSWORD") {
            self.clickhouse.password = password;
        }

        Ok(())
    }

    /// Returns the effective log level.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log
            .level
            .as_deref()
            .unwrap_or_else(|| self.environment.default_log_level())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rest.socket_addr()?;

        if self.rest.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "rest.request_timeout_secs",
                "must be greater than zero",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level = self.log_level();
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!("invalid log level '{level}', must be one of: {valid_levels:?}"),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::invalid(
                "database.min_connections",
                "must not exceed database.max_connections",
            ));
        }

        self.database.connect_options()?;
        self.clickhouse.validate()?;

        Ok(())
    }
}

fn parse_var<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(field, format!("'{value}': {e}")))
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    4
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_database_host() -> String {
    "localhost".to_string()
}

fn default_database_port() -> u16 {
    5432
}

fn default_database_name() -> String {
    "market_info".to_string()
}

fn default_database_username() -> String {
    "postgres".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_clickhouse_url() -> String {
    "http://localhost:8123".to_string()
}

fn default_clickhouse_username() -> String {
    "default".to_string()
}

fn default_idle_timeout() -> u64 {
    600
}
