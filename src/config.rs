//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (`--config`, else `MOVE_QUOTE_CONFIG_FILE`, else
//!    `config.toml` when it exists)
//! 3. Environment variables (prefixed with `MOVE_QUOTE_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MOVE_QUOTE_REST_HOST` | REST server host | `0.0.0.0` |
//! | `MOVE_QUOTE_REST_PORT` | REST server port | `8080` |
//! | `MOVE_QUOTE_REST_CORS` | Permissive CORS | `true` |
//! | `MOVE_QUOTE_LOG_LEVEL` | Log level | `info` |
//! | `MOVE_QUOTE_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `MOVE_QUOTE_PRICING_TTL_SECS` | Pricing snapshot lifetime | `14400` |
//! | `MOVE_QUOTE_PRICING_REFRESH_INTERVAL_SECS` | Background refresh interval | `14400` |
//! | `MOVE_QUOTE_PRICING_FETCH_TIMEOUT_MS` | Feed fetch timeout | `10000` |
//! | `MOVE_QUOTE_PRICING_FEED_BASE_URL` | Pricing feed URL | unset (built-in sample) |
//! | `MOVE_QUOTE_GEO_PROVIDER` | `in_memory` or `http` | `in_memory` |
//! | `MOVE_QUOTE_GEO_BASE_URL` | Geo service URL | unset |
//! | `MOVE_QUOTE_GEO_API_KEY` | Geo service bearer token | unset |
//! | `MOVE_QUOTE_GEO_TIMEOUT_MS` | Geo request timeout | `5000` |
//! | `MOVE_QUOTE_GEO_REQUESTS_PER_SECOND` | Geo rate limit | `20` |
//! | `MOVE_QUOTE_ORCHESTRATOR_DEADLINE_MS` | Quote generation deadline | `30000` |
//! | `MOVE_QUOTE_DIRECTORY_SEED_FILE` | Directory seed TOML | unset (built-in seed) |
//!
//! # Examples
//!
//! ```ignore
//! use move_quote::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! config.validate()?;
//! println!("REST server: {}", config.rest.socket_addr()?);
//! ```

use crate::application::services::{OrchestratorConfig, PricingCacheConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "MOVE_QUOTE_";

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

    /// Environment variable error.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
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
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,

    /// Enable permissive CORS.
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
            cors: true,
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
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Pricing Configuration
// ============================================================================

/// Pricing cache and feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Snapshot lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Background refresh interval in seconds.
    #[serde(default = "default_ttl_secs")]
    pub refresh_interval_secs: u64,

    /// Feed fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Pricing feed base URL; the built-in sample feed is used when unset.
    #[serde(default)]
    pub feed_base_url: Option<String>,

    /// Refresh every location once at startup.
    #[serde(default = "default_true")]
    pub warm_on_start: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            refresh_interval_secs: default_ttl_secs(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            feed_base_url: None,
            warm_on_start: true,
        }
    }
}

impl PricingConfig {
    /// Cache settings.
    #[must_use]
    pub fn cache_config(&self) -> PricingCacheConfig {
        PricingCacheConfig::with_ttl(Duration::from_secs(self.ttl_secs))
            .with_fetch_timeout(Duration::from_millis(self.fetch_timeout_ms))
    }

    /// Background refresh interval.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

// ============================================================================
// Geo Configuration
// ============================================================================

/// Geo resolver implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeoProvider {
    /// Built-in city table with road estimates.
    #[default]
    InMemory,
    /// Remote geocoding and routing service.
    Http,
}

impl FromStr for GeoProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(Self::InMemory),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::invalid(
                "geo.provider",
                format!("unknown provider '{other}', expected in_memory or http"),
            )),
        }
    }
}

/// Geo resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Resolver implementation.
    #[serde(default)]
    pub provider: GeoProvider,

    /// Service base URL, required for the HTTP provider.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token for the HTTP provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_geo_timeout_ms")]
    pub timeout_ms: u64,

    /// Outbound request rate limit.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            provider: GeoProvider::InMemory,
            base_url: None,
            api_key: None,
            timeout_ms: default_geo_timeout_ms(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

// ============================================================================
// Orchestrator and Directory Configuration
// ============================================================================

/// Quote orchestration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Global deadline for one quote request, in milliseconds.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl OrchestratorSettings {
    /// Orchestrator settings.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::with_deadline(Duration::from_millis(self.deadline_ms))
    }
}

/// Dispatcher directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Seed file; the built-in seed is used when unset.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Pricing configuration.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Geo resolver configuration.
    #[serde(default)]
    pub geo: GeoConfig,

    /// Orchestration configuration.
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    /// Directory configuration.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Loads configuration from an optional file and environment variables.
    ///
    /// `path` takes precedence over `MOVE_QUOTE_CONFIG_FILE`; an explicit
    /// path must exist, the default `config.toml` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = std::env::var(format!("{ENV_PREFIX}CONFIG_FILE"))
                    .unwrap_or_else(|_| "config.toml".to_string());
                if Path::new(&config_path).exists() {
                    Self::from_file(&config_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `MOVE_QUOTE_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an override that does not
    /// parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        // REST configuration
        if let Some(host) = var("REST_HOST") {
            self.rest.host = host;
        }
        if let Some(port) = var("REST_PORT") {
            self.rest.port = parse_value("rest.port", &port)?;
        }
        if let Some(cors) = var("REST_CORS") {
            self.rest.cors = parse_value("rest.cors", &cors)?;
        }

        // Logging configuration
        if let Some(level) = var("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Pricing configuration
        if let Some(ttl) = var("PRICING_TTL_SECS") {
            self.pricing.ttl_secs = parse_value("pricing.ttl_secs", &ttl)?;
        }
        if let Some(interval) = var("PRICING_REFRESH_INTERVAL_SECS") {
            self.pricing.refresh_interval_secs =
                parse_value("pricing.refresh_interval_secs", &interval)?;
        }
        if let Some(timeout) = var("PRICING_FETCH_TIMEOUT_MS") {
            self.pricing.fetch_timeout_ms = parse_value("pricing.fetch_timeout_ms", &timeout)?;
        }
        if let Some(url) = var("PRICING_FEED_BASE_URL") {
            self.pricing.feed_base_url = non_empty(url);
        }

        // Geo configuration
        if let Some(provider) = var("GEO_PROVIDER") {
            self.geo.provider = provider.parse()?;
        }
        if let Some(url) = var("GEO_BASE_URL") {
            self.geo.base_url = non_empty(url);
        }
        if let Some(key) = var("GEO_API_KEY") {
            self.geo.api_key = non_empty(key);
        }
        if let Some(timeout) = var("GEO_TIMEOUT_MS") {
            self.geo.timeout_ms = parse_value("geo.timeout_ms", &timeout)?;
        }
        if let Some(rps) = var("GEO_REQUESTS_PER_SECOND") {
            self.geo.requests_per_second = parse_value("geo.requests_per_second", &rps)?;
        }

        // Orchestrator and directory
        if let Some(deadline) = var("ORCHESTRATOR_DEADLINE_MS") {
            self.orchestrator.deadline_ms = parse_value("orchestrator.deadline_ms", &deadline)?;
        }
        if let Some(seed) = var("DIRECTORY_SEED_FILE") {
            self.directory.seed_file = non_empty(seed).map(PathBuf::from);
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rest.socket_addr()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if self.pricing.ttl_secs == 0 {
            return Err(ConfigError::invalid("pricing.ttl_secs", "must be greater than 0"));
        }
        if self.pricing.fetch_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "pricing.fetch_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.orchestrator.deadline_ms == 0 {
            return Err(ConfigError::invalid(
                "orchestrator.deadline_ms",
                "must be greater than 0",
            ));
        }
        if self.geo.provider == GeoProvider::Http && self.geo.base_url.is_none() {
            return Err(ConfigError::invalid(
                "geo.base_url",
                "required when geo.provider is http",
            ));
        }

        Ok(())
    }
}

fn parse_value<T>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::invalid(field, format!("'{raw}': {e}")))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
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

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ttl_secs() -> u64 {
    crate::application::services::pricing_cache::DEFAULT_TTL_SECS
}

fn default_fetch_timeout_ms() -> u64 {
    crate::application::services::pricing_cache::DEFAULT_FETCH_TIMEOUT_MS
}

fn default_geo_timeout_ms() -> u64 {
    5000
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_deadline_ms() -> u64 {
    crate::application::services::quote_orchestrator::DEFAULT_DEADLINE_MS
}
