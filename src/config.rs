//! Configuration management for the Tempo rate adapter
//!
//! This module handles loading and validation of the application configuration
//! from a YAML file whose location may be overridden through the environment.

use crate::error::{Result, TempoError};
use crate::tempo::DayType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod defaults;

/// Environment variable overriding the configuration file location
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Configuration file used when `CONFIG_FILE` is not set
pub const DEFAULT_CONFIG_FILE: &str = "/etc/evcc-tempo/evcc-tempo.yaml";

/// Environment variable overriding the listening port
pub const PORT_ENV: &str = "PORT";

/// Main configuration structure
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OAuth client id issued by the RTE data portal
    #[serde(alias = "clientid")]
    pub client_id: String,

    /// OAuth client secret issued by the RTE data portal
    #[serde(alias = "clientsecret", skip_serializing)]
    pub client_secret: String,

    /// Peak/off-peak prices per Tempo day colour
    pub prices: PricesConfig,

    /// IANA time zone used for local day boundaries
    pub timezone: String,

    /// Upstream API connection settings
    pub upstream: UpstreamConfig,

    /// Web server binding configuration
    pub web: WebConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Prices for a single day colour, in currency units per kWh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub peak: f64,

    #[serde(alias = "off-peak", alias = "offpeak")]
    pub off_peak: f64,
}

/// Price entries for the three Tempo colours
///
/// Each colour is optional here so that an incomplete file is reported with the
/// missing colour named, rather than as a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricesConfig {
    pub blue: Option<PriceConfig>,
    pub white: Option<PriceConfig>,
    pub red: Option<PriceConfig>,
}

impl PricesConfig {
    /// Configured entry for a day colour
    pub fn get(&self, day_type: DayType) -> Option<PriceConfig> {
        match day_type {
            DayType::Blue => self.blue,
            DayType::White => self.white,
            DayType::Red => self.red,
        }
    }
}

/// Upstream API connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the RTE API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Backoff applied to calendar requests
    pub retry: RetryConfig,
}

/// Exponential backoff parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay before the first retry
    pub initial_interval_ms: u64,

    /// Growth factor applied after each retry
    pub multiplier: f64,

    /// Upper bound for a single delay
    pub max_interval_ms: u64,

    /// Total time budget across all attempts
    pub max_elapsed_ms: u64,

    /// Treat HTTP 5xx answers as transient instead of permanent
    pub retry_server_errors: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file; file logging is disabled when unset
    pub file: Option<String>,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("prices", &self.prices)
            .field("timezone", &self.timezone)
            .field("upstream", &self.upstream)
            .field("web", &self.web)
            .field("logging", &self.logging)
            .finish()
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TempoError::io(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Configuration file location, honouring `CONFIG_FILE`
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Load and validate configuration; every failure is fatal for the process
    pub fn load() -> Result<Self> {
        let path = Self::resolve_path();
        let in_file = |e: TempoError| {
            TempoError::config(format!("in file {:?}: {}", path.display().to_string(), e))
        };
        let mut config = Self::from_file(&path).map_err(in_file)?;
        config.apply_env_overrides();
        config.validate().map_err(in_file)?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
        {
            self.web.port = port;
        }
    }

    /// Parsed configured time zone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            TempoError::validation(
                "timezone".to_string(),
                format!("unknown time zone '{}'", self.timezone),
            )
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(TempoError::validation("client_id", "Cannot be empty"));
        }

        if self.client_secret.trim().is_empty() {
            return Err(TempoError::validation("client_secret", "Cannot be empty"));
        }

        for day_type in DayType::ALL {
            let field = format!("prices.{}", day_type.as_str().to_lowercase());
            let Some(price) = self.prices.get(day_type) else {
                return Err(TempoError::validation(
                    field,
                    "missing prices for red/blue/white".to_string(),
                ));
            };
            for (name, value) in [("peak", price.peak), ("off_peak", price.off_peak)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(TempoError::validation(
                        format!("{}.{}", field, name),
                        "Must be a non-negative number".to_string(),
                    ));
                }
            }
        }

        self.tz()?;

        if self.upstream.base_url.trim().is_empty() {
            return Err(TempoError::validation(
                "upstream.base_url",
                "Cannot be empty",
            ));
        }

        if self.upstream.timeout_seconds == 0 {
            return Err(TempoError::validation(
                "upstream.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        let retry = &self.upstream.retry;
        if retry.initial_interval_ms == 0 {
            return Err(TempoError::validation(
                "upstream.retry.initial_interval_ms",
                "Must be greater than 0",
            ));
        }

        if !retry.multiplier.is_finite() || retry.multiplier < 1.0 {
            return Err(TempoError::validation(
                "upstream.retry.multiplier",
                "Must be at least 1.0",
            ));
        }

        if self.web.port == 0 {
            return Err(TempoError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }

    /// One-line summary safe to log
    pub fn summary(&self) -> String {
        format!(
            "client_id={}, timezone={}, upstream={}, retry_budget_ms={}, listen={}:{}",
            self.client_id,
            self.timezone,
            self.upstream.base_url,
            self.upstream.retry.max_elapsed_ms,
            self.web.host,
            self.web.port
        )
    }
}
