//! Configuration management for the stormwatch service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates the result before the server starts.

use crate::StormError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the stormwatch service
#[derive(Debug, Clone, Deserialize)]
pub struct StormConfig {
    /// Inbound HTTP server settings
    pub server: ServerConfig,
    /// Upstream service endpoints and client settings
    pub upstream: UpstreamConfig,
    /// API keys for the credentialed upstreams
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built browser client, served for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    /// Upper bound for handling one inbound request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Upstream service endpoints and client settings
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// weather.gov API root, used for points and alerts
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// AirNow API root
    #[serde(default = "default_airnow_base_url")]
    pub airnow_base_url: String,
    /// NASA Earth imagery endpoint handed to the browser
    #[serde(default = "default_nasa_imagery_url")]
    pub nasa_imagery_url: String,
    /// Timeout for every outbound call, in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
    /// weather.gov rejects requests without a User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// AirNow search distance
    #[serde(default = "default_air_quality_radius")]
    pub air_quality_radius_miles: u32,
}

/// API keys for the credentialed upstreams
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub nasa_api_key: Option<ApiKey>,
    #[serde(default)]
    pub airnow_api_key: Option<ApiKey>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// A secret API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    /// The raw key, for building upstream requests only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u32 {
    30
}

fn default_weather_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_airnow_base_url() -> String {
    "https://www.airnowapi.org".to_string()
}

fn default_nasa_imagery_url() -> String {
    "https://api.nasa.gov/planetary/earth/imagery".to_string()
}

fn default_upstream_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("stormwatch/{}", crate::VERSION)
}

fn default_air_quality_radius() -> u32 {
    25
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                static_dir: None,
                request_timeout_seconds: default_request_timeout(),
            },
            upstream: UpstreamConfig {
                weather_base_url: default_weather_base_url(),
                airnow_base_url: default_airnow_base_url(),
                nasa_imagery_url: default_nasa_imagery_url(),
                timeout_seconds: default_upstream_timeout(),
                user_agent: default_user_agent(),
                air_quality_radius_miles: default_air_quality_radius(),
            },
            credentials: CredentialsConfig::default(),
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StormConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("STORMWATCH_CONFIG").map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.request_timeout_seconds", i64::from(default_request_timeout()))?
            .set_default("upstream.weather_base_url", default_weather_base_url())?
            .set_default("upstream.airnow_base_url", default_airnow_base_url())?
            .set_default("upstream.nasa_imagery_url", default_nasa_imagery_url())?
            .set_default("upstream.timeout_seconds", i64::from(default_upstream_timeout()))?
            .set_default("upstream.user_agent", default_user_agent())?
            .set_default(
                "upstream.air_quality_radius_miles",
                i64::from(default_air_quality_radius()),
            )?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // STORMWATCH_SERVER__PORT, STORMWATCH_CREDENTIALS__NASA_API_KEY, ...
        builder = builder.add_source(
            Environment::with_prefix("STORMWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Conventional variable names win over everything else
        builder = builder
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("credentials.nasa_api_key", std::env::var("NASA_API_KEY").ok())?
            .set_override_option(
                "credentials.airnow_api_key",
                std::env::var("AIRNOW_API_KEY").ok(),
            )?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: StormConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty or zero configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.upstream.weather_base_url.is_empty() {
            self.upstream.weather_base_url = default_weather_base_url();
        }
        if self.upstream.airnow_base_url.is_empty() {
            self.upstream.airnow_base_url = default_airnow_base_url();
        }
        if self.upstream.nasa_imagery_url.is_empty() {
            self.upstream.nasa_imagery_url = default_nasa_imagery_url();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.upstream.user_agent.is_empty() {
            self.upstream.user_agent = default_user_agent();
        }
        if self.upstream.air_quality_radius_miles == 0 {
            self.upstream.air_quality_radius_miles = default_air_quality_radius();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a configured key must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("NASA", &self.credentials.nasa_api_key),
            ("AirNow", &self.credentials.airnow_api_key),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                if key.expose().trim().is_empty() {
                    return Err(StormError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(StormError::config("Server port cannot be 0").into());
        }

        if self.upstream.timeout_seconds > 300 {
            return Err(StormError::config("Upstream timeout cannot exceed 300 seconds").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(StormError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.upstream.air_quality_radius_miles > 500 {
            return Err(StormError::config("Air quality search radius cannot exceed 500 miles").into());
        }

        // point lookup then its dependent fetch, each bounded by the upstream timeout
        let upstream_chain = u64::from(self.upstream.timeout_seconds) * 2;
        if u64::from(self.server.request_timeout_seconds) <= upstream_chain {
            return Err(StormError::config(format!(
                "Request timeout ({}s) must exceed twice the upstream timeout ({}s)",
                self.server.request_timeout_seconds, self.upstream.timeout_seconds
            ))
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(StormError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(StormError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("weather", &self.upstream.weather_base_url),
            ("AirNow", &self.upstream.airnow_base_url),
            ("NASA imagery", &self.upstream.nasa_imagery_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StormError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StormConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upstream.weather_base_url, "https://api.weather.gov");
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.upstream.air_quality_radius_miles, 25);
        assert_eq!(config.logging.level, "info");
        assert!(config.credentials.nasa_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let mut config = StormConfig::default();
        config.credentials.airnow_api_key = Some(ApiKey::new("super-secret-key"));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("ApiKey(***)"));
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = StormConfig::default();
        config.credentials.nasa_api_key = Some(ApiKey::new("  "));
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("NASA API key"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = StormConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = StormConfig::default();
        config.upstream.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_request_timeout_covers_upstream_chain() {
        let mut config = StormConfig::default();
        config.upstream.timeout_seconds = 5;
        config.server.request_timeout_seconds = 1;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("twice the upstream timeout"));

        config.server.request_timeout_seconds = 10;
        assert!(config.validate().is_err());

        config.server.request_timeout_seconds = 11;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = StormConfig::default();
        config.upstream.weather_base_url = "ftp://api.weather.gov".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("weather URL"));
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = StormConfig::default();
        config.upstream.timeout_seconds = 0;
        config.upstream.user_agent = String::new();
        config.apply_defaults();
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert!(config.upstream.user_agent.starts_with("stormwatch/"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("stormwatch-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "[upstream]\nweather_base_url = \"http://localhost:9999\"\ntimeout_seconds = 5\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = StormConfig::load_from_path(Some(path)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(config.upstream.weather_base_url, "http://localhost:9999");
        assert_eq!(config.upstream.timeout_seconds, 5);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.upstream.airnow_base_url, "https://www.airnowapi.org");
    }
}
