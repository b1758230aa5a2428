//! Configuration management for cropstage
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CROPSTAGE__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Weather archive configuration
    pub weather: WeatherConfig,

    /// Historical comparison configuration
    pub history: HistoryConfig,

    /// Export configuration
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo archive endpoint
    pub api_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// First year included in the historical comparison
    pub earliest_year: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving exported CSV files
    pub dir: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROPSTAGE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROPSTAGE__ prefix)
            .add_source(
                Environment::with_prefix("CROPSTAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("weather.api_endpoint", DEFAULT_ARCHIVE_ENDPOINT)?
            .set_default("weather.timeout_secs", 30)?
            .set_default("history.earliest_year", 1979)?
            .set_default("output.dir", "output")
    }
}
