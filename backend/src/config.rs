//! Configuration management for the Crop Advisory Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Reference database configuration
    pub database: DatabaseConfig,

    /// Reference tables used for lookups
    pub reference: ReferenceConfig,

    /// Plant identification model configuration
    pub identifier: IdentifierConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Request defaults for the advisory endpoints
    pub advisory: AdvisoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Seconds a single reference query may run before it counts as not found
    pub query_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReferenceTableConfig {
    /// Table name
    pub table: String,

    /// Column holding the plant name
    pub plant_column: String,

    /// Column holding the disease name
    pub disease_column: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReferenceConfig {
    /// Plant disease facts
    pub plant: ReferenceTableConfig,

    /// Pesticide and treatment solutions
    pub solution: ReferenceTableConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentifierConfig {
    /// Generative Language API base URL
    pub api_endpoint: String,

    /// API key
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Number of forecast days to request
    pub forecast_days: u8,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    /// Location used when a weather request names none
    pub default_location: String,

    /// Crop used when a weather request names none
    pub default_crop: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "postgres://localhost/crop_advisory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 0)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("database.query_timeout_secs", 5)?
            .set_default("reference.plant.table", "plant_data")?
            .set_default("reference.plant.plant_column", "plant_name")?
            .set_default("reference.plant.disease_column", "disease_name")?
            .set_default("reference.solution.table", "pesticide_solutions")?
            .set_default("reference.solution.plant_column", "Plant")?
            .set_default("reference.solution.disease_column", "Disease")?
            .set_default(
                "identifier.api_endpoint",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("identifier.api_key", "")?
            .set_default("identifier.model", "gemini-2.5-flash")?
            .set_default("identifier.timeout_secs", 60)?
            .set_default("weather.api_endpoint", "http://api.weatherapi.com/v1")?
            .set_default("weather.api_key", "")?
            .set_default("weather.forecast_days", 3)?
            .set_default("weather.timeout_secs", 10)?
            .set_default("advisory.default_location", "Bangalore")?
            .set_default("advisory.default_crop", "Unknown")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
