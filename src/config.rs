//! Configuration module for TraitCal
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for the
//! server, the storage paths and the generation engine.

use chrono::{Duration, FixedOffset};
use envconfig::Envconfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure for TraitCal
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Server configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub server: ServerConfig,

    /// Storage path configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub storage: StorageConfig,

    /// Generation engine configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub generator: GeneratorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    /// Host to bind to
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Request timeout in seconds
    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Storage path configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct StorageConfig {
    /// Directory holding the input documents
    #[envconfig(from = "INPUT_DIR", default = "input")]
    pub input_dir: String,

    /// Directory the calendar feeds are written to
    #[envconfig(from = "OUTPUT_DIR", default = "output")]
    pub output_dir: String,
}

/// Generation engine configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct GeneratorConfig {
    /// Target timezone as whole hours east of UTC
    #[envconfig(from = "UTC_OFFSET_HOURS", default = "4")]
    pub utc_offset_hours: i32,

    /// Fallback event length in seconds, applied wherever neither a
    /// duration nor an end is specified
    #[envconfig(from = "DEFAULT_EVENT_DURATION_SECS", default = "1200")]
    pub default_event_duration_secs: u32,

    /// PRODID of the main-events feed
    #[envconfig(from = "MAIN_CALENDAR_PRODID", default = "TraitCal Main Events")]
    pub main_prodid: String,

    /// PRODID of the satellite-events feed
    #[envconfig(from = "OTHER_CALENDAR_PRODID", default = "TraitCal Other Events")]
    pub other_prodid: String,
}

impl GeneratorConfig {
    /// The fixed target timezone offset
    pub fn timezone(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or_else(|| Error::config(format!("Invalid UTC offset: {}h", self.utc_offset_hours)))
    }

    /// The fallback event length
    pub fn default_event_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.default_event_duration_secs))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        // Parse configuration from environment
        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }

        if self.storage.input_dir.is_empty() {
            return Err(Error::config("Input directory cannot be empty"));
        }

        if self.storage.output_dir.is_empty() {
            return Err(Error::config("Output directory cannot be empty"));
        }

        if self.generator.default_event_duration_secs == 0 {
            return Err(Error::config("Default event duration must be at least 1 second"));
        }

        // Surface an out-of-range offset at startup rather than per run
        self.generator.timezone()?;

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            "Server configuration"
        );

        tracing::info!(
            input_dir = %self.storage.input_dir,
            output_dir = %self.storage.output_dir,
            "Storage configuration"
        );

        tracing::info!(
            utc_offset_hours = %self.generator.utc_offset_hours,
            default_event_duration_secs = %self.generator.default_event_duration_secs,
            "Generator configuration"
        );
    }
}
