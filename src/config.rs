//! Configuration management for the Garderobe core

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Directory holding the flat-file stores
    pub data_dir: PathBuf,
    pub rentals_file: String,
    pub costumes_file: String,
    pub members_file: String,
}

impl StoreConfig {
    pub fn rentals_path(&self) -> PathBuf {
        self.data_dir.join(&self.rentals_file)
    }

    pub fn costumes_path(&self) -> PathBuf {
        self.data_dir.join(&self.costumes_file)
    }

    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load environment variables from .env file
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix GARDEROBE_)
            .add_source(
                Environment::with_prefix("GARDEROBE")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override data directory from GARDEROBE_DATA_DIR env var if present
            .set_override_option("store.data_dir", env::var("GARDEROBE_DATA_DIR").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            rentals_file: "rentals.csv".to_string(),
            costumes_file: "costumes.csv".to_string(),
            members_file: "members.csv".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
