//! Garderobe Costume Rental Management Core
//!
//! The engine behind the desktop costume-rental application: member
//! registry, costume catalog, and the rental lifecycle/availability
//! engine, all persisted in flat CSV stores. The UI layer constructs an
//! [`AppState`] and calls the services; no window or rendering code
//! lives here.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all UI windows
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Open the flat-file stores and wire up all services
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::open(&config.store)?;
        let services = services::Services::new(repository);
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}

/// Initialize tracing for the hosting application. Honors `RUST_LOG`
/// when set, otherwise falls back to the configured level.
pub fn init_logging(config: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("garderobe={}", config.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
