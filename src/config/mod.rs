//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CYCLE_COORDINATOR` prefix and nested values use double underscores as
//! separators. The conventional `DATABASE_URL` variable always wins for the
//! connection string.
//!
//! # Example
//!
//! ```no_run
//! use cycle_coordinator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod logging;
mod store;

pub use database::{ConnectionTarget, DatabaseConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use store::{StoreBackend, StoreConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables,
/// then hand the validated struct to the store constructor.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Storage backend selection
    #[serde(default)]
    pub store: StoreConfig,

    /// Log filter
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CYCLE_COORDINATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Applies `DATABASE_URL` over `database.url` when set
    ///
    /// # Environment Variable Format
    ///
    /// - `DATABASE_URL=postgres://...` -> `database.url = ...`
    /// - `CYCLE_COORDINATOR__STORE__BACKEND=memory` -> `store.backend = memory`
    /// - `CYCLE_COORDINATOR__LOGGING__LOG_LEVEL=debug` -> `logging.log_level = debug`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CYCLE_COORDINATOR")
                    .separator("__"),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when the PostgreSQL backend is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store.uses_postgres() {
            self.database.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("DATABASE_URL");
        env::remove_var("CYCLE_COORDINATOR__DATABASE__URL");
        env::remove_var("CYCLE_COORDINATOR__DATABASE__SCHEMA");
        env::remove_var("CYCLE_COORDINATOR__STORE__BACKEND");
        env::remove_var("CYCLE_COORDINATOR__LOGGING__LOG_LEVEL");
    }

    #[test]
    fn test_load_from_database_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DATABASE_URL", "postgresql://ops:pw@localhost:5432/scholar");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url().unwrap(), "postgresql://ops:pw@localhost:5432/scholar");
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_overrides_prefixed_value() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CYCLE_COORDINATOR__DATABASE__URL", "postgres://other/ignored");
        env::set_var("DATABASE_URL", "postgres://localhost/scholar");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url().unwrap(), "postgres://localhost/scholar");
    }

    #[test]
    fn test_missing_database_url_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        );
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CYCLE_COORDINATOR__STORE__BACKEND", "memory");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_schema_and_log_level() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DATABASE_URL", "postgres://localhost/scholar");
        env::set_var("CYCLE_COORDINATOR__DATABASE__SCHEMA", "cycles_test");
        env::set_var("CYCLE_COORDINATOR__LOGGING__LOG_LEVEL", "debug");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.schema, "cycles_test");
        assert_eq!(config.logging.log_level, "debug");
    }
}
