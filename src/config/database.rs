//! Database configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;

use super::error::ValidationError;

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (carries credentials)
    pub url: Option<SecretString>,

    /// Schema holding the cycles, milestones and notes tables
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Minimum connections to maintain
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

/// Where a connection URL points, with credentials left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl ConnectionTarget {
    fn from_options(options: &PgConnectOptions) -> Result<Self, ValidationError> {
        let host = options.get_host();
        if host.is_empty() {
            return Err(ValidationError::MissingDatabaseHost);
        }
        let port = options.get_port();
        if port == 0 {
            return Err(ValidationError::InvalidDatabasePort);
        }
        let database = options
            .get_database()
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingDatabaseName)?;

        Ok(Self {
            host: host.to_string(),
            port,
            user: options.get_username().to_string(),
            database: database.to_string(),
        })
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

impl DatabaseConfig {
    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Expose the connection URL
    pub fn url(&self) -> Result<&str, ValidationError> {
        self.url
            .as_ref()
            .map(|url| url.expose_secret().as_str())
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingRequired("DATABASE_URL"))
    }

    /// Connection options exactly as the pool will use them.
    ///
    /// Sessions are pinned to UTC so `CURRENT_DATE` is the UTC date.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ValidationError> {
        let url = self.url()?;
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        let options =
            PgConnectOptions::from_str(url).map_err(|_| ValidationError::InvalidDatabaseUrl)?;
        Ok(options.options([("timezone", "UTC")]))
    }

    /// Host, port, user and database name the pool will connect to
    pub fn target(&self) -> Result<ConnectionTarget, ValidationError> {
        ConnectionTarget::from_options(&self.connect_options()?)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.target()?;
        if !is_identifier(&self.schema) {
            return Err(ValidationError::InvalidSchemaName(self.schema.clone()));
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 10 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: default_schema(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn default_schema() -> String {
    "groupscholar_cycle_coordinator".to_string()
}

fn default_min_connections() -> u32 {
    0
}

fn default_max_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    10
}
