//! Storage backend selection

use serde::Deserialize;

/// Which `CycleStore` implementation to run against
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`
    #[default]
    Postgres,
    /// Process-local collections; nothing survives the invocation
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

impl StoreConfig {
    pub fn uses_postgres(&self) -> bool {
        self.backend == StoreBackend::Postgres
    }
}
