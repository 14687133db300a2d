//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cli` - Command-line dispatcher and output rendering
//! - `in_memory` - Process-local `CycleStore` for tests and demos
//! - `postgres` - PostgreSQL-backed `CycleStore`

pub mod cli;
pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCycleStore;
pub use postgres::PostgresCycleStore;
