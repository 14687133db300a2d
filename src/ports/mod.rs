//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CycleStore` - Persistence and read aggregations for cycles,
//!   milestones and notes

mod cycle_store;

pub use cycle_store::CycleStore;
