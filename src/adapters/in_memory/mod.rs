//! In-memory adapters - Process-local implementations of the ports.
//!
//! Used by the test suite and by the `memory` store backend.

mod cycle_store;

pub use cycle_store::InMemoryCycleStore;
