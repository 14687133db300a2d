//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCycleStore` - Cycles, milestones and notes in one schema
//! - `create_statements` - Idempotent DDL for that schema

mod cycle_store;
mod schema;

pub use cycle_store::PostgresCycleStore;
pub use schema::create_statements;
