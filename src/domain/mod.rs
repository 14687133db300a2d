//! Domain layer containing business rules and record types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, status, errors)
//! - `cycle` - Cycles, milestones, notes, health rollups and seed data

pub mod cycle;
pub mod foundation;
