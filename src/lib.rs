//! Cycle Coordinator - scholarship program cycle tracking
//!
//! This crate tracks scholarship cycles, their milestones, and free-text
//! notes behind a single storage port with PostgreSQL and in-memory
//! backends, driven from a command-line dispatcher.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
