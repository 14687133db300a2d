//! CLI adapter - the command-line surface of the coordinator.
//!
//! - `commands` - clap grammar for every command
//! - `handlers` - dispatch from a parsed command to one store operation
//! - `output` - line and table rendering, with a capture mode for tests

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Command};
pub use handlers::{App, CliError, Dispatch};
pub use output::Output;
