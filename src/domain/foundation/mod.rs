//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the status value object, and the error types
//! that form the vocabulary of the cycle coordinator domain.

mod errors;
mod ids;
mod status;
mod text;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CycleId, MilestoneId, NoteId};
pub use status::Status;
pub use text::required_text;
