//! Free-text status value object shared by cycles and milestones.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Lifecycle status of a cycle or milestone.
///
/// Statuses are free text; `planned`, `in-progress` and `complete` carry
/// meaning for health rollups, anything else counts as planned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub const PLANNED: &'static str = "planned";
    pub const IN_PROGRESS: &'static str = "in-progress";
    pub const COMPLETE: &'static str = "complete";

    /// Creates a status from user input, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("status"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a status read back from storage.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Default status for newly created records.
    pub fn planned() -> Self {
        Self(Self::PLANNED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0 == Self::COMPLETE
    }

    pub fn is_in_progress(&self) -> bool {
        self.0 == Self::IN_PROGRESS
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::planned()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
