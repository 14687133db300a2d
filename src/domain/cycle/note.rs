//! Cycle notes. Immutable once written.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::foundation::{required_text, CycleId, NoteId, ValidationError};

/// A free-text annotation attached to a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub cycle_id: CycleId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    cycle_id: CycleId,
    body: String,
}

impl NewNote {
    pub fn new(cycle_id: CycleId, body: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            cycle_id,
            body: required_text("note", body)?,
        })
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
