//! Strongly-typed identifier value objects.
//!
//! Identifiers are assigned by the store (BIGSERIAL in PostgreSQL, a counter
//! in memory) and are always positive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned identifier.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id: i64 = s.trim().parse().map_err(|_| {
                    ValidationError::invalid_format($field, format!("'{}' is not a number", s))
                })?;
                if id <= 0 {
                    return Err(ValidationError::invalid_format(
                        $field,
                        "must be a positive integer",
                    ));
                }
                Ok(Self(id))
            }
        }
    };
}

store_id!(
    /// Unique identifier for a scholarship cycle.
    CycleId,
    "cycle_id"
);

store_id!(
    /// Unique identifier for a milestone.
    MilestoneId,
    "milestone_id"
);

store_id!(
    /// Unique identifier for a cycle note.
    NoteId,
    "note_id"
);
