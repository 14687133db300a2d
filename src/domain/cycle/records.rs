//! Cycle records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::foundation::{required_text, CycleId, Status, ValidationError};

/// A scholarship program cycle as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub id: CycleId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Status,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// A cycle together with its derived milestone and note counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub cycle: Cycle,
    pub milestone_count: i64,
    pub note_count: i64,
}

/// Validated input for creating a cycle.
///
/// New cycles always start out `planned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycle {
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    owner: String,
}

impl NewCycle {
    /// Validates cycle input.
    ///
    /// # Errors
    ///
    /// - `EmptyField` when name or owner is blank
    /// - `OutOfOrder` when the end date precedes the start date
    pub fn new(
        name: impl AsRef<str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        owner: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let name = required_text("name", name)?;
        let owner = required_text("owner", owner)?;
        if end_date < start_date {
            return Err(ValidationError::out_of_order("end_date", "start_date"));
        }
        Ok(Self {
            name,
            start_date,
            end_date,
            owner,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_single_day_cycle() {
        let cycle = NewCycle::new("Pilot", date(2027, 1, 10), date(2027, 1, 10), "Ops").unwrap();
        assert_eq!(cycle.start_date(), cycle.end_date());
    }

    #[test]
    fn trims_name_and_owner() {
        let cycle = NewCycle::new(" Winter ", date(2027, 1, 10), date(2027, 4, 15), " Ops ").unwrap();
        assert_eq!(cycle.name(), "Winter");
        assert_eq!(cycle.owner(), "Ops");
    }

    #[test]
    fn rejects_end_before_start() {
        let err = NewCycle::new("Winter", date(2027, 4, 15), date(2027, 1, 10), "Ops").unwrap_err();
        assert_eq!(err, ValidationError::out_of_order("end_date", "start_date"));
    }

    #[test]
    fn rejects_blank_owner() {
        let err = NewCycle::new("Winter", date(2027, 1, 10), date(2027, 4, 15), "").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("owner"));
    }
}
