//! Milestone records and due-date windows.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::foundation::{
    required_text, CycleId, MilestoneId, Status, ValidationError,
};

/// A dated deliverable within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub cycle_id: CycleId,
    pub name: String,
    pub due_date: NaiveDate,
    pub owner: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// A milestone due soon, annotated with its cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingMilestone {
    pub milestone: Milestone,
    pub cycle_name: String,
    pub days_until_due: i64,
}

/// An unfinished milestone whose due date has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueMilestone {
    pub milestone: Milestone,
    pub cycle_name: String,
    pub days_overdue: i64,
}

/// Validated input for creating a milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMilestone {
    cycle_id: CycleId,
    name: String,
    due_date: NaiveDate,
    owner: String,
}

impl NewMilestone {
    pub fn new(
        cycle_id: CycleId,
        name: impl AsRef<str>,
        due_date: NaiveDate,
        owner: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            cycle_id,
            name: required_text("name", name)?,
            due_date,
            owner: required_text("owner", owner)?,
        })
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Whole days from `today` until `due` (negative once past).
pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Whole days `due` lies behind `today`.
pub fn days_overdue(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days()
}

/// Widest date window, in days, any store honors. Larger requests are
/// clamped to it.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Clamps a requested window to [`MAX_WINDOW_DAYS`].
pub fn window_days(days: u32) -> u32 {
    days.min(MAX_WINDOW_DAYS)
}

/// Due today through `days` days ahead, both ends inclusive.
///
/// A window reaching past the last representable date has no upper bound.
pub fn is_upcoming(due: NaiveDate, today: NaiveDate, days: u32) -> bool {
    let end = today.checked_add_days(Days::new(u64::from(window_days(days))));
    due >= today && end.map_or(true, |end| due <= end)
}

/// Not complete and due within the past `days` days (today excluded).
///
/// A window reaching before the first representable date has no lower bound.
pub fn is_overdue_within(due: NaiveDate, status: &Status, today: NaiveDate, days: u32) -> bool {
    let start = today.checked_sub_days(Days::new(u64::from(window_days(days))));
    !status.is_complete() && due < today && start.map_or(true, |start| due >= start)
}
