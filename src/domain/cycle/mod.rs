//! Cycle module - Scholarship cycles and the records attached to them.
//!
//! A cycle is a program window with a status and an owner. Milestones are
//! dated deliverables inside a cycle and notes are free-text annotations.
//! Both reference their owning cycle and disappear with it.

mod health;
mod milestone;
mod note;
mod records;
pub mod seed;

pub use health::{CycleHealth, MilestoneTally};
pub use milestone::{
    days_overdue, days_until_due, is_overdue_within, is_upcoming, window_days, Milestone,
    NewMilestone, OverdueMilestone, UpcomingMilestone, MAX_WINDOW_DAYS,
};
pub use note::{NewNote, Note};
pub use records::{Cycle, CycleSummary, NewCycle};
