//! Cycle store port.
//!
//! Defines the single storage contract for cycles, milestones and notes.
//! Every backend implements every operation with the same semantics; the
//! backend is picked at startup from configuration.
//!
//! # Ordering
//!
//! - Cycles: start date ascending, then id
//! - Milestones: due date ascending, then id
//! - Notes: creation time descending, then id descending

use async_trait::async_trait;

use crate::domain::cycle::{
    CycleHealth, CycleSummary, Milestone, NewCycle, NewMilestone, NewNote, Note,
    OverdueMilestone, UpcomingMilestone,
};
use crate::domain::foundation::{CycleId, DomainError, MilestoneId, NoteId, Status};

/// Storage port for the cycle coordinator.
///
/// "Today" is the current UTC date. Every `days` window is clamped to
/// `MAX_WINDOW_DAYS`.
#[async_trait]
pub trait CycleStore: Send + Sync {
    /// Create the schema if it does not exist. Safe to call repeatedly.
    async fn initialize(&self) -> Result<(), DomainError>;

    /// Insert the demonstration data when the store holds no cycles.
    ///
    /// Returns the number of cycles inserted, zero when the store was
    /// already populated.
    async fn seed(&self) -> Result<u64, DomainError>;

    /// Create a cycle in `planned` status.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the store did not hand back an identifier
    /// - `DatabaseError` on persistence failure
    async fn add_cycle(&self, cycle: &NewCycle) -> Result<CycleId, DomainError>;

    /// Create a milestone in `planned` status.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if the owning cycle doesn't exist
    /// - `InternalError` if the store did not hand back an identifier
    /// - `DatabaseError` on persistence failure
    async fn add_milestone(&self, milestone: &NewMilestone) -> Result<MilestoneId, DomainError>;

    /// Attach a note to a cycle.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if the owning cycle doesn't exist
    /// - `InternalError` if the store did not hand back an identifier
    /// - `DatabaseError` on persistence failure
    async fn add_note(&self, note: &NewNote) -> Result<NoteId, DomainError>;

    /// Set a cycle's status. Returns rows affected; zero means not found.
    async fn update_status(&self, id: CycleId, status: &Status) -> Result<u64, DomainError>;

    /// Set a milestone's status. Returns rows affected; zero means not found.
    async fn update_milestone_status(
        &self,
        id: MilestoneId,
        status: &Status,
    ) -> Result<u64, DomainError>;

    /// All cycles with milestone and note counts.
    async fn list_cycles(&self) -> Result<Vec<CycleSummary>, DomainError>;

    /// One cycle with milestone and note counts.
    ///
    /// Returns `None` if not found.
    async fn get_cycle(&self, id: CycleId) -> Result<Option<CycleSummary>, DomainError>;

    /// Milestones of one cycle, earliest due first.
    async fn list_milestones(&self, cycle_id: CycleId) -> Result<Vec<Milestone>, DomainError>;

    /// Notes of one cycle, newest first.
    async fn list_notes(&self, cycle_id: CycleId) -> Result<Vec<Note>, DomainError>;

    /// Milestones due from today through `days` days ahead, inclusive.
    async fn list_upcoming_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<UpcomingMilestone>, DomainError>;

    /// Unfinished milestones due within the past `days` days.
    async fn list_overdue_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<OverdueMilestone>, DomainError>;

    /// Milestone health per cycle, ordered like `list_cycles`.
    ///
    /// `upcoming_days` sizes the upcoming bucket; overdue has no look-back
    /// bound.
    async fn list_cycle_health(&self, upcoming_days: u32)
        -> Result<Vec<CycleHealth>, DomainError>;
}
