//! In-Memory Cycle Store Adapter
//!
//! Keeps cycles, milestones and notes in process-local collections. Every
//! read aggregation is a linear scan, which is plenty for test data and the
//! `memory` backend. Useful for testing and demos.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cycle::seed::{seed_date, SEED_CYCLES};
use crate::domain::cycle::{
    days_overdue, days_until_due, is_overdue_within, is_upcoming, Cycle, CycleHealth,
    CycleSummary, Milestone, MilestoneTally, NewCycle, NewMilestone, NewNote, Note,
    OverdueMilestone, UpcomingMilestone,
};
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, MilestoneId, NoteId, Status,
};
use crate::ports::CycleStore;

#[derive(Debug, Default)]
struct State {
    cycles: Vec<Cycle>,
    milestones: Vec<Milestone>,
    notes: Vec<Note>,
    last_cycle_id: i64,
    last_milestone_id: i64,
    last_note_id: i64,
}

impl State {
    fn cycle_exists(&self, id: CycleId) -> bool {
        self.cycles.iter().any(|c| c.id == id)
    }

    fn cycle_name(&self, id: CycleId) -> String {
        self.cycles
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn summarize(&self, cycle: &Cycle) -> CycleSummary {
        let milestone_count = self
            .milestones
            .iter()
            .filter(|m| m.cycle_id == cycle.id)
            .count();
        let note_count = self.notes.iter().filter(|n| n.cycle_id == cycle.id).count();

        CycleSummary {
            cycle: cycle.clone(),
            milestone_count: milestone_count as i64,
            note_count: note_count as i64,
        }
    }

    fn cycles_by_start(&self) -> Vec<&Cycle> {
        let mut cycles: Vec<&Cycle> = self.cycles.iter().collect();
        cycles.sort_by_key(|c| (c.start_date, c.id));
        cycles
    }

    fn insert_cycle(&mut self, cycle: &NewCycle, status: Status) -> CycleId {
        self.last_cycle_id += 1;
        let id = CycleId::new(self.last_cycle_id);
        self.cycles.push(Cycle {
            id,
            name: cycle.name().to_string(),
            start_date: cycle.start_date(),
            end_date: cycle.end_date(),
            status,
            owner: cycle.owner().to_string(),
            created_at: Utc::now(),
        });
        id
    }

    fn insert_milestone(
        &mut self,
        milestone: &NewMilestone,
        status: Status,
    ) -> Result<MilestoneId, DomainError> {
        if !self.cycle_exists(milestone.cycle_id()) {
            return Err(cycle_not_found(milestone.cycle_id()));
        }
        self.last_milestone_id += 1;
        let id = MilestoneId::new(self.last_milestone_id);
        self.milestones.push(Milestone {
            id,
            cycle_id: milestone.cycle_id(),
            name: milestone.name().to_string(),
            due_date: milestone.due_date(),
            owner: milestone.owner().to_string(),
            status,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn insert_note(&mut self, note: &NewNote) -> Result<NoteId, DomainError> {
        if !self.cycle_exists(note.cycle_id()) {
            return Err(cycle_not_found(note.cycle_id()));
        }
        self.last_note_id += 1;
        let id = NoteId::new(self.last_note_id);
        self.notes.push(Note {
            id,
            cycle_id: note.cycle_id(),
            body: note.body().to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

/// In-memory implementation of the CycleStore port.
///
/// Clones share the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCycleStore {
    state: Arc<RwLock<State>>,
    today: Option<NaiveDate>,
}

impl InMemoryCycleStore {
    /// Create an empty store whose "today" is the current UTC date, the same
    /// clock the PostgreSQL store's sessions use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin "today" for date-window queries (useful for tests).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Get the number of stored cycles
    pub async fn cycle_count(&self) -> usize {
        self.state.read().await.cycles.len()
    }

    /// Get the number of stored milestones
    pub async fn milestone_count(&self) -> usize {
        self.state.read().await.milestones.len()
    }

    /// Get the number of stored notes
    pub async fn note_count(&self) -> usize {
        self.state.read().await.notes.len()
    }

    /// Clear all stored data and reset identifiers (useful for tests)
    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }
}

fn cycle_not_found(id: CycleId) -> DomainError {
    DomainError::new(ErrorCode::CycleNotFound, format!("Cycle not found: {}", id))
}

fn invalid_seed_date() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Seed data contains an invalid date")
}

#[async_trait]
impl CycleStore for InMemoryCycleStore {
    async fn initialize(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn seed(&self) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        if !state.cycles.is_empty() {
            return Ok(0);
        }

        // Stage into a copy so a bad row leaves the store untouched.
        let mut staged = State {
            last_cycle_id: state.last_cycle_id,
            last_milestone_id: state.last_milestone_id,
            last_note_id: state.last_note_id,
            ..State::default()
        };

        for seed in SEED_CYCLES {
            let cycle = NewCycle::new(
                seed.name,
                seed_date(seed.start_date).ok_or_else(invalid_seed_date)?,
                seed_date(seed.end_date).ok_or_else(invalid_seed_date)?,
                seed.owner,
            )?;
            let cycle_id = staged.insert_cycle(&cycle, Status::new(seed.status)?);

            for m in seed.milestones {
                let milestone = NewMilestone::new(
                    cycle_id,
                    m.name,
                    seed_date(m.due_date).ok_or_else(invalid_seed_date)?,
                    m.owner,
                )?;
                staged.insert_milestone(&milestone, Status::new(m.status)?)?;
            }

            for body in seed.notes {
                staged.insert_note(&NewNote::new(cycle_id, body)?)?;
            }
        }

        *state = staged;
        Ok(SEED_CYCLES.len() as u64)
    }

    async fn add_cycle(&self, cycle: &NewCycle) -> Result<CycleId, DomainError> {
        Ok(self.state.write().await.insert_cycle(cycle, Status::planned()))
    }

    async fn add_milestone(&self, milestone: &NewMilestone) -> Result<MilestoneId, DomainError> {
        self.state
            .write()
            .await
            .insert_milestone(milestone, Status::planned())
    }

    async fn add_note(&self, note: &NewNote) -> Result<NoteId, DomainError> {
        self.state.write().await.insert_note(note)
    }

    async fn update_status(&self, id: CycleId, status: &Status) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut updated = 0;
        for cycle in state.cycles.iter_mut().filter(|c| c.id == id) {
            cycle.status = status.clone();
            updated += 1;
        }
        Ok(updated)
    }

    async fn update_milestone_status(
        &self,
        id: MilestoneId,
        status: &Status,
    ) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut updated = 0;
        for milestone in state.milestones.iter_mut().filter(|m| m.id == id) {
            milestone.status = status.clone();
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_cycles(&self) -> Result<Vec<CycleSummary>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .cycles_by_start()
            .into_iter()
            .map(|cycle| state.summarize(cycle))
            .collect())
    }

    async fn get_cycle(&self, id: CycleId) -> Result<Option<CycleSummary>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .cycles
            .iter()
            .find(|c| c.id == id)
            .map(|cycle| state.summarize(cycle)))
    }

    async fn list_milestones(&self, cycle_id: CycleId) -> Result<Vec<Milestone>, DomainError> {
        let state = self.state.read().await;
        let mut milestones: Vec<Milestone> = state
            .milestones
            .iter()
            .filter(|m| m.cycle_id == cycle_id)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| (m.due_date, m.id));
        Ok(milestones)
    }

    async fn list_notes(&self, cycle_id: CycleId) -> Result<Vec<Note>, DomainError> {
        let state = self.state.read().await;
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .filter(|n| n.cycle_id == cycle_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn list_upcoming_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<UpcomingMilestone>, DomainError> {
        let today = self.today();
        let state = self.state.read().await;
        let mut upcoming: Vec<UpcomingMilestone> = state
            .milestones
            .iter()
            .filter(|m| is_upcoming(m.due_date, today, days))
            .map(|m| UpcomingMilestone {
                milestone: m.clone(),
                cycle_name: state.cycle_name(m.cycle_id),
                days_until_due: days_until_due(m.due_date, today),
            })
            .collect();
        upcoming.sort_by_key(|u| (u.milestone.due_date, u.milestone.id));
        Ok(upcoming)
    }

    async fn list_overdue_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<OverdueMilestone>, DomainError> {
        let today = self.today();
        let state = self.state.read().await;
        let mut overdue: Vec<OverdueMilestone> = state
            .milestones
            .iter()
            .filter(|m| is_overdue_within(m.due_date, &m.status, today, days))
            .map(|m| OverdueMilestone {
                milestone: m.clone(),
                cycle_name: state.cycle_name(m.cycle_id),
                days_overdue: days_overdue(m.due_date, today),
            })
            .collect();
        overdue.sort_by_key(|o| (o.milestone.due_date, o.milestone.id));
        Ok(overdue)
    }

    async fn list_cycle_health(
        &self,
        upcoming_days: u32,
    ) -> Result<Vec<CycleHealth>, DomainError> {
        let today = self.today();
        let state = self.state.read().await;
        Ok(state
            .cycles_by_start()
            .into_iter()
            .map(|cycle| {
                let mut tally = MilestoneTally::default();
                for m in state.milestones.iter().filter(|m| m.cycle_id == cycle.id) {
                    tally.record(m.due_date, &m.status, today, upcoming_days);
                }
                CycleHealth {
                    cycle: cycle.clone(),
                    milestones: tally,
                }
            })
            .collect())
    }
}
