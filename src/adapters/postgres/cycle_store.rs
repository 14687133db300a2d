//! PostgreSQL implementation of CycleStore.
//!
//! Each operation is a single statement against the configured schema;
//! counts come from outer joins with `GROUP BY`, date windows from
//! `CURRENT_DATE` and interval arithmetic. Seeding runs in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use super::schema::create_statements;
use crate::config::{DatabaseConfig, ValidationError};
use crate::domain::cycle::seed::{seed_date, SEED_CYCLES};
use crate::domain::cycle::{
    Cycle, CycleHealth, CycleSummary, Milestone, MilestoneTally, NewCycle, NewMilestone,
    NewNote, Note, OverdueMilestone, UpcomingMilestone, window_days,
};
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, MilestoneId, NoteId, Status,
};
use crate::ports::CycleStore;

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL implementation of the CycleStore port.
///
/// Uses sqlx for database operations with connection pooling.
#[derive(Clone)]
pub struct PostgresCycleStore {
    pool: PgPool,
    schema: String,
}

impl PostgresCycleStore {
    /// Creates a new PostgresCycleStore over an existing pool.
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    /// Opens a pool from validated configuration.
    ///
    /// Sessions run in UTC, so `CURRENT_DATE` agrees with the in-memory
    /// store's notion of today.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the configuration has no usable URL
    /// - `DatabaseError` if the server cannot be reached
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let invalid = |e: ValidationError| {
            DomainError::new(ErrorCode::InternalError, e.to_string())
        };
        let options = config.connect_options().map_err(invalid)?;
        let target = config.target().map_err(invalid)?;

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|e| db_error(&format!("Failed to connect to {}", target), e))?;

        debug!(%target, schema = %config.schema, "Connected to PostgreSQL");
        Ok(Self::new(pool, config.schema.clone()))
    }
}

/// Database row of a cycle with its derived counts.
#[derive(Debug, sqlx::FromRow)]
struct CycleSummaryRow {
    id: i64,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    owner: String,
    created_at: DateTime<Utc>,
    milestone_count: i64,
    note_count: i64,
}

impl From<CycleSummaryRow> for CycleSummary {
    fn from(row: CycleSummaryRow) -> Self {
        CycleSummary {
            cycle: Cycle {
                id: CycleId::new(row.id),
                name: row.name,
                start_date: row.start_date,
                end_date: row.end_date,
                status: Status::from_stored(row.status),
                owner: row.owner,
                created_at: row.created_at,
            },
            milestone_count: row.milestone_count,
            note_count: row.note_count,
        }
    }
}

/// Database row of a cycle with its milestone tally.
#[derive(Debug, sqlx::FromRow)]
struct CycleHealthRow {
    id: i64,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    owner: String,
    created_at: DateTime<Utc>,
    milestone_total: i64,
    milestone_complete: i64,
    milestone_in_progress: i64,
    milestone_planned: i64,
    milestone_overdue: i64,
    milestone_upcoming: i64,
}

impl From<CycleHealthRow> for CycleHealth {
    fn from(row: CycleHealthRow) -> Self {
        CycleHealth {
            cycle: Cycle {
                id: CycleId::new(row.id),
                name: row.name,
                start_date: row.start_date,
                end_date: row.end_date,
                status: Status::from_stored(row.status),
                owner: row.owner,
                created_at: row.created_at,
            },
            milestones: MilestoneTally {
                total: row.milestone_total,
                complete: row.milestone_complete,
                in_progress: row.milestone_in_progress,
                planned: row.milestone_planned,
                overdue: row.milestone_overdue,
                upcoming: row.milestone_upcoming,
            },
        }
    }
}

/// Database row of a milestone.
#[derive(Debug, sqlx::FromRow)]
struct MilestoneRow {
    id: i64,
    cycle_id: i64,
    name: String,
    due_date: NaiveDate,
    owner: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<MilestoneRow> for Milestone {
    fn from(row: MilestoneRow) -> Self {
        Milestone {
            id: MilestoneId::new(row.id),
            cycle_id: CycleId::new(row.cycle_id),
            name: row.name,
            due_date: row.due_date,
            owner: row.owner,
            status: Status::from_stored(row.status),
            created_at: row.created_at,
        }
    }
}

/// Database row of a milestone annotated with its cycle and a day offset.
#[derive(Debug, sqlx::FromRow)]
struct DatedMilestoneRow {
    id: i64,
    cycle_id: i64,
    name: String,
    due_date: NaiveDate,
    owner: String,
    status: String,
    created_at: DateTime<Utc>,
    cycle_name: String,
    day_offset: i32,
}

impl DatedMilestoneRow {
    fn split(self) -> (Milestone, String, i64) {
        let offset = i64::from(self.day_offset);
        let cycle_name = self.cycle_name;
        let milestone = Milestone {
            id: MilestoneId::new(self.id),
            cycle_id: CycleId::new(self.cycle_id),
            name: self.name,
            due_date: self.due_date,
            owner: self.owner,
            status: Status::from_stored(self.status),
            created_at: self.created_at,
        };
        (milestone, cycle_name, offset)
    }
}

/// Database row of a note.
#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: i64,
    cycle_id: i64,
    note: String,
    created_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: NoteId::new(row.id),
            cycle_id: CycleId::new(row.cycle_id),
            body: row.note,
            created_at: row.created_at,
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn missing_id(entity: &str) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("Failed to create {}.", entity))
}

/// Maps an insert failure, turning a dangling `cycle_id` into `CycleNotFound`.
fn child_insert_error(entity: &str, cycle_id: CycleId, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", cycle_id),
            );
        }
    }
    db_error(&format!("Failed to insert {}", entity), e)
}

fn invalid_seed_date() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Seed data contains an invalid date")
}

fn days_param(days: u32) -> i32 {
    i32::try_from(window_days(days)).unwrap_or(i32::MAX)
}

#[async_trait]
impl CycleStore for PostgresCycleStore {
    async fn initialize(&self) -> Result<(), DomainError> {
        for statement in create_statements(&self.schema) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to create schema", e))?;
        }
        info!(schema = %self.schema, "Schema ready");
        Ok(())
    }

    async fn seed(&self) -> Result<u64, DomainError> {
        self.initialize().await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            db_error("Failed to begin transaction", e)
        })?;

        let (existing,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {}.cycles", self.schema))
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to count cycles", e))?;
        if existing > 0 {
            debug!(existing, "Store already populated, skipping seed");
            return Ok(0);
        }

        let insert_cycle = format!(
            r#"
            INSERT INTO {}.cycles (name, start_date, end_date, status, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
            self.schema
        );
        let insert_milestone = format!(
            r#"
            INSERT INTO {}.milestones (cycle_id, name, due_date, owner, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            self.schema
        );
        let insert_note = format!(
            "INSERT INTO {}.notes (cycle_id, note) VALUES ($1, $2)",
            self.schema
        );

        for seed in SEED_CYCLES {
            let (cycle_id,): (i64,) = sqlx::query_as(&insert_cycle)
                .bind(seed.name)
                .bind(seed_date(seed.start_date).ok_or_else(invalid_seed_date)?)
                .bind(seed_date(seed.end_date).ok_or_else(invalid_seed_date)?)
                .bind(seed.status)
                .bind(seed.owner)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to insert seed cycle", e))?;

            for milestone in seed.milestones {
                sqlx::query(&insert_milestone)
                    .bind(cycle_id)
                    .bind(milestone.name)
                    .bind(seed_date(milestone.due_date).ok_or_else(invalid_seed_date)?)
                    .bind(milestone.owner)
                    .bind(milestone.status)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to insert seed milestone", e))?;
            }

            for note in seed.notes {
                sqlx::query(&insert_note)
                    .bind(cycle_id)
                    .bind(*note)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to insert seed note", e))?;
            }
        }

        tx.commit().await.map_err(|e| {
            db_error("Failed to commit transaction", e)
        })?;

        info!(cycles = SEED_CYCLES.len(), "Seeded demo data");
        Ok(SEED_CYCLES.len() as u64)
    }

    async fn add_cycle(&self, cycle: &NewCycle) -> Result<CycleId, DomainError> {
        let row: Option<(i64,)> = sqlx::query_as(&format!(
            r#"
            INSERT INTO {}.cycles (name, start_date, end_date, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
            self.schema
        ))
        .bind(cycle.name())
        .bind(cycle.start_date())
        .bind(cycle.end_date())
        .bind(cycle.owner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert cycle", e))?;

        let (id,) = row.ok_or_else(|| missing_id("cycle"))?;
        debug!(id, "Inserted cycle");
        Ok(CycleId::new(id))
    }

    async fn add_milestone(&self, milestone: &NewMilestone) -> Result<MilestoneId, DomainError> {
        let row: Option<(i64,)> = sqlx::query_as(&format!(
            r#"
            INSERT INTO {}.milestones (cycle_id, name, due_date, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
            self.schema
        ))
        .bind(milestone.cycle_id().value())
        .bind(milestone.name())
        .bind(milestone.due_date())
        .bind(milestone.owner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| child_insert_error("milestone", milestone.cycle_id(), e))?;

        let (id,) = row.ok_or_else(|| missing_id("milestone"))?;
        debug!(id, cycle_id = %milestone.cycle_id(), "Inserted milestone");
        Ok(MilestoneId::new(id))
    }

    async fn add_note(&self, note: &NewNote) -> Result<NoteId, DomainError> {
        let row: Option<(i64,)> = sqlx::query_as(&format!(
            r#"
            INSERT INTO {}.notes (cycle_id, note)
            VALUES ($1, $2)
            RETURNING id
            "#,
            self.schema
        ))
        .bind(note.cycle_id().value())
        .bind(note.body())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| child_insert_error("note", note.cycle_id(), e))?;

        let (id,) = row.ok_or_else(|| missing_id("note"))?;
        debug!(id, cycle_id = %note.cycle_id(), "Inserted note");
        Ok(NoteId::new(id))
    }

    async fn update_status(&self, id: CycleId, status: &Status) -> Result<u64, DomainError> {
        let result = sqlx::query(&format!(
            "UPDATE {}.cycles SET status = $2 WHERE id = $1",
            self.schema
        ))
        .bind(id.value())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update cycle status", e))?;

        Ok(result.rows_affected())
    }

    async fn update_milestone_status(
        &self,
        id: MilestoneId,
        status: &Status,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(&format!(
            "UPDATE {}.milestones SET status = $2 WHERE id = $1",
            self.schema
        ))
        .bind(id.value())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update milestone status", e))?;

        Ok(result.rows_affected())
    }

    async fn list_cycles(&self) -> Result<Vec<CycleSummary>, DomainError> {
        let rows: Vec<CycleSummaryRow> = sqlx::query_as(&format!(
            r#"
            SELECT c.id, c.name, c.start_date, c.end_date, c.status, c.owner, c.created_at,
                   COUNT(DISTINCT m.id) AS milestone_count,
                   COUNT(DISTINCT n.id) AS note_count
            FROM {s}.cycles c
            LEFT JOIN {s}.milestones m ON m.cycle_id = c.id
            LEFT JOIN {s}.notes n ON n.cycle_id = c.id
            GROUP BY c.id
            ORDER BY c.start_date, c.id
            "#,
            s = self.schema
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list cycles", e))?;

        Ok(rows.into_iter().map(CycleSummary::from).collect())
    }

    async fn get_cycle(&self, id: CycleId) -> Result<Option<CycleSummary>, DomainError> {
        let row: Option<CycleSummaryRow> = sqlx::query_as(&format!(
            r#"
            SELECT c.id, c.name, c.start_date, c.end_date, c.status, c.owner, c.created_at,
                   COUNT(DISTINCT m.id) AS milestone_count,
                   COUNT(DISTINCT n.id) AS note_count
            FROM {s}.cycles c
            LEFT JOIN {s}.milestones m ON m.cycle_id = c.id
            LEFT JOIN {s}.notes n ON n.cycle_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
            s = self.schema
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch cycle", e))?;

        Ok(row.map(CycleSummary::from))
    }

    async fn list_milestones(&self, cycle_id: CycleId) -> Result<Vec<Milestone>, DomainError> {
        let rows: Vec<MilestoneRow> = sqlx::query_as(&format!(
            r#"
            SELECT id, cycle_id, name, due_date, owner, status, created_at
            FROM {}.milestones
            WHERE cycle_id = $1
            ORDER BY due_date, id
            "#,
            self.schema
        ))
        .bind(cycle_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list milestones", e))?;

        Ok(rows.into_iter().map(Milestone::from).collect())
    }

    async fn list_notes(&self, cycle_id: CycleId) -> Result<Vec<Note>, DomainError> {
        let rows: Vec<NoteRow> = sqlx::query_as(&format!(
            r#"
            SELECT id, cycle_id, note, created_at
            FROM {}.notes
            WHERE cycle_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            self.schema
        ))
        .bind(cycle_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list notes", e))?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn list_upcoming_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<UpcomingMilestone>, DomainError> {
        let rows: Vec<DatedMilestoneRow> = sqlx::query_as(&format!(
            r#"
            SELECT m.id, m.cycle_id, m.name, m.due_date, m.owner, m.status, m.created_at,
                   c.name AS cycle_name,
                   (m.due_date - CURRENT_DATE) AS day_offset
            FROM {s}.milestones m
            JOIN {s}.cycles c ON c.id = m.cycle_id
            WHERE m.due_date >= CURRENT_DATE
              AND m.due_date <= CURRENT_DATE + make_interval(days => $1)
            ORDER BY m.due_date, m.id
            "#,
            s = self.schema
        ))
        .bind(days_param(days))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list upcoming milestones", e))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (milestone, cycle_name, days_until_due) = row.split();
                UpcomingMilestone {
                    milestone,
                    cycle_name,
                    days_until_due,
                }
            })
            .collect())
    }

    async fn list_overdue_milestones(
        &self,
        days: u32,
    ) -> Result<Vec<OverdueMilestone>, DomainError> {
        let rows: Vec<DatedMilestoneRow> = sqlx::query_as(&format!(
            r#"
            SELECT m.id, m.cycle_id, m.name, m.due_date, m.owner, m.status, m.created_at,
                   c.name AS cycle_name,
                   (CURRENT_DATE - m.due_date) AS day_offset
            FROM {s}.milestones m
            JOIN {s}.cycles c ON c.id = m.cycle_id
            WHERE m.due_date < CURRENT_DATE
              AND m.due_date >= CURRENT_DATE - make_interval(days => $1)
              AND m.status <> $2
            ORDER BY m.due_date, m.id
            "#,
            s = self.schema
        ))
        .bind(days_param(days))
        .bind(Status::COMPLETE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list overdue milestones", e))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (milestone, cycle_name, days_overdue) = row.split();
                OverdueMilestone {
                    milestone,
                    cycle_name,
                    days_overdue,
                }
            })
            .collect())
    }

    async fn list_cycle_health(
        &self,
        upcoming_days: u32,
    ) -> Result<Vec<CycleHealth>, DomainError> {
        let rows: Vec<CycleHealthRow> = sqlx::query_as(&format!(
            r#"
            SELECT c.id, c.name, c.start_date, c.end_date, c.status, c.owner, c.created_at,
                   COUNT(m.id) AS milestone_total,
                   COUNT(m.id) FILTER (WHERE m.status = $2) AS milestone_complete,
                   COUNT(m.id) FILTER (WHERE m.status = $3) AS milestone_in_progress,
                   COUNT(m.id) FILTER (WHERE m.status <> $2 AND m.status <> $3)
                       AS milestone_planned,
                   COUNT(m.id) FILTER (WHERE m.due_date < CURRENT_DATE AND m.status <> $2)
                       AS milestone_overdue,
                   COUNT(m.id) FILTER (
                       WHERE m.due_date >= CURRENT_DATE
                         AND m.due_date <= CURRENT_DATE + make_interval(days => $1)
                   ) AS milestone_upcoming
            FROM {s}.cycles c
            LEFT JOIN {s}.milestones m ON m.cycle_id = c.id
            GROUP BY c.id
            ORDER BY c.start_date, c.id
            "#,
            s = self.schema
        ))
        .bind(days_param(upcoming_days))
        .bind(Status::COMPLETE)
        .bind(Status::IN_PROGRESS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute cycle health", e))?;

        Ok(rows.into_iter().map(CycleHealth::from).collect())
    }
}
