//! PostgreSQL store contract tests.
//!
//! These need a reachable server in `DATABASE_URL`. Each test works in its own
//! throwaway schema, dropped at the end.
//!
//! Run with: cargo test --test postgres_integration -- --ignored

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate, Utc};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use cycle_coordinator::adapters::PostgresCycleStore;
use cycle_coordinator::config::DatabaseConfig;
use cycle_coordinator::domain::cycle::{NewCycle, NewMilestone, NewNote};
use cycle_coordinator::domain::foundation::{CycleId, ErrorCode, MilestoneId, Status};
use cycle_coordinator::ports::CycleStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

static SCHEMA_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TestDb {
    pool: PgPool,
    schema: String,
    store: PostgresCycleStore,
}

impl TestDb {
    async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let config = DatabaseConfig {
            url: Some(SecretString::new(url)),
            ..Default::default()
        };
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(config.connect_options().expect("valid DATABASE_URL"))
            .await
            .expect("connect to PostgreSQL");

        let schema = format!(
            "cycle_coordinator_test_{}_{}",
            std::process::id(),
            SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst)
        );
        let store = PostgresCycleStore::new(pool.clone(), schema.clone());
        store.initialize().await.expect("initialize schema");

        Self { pool, schema, store }
    }

    async fn today(&self) -> NaiveDate {
        sqlx::query_scalar("SELECT CURRENT_DATE")
            .fetch_one(&self.pool)
            .await
            .expect("read CURRENT_DATE")
    }

    async fn teardown(self) {
        sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
            .execute(&self.pool)
            .await
            .expect("drop test schema");
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn add_cycle(store: &PostgresCycleStore, name: &str, start: NaiveDate, end: NaiveDate) -> CycleId {
    store
        .add_cycle(&NewCycle::new(name, start, end, "Ops").unwrap())
        .await
        .unwrap()
}

// =============================================================================
// Schema and seeding
// =============================================================================

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn initialize_is_idempotent() {
    let db = TestDb::new().await;

    db.store.initialize().await.unwrap();
    db.store.initialize().await.unwrap();
    assert!(db.store.list_cycles().await.unwrap().is_empty());

    db.teardown().await;
}

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn seed_only_fills_an_empty_store() {
    let db = TestDb::new().await;

    assert_eq!(db.store.seed().await.unwrap(), 2);
    assert_eq!(db.store.seed().await.unwrap(), 0);

    let cycles = db.store.list_cycles().await.unwrap();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].cycle.name, "Spring 2026 Scholarship Cycle");
    assert_eq!(cycles[0].milestone_count, 2);
    assert_eq!(cycles[0].note_count, 2);
    assert_eq!(cycles[1].cycle.name, "Fall 2026 Scholarship Cycle");
    assert_eq!(cycles[1].milestone_count, 1);
    assert_eq!(cycles[1].note_count, 1);

    db.teardown().await;
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn add_cycle_defaults_to_planned() {
    let db = TestDb::new().await;

    let id = add_cycle(&db.store, "Winter", date(2027, 1, 10), date(2027, 4, 15)).await;

    let summary = db.store.get_cycle(id).await.unwrap().unwrap();
    assert_eq!(summary.cycle.status, Status::planned());
    assert_eq!(summary.milestone_count, 0);
    assert_eq!(summary.note_count, 0);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn updates_report_affected_rows() {
    let db = TestDb::new().await;
    let id = add_cycle(&db.store, "Winter", date(2027, 1, 10), date(2027, 4, 15)).await;
    let complete = Status::new("complete").unwrap();

    assert_eq!(db.store.update_status(id, &complete).await.unwrap(), 1);
    assert_eq!(db.store.update_status(CycleId::new(9_999), &complete).await.unwrap(), 0);
    assert_eq!(
        db.store
            .update_milestone_status(MilestoneId::new(9_999), &complete)
            .await
            .unwrap(),
        0
    );

    let summary = db.store.get_cycle(id).await.unwrap().unwrap();
    assert!(summary.cycle.status.is_complete());

    db.teardown().await;
}

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn children_of_missing_cycles_are_not_found() {
    let db = TestDb::new().await;
    let missing = CycleId::new(424_242);

    let milestone = NewMilestone::new(missing, "Kickoff", date(2027, 1, 1), "Ops").unwrap();
    let err = db.store.add_milestone(&milestone).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CycleNotFound);

    let note = NewNote::new(missing, "Orphan").unwrap();
    let err = db.store.add_note(&note).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CycleNotFound);

    db.teardown().await;
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn cycle_detail_orders_children() {
    let db = TestDb::new().await;
    let id = add_cycle(&db.store, "Winter", date(2027, 1, 10), date(2027, 4, 15)).await;
    for (name, due) in [("Second", date(2027, 3, 1)), ("First", date(2027, 2, 1))] {
        db.store
            .add_milestone(&NewMilestone::new(id, name, due, "Ops").unwrap())
            .await
            .unwrap();
    }
    db.store.add_note(&NewNote::new(id, "older").unwrap()).await.unwrap();
    db.store.add_note(&NewNote::new(id, "newer").unwrap()).await.unwrap();

    let milestones = db.store.list_milestones(id).await.unwrap();
    let names: Vec<&str> = milestones.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);

    let notes = db.store.list_notes(id).await.unwrap();
    assert_eq!(notes[0].body, "newer");
    assert_eq!(notes[1].body, "older");

    assert!(db.store.get_cycle(CycleId::new(9_999)).await.unwrap().is_none());

    db.teardown().await;
}

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn date_windows_follow_current_date() {
    let db = TestDb::new().await;
    let today = db.today().await;
    let id = add_cycle(&db.store, "Window", today - Duration::days(30), today + Duration::days(30)).await;

    let plan = [
        ("due today", today),
        ("due in five", today + Duration::days(5)),
        ("late by four", today - Duration::days(4)),
        ("late and done", today - Duration::days(2)),
    ];
    for (name, due) in plan {
        db.store
            .add_milestone(&NewMilestone::new(id, name, due, "Ops").unwrap())
            .await
            .unwrap();
    }
    let done = db.store.list_milestones(id).await.unwrap();
    let finished = done.iter().find(|m| m.name == "late and done").unwrap();
    db.store
        .update_milestone_status(finished.id, &Status::new("complete").unwrap())
        .await
        .unwrap();

    let upcoming = db.store.list_upcoming_milestones(10).await.unwrap();
    let names: Vec<&str> = upcoming.iter().map(|u| u.milestone.name.as_str()).collect();
    assert_eq!(names, ["due today", "due in five"]);
    assert_eq!(upcoming[1].days_until_due, 5);
    assert_eq!(upcoming[1].cycle_name, "Window");

    let narrow = db.store.list_upcoming_milestones(3).await.unwrap();
    assert_eq!(narrow.len(), 1);

    let overdue = db.store.list_overdue_milestones(7).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].milestone.name, "late by four");
    assert_eq!(overdue[0].days_overdue, 4);

    let health = db.store.list_cycle_health(7).await.unwrap();
    assert_eq!(health.len(), 1);
    let tally = health[0].milestones;
    assert_eq!(tally.total, 4);
    assert_eq!(tally.complete, 1);
    assert_eq!(tally.planned, 3);
    assert_eq!(tally.overdue, 1);
    assert_eq!(tally.upcoming, 2);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "Requires live PostgreSQL instance"]
async fn sessions_use_the_utc_date() {
    let db = TestDb::new().await;

    let zone: String = sqlx::query_scalar("SELECT current_setting('TimeZone')")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(zone, "UTC");

    let before = Utc::now().date_naive();
    let today = db.today().await;
    let after = Utc::now().date_naive();
    assert!(today == before || today == after);

    db.teardown().await;
}
