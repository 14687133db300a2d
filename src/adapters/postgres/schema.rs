//! DDL for the cycle coordinator schema.
//!
//! Every statement is `IF NOT EXISTS`, so running them again is a no-op.
//! The schema name is interpolated; it is validated as a plain lowercase
//! identifier when configuration loads.

/// Statements creating the schema, tables and lookup indexes, in order.
pub fn create_statements(schema: &str) -> Vec<String> {
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {schema}"),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {schema}.cycles (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                status TEXT NOT NULL DEFAULT 'planned',
                owner TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {schema}.milestones (
                id BIGSERIAL PRIMARY KEY,
                cycle_id BIGINT NOT NULL REFERENCES {schema}.cycles(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                due_date DATE NOT NULL,
                owner TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'planned',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {schema}.notes (
                id BIGSERIAL PRIMARY KEY,
                cycle_id BIGINT NOT NULL REFERENCES {schema}.cycles(id) ON DELETE CASCADE,
                note TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS milestones_cycle_due_idx ON {schema}.milestones (cycle_id, due_date)"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS notes_cycle_created_idx ON {schema}.notes (cycle_id, created_at DESC)"
        ),
    ]
}
