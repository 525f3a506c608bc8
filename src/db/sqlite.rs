use std::path::Path;

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

use super::DatabaseError;
use crate::models::TIMESTAMP_FORMAT;

/// v1: the one flat table of patient records, keyed by the external
/// patient id. `created_at` is set on first insertion and preserved
/// across upserts.
const MIGRATION_V1: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS patients (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    age        INTEGER NOT NULL CHECK (age > 0),
    diagnosis  TEXT NOT NULL,
    email      TEXT NOT NULL,
    created_at TEXT NOT NULL
);

INSERT INTO schema_version (version) VALUES (1);
";

/// Open a SQLite connection to the given path, run migrations, and repair
/// any malformed `created_at` values left by earlier imports.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    repair_timestamps(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(1, MIGRATION_V1)];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

/// Rewrite any `created_at` value the canonical format cannot parse to the
/// current time. Data-quality repair for rows imported before the format
/// was enforced; original insertion order is not reconstructed.
pub fn repair_timestamps(conn: &Connection) -> Result<u32, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, created_at FROM patients")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut repaired = 0u32;
    let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();

    for row in rows {
        let (id, created_at) = row?;
        if NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT).is_err() {
            tracing::warn!(
                patient_id = %id,
                value = %created_at,
                "Unparsable created_at, rewriting to now"
            );
            conn.execute(
                "UPDATE patients SET created_at = ?1 WHERE id = ?2",
                rusqlite::params![now, id],
            )?;
            repaired += 1;
        }
    }

    if repaired > 0 {
        tracing::info!(count = repaired, "Repaired malformed timestamps");
    }
    Ok(repaired)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_tables() {
        let conn = open_memory_database().unwrap();
        // patients + schema_version
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 2, "Expected 2 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Run migrations again — should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn repair_rewrites_malformed_timestamp() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO patients (id, name, age, diagnosis, email, created_at)
             VALUES ('P1', 'Jane Doe', 34, 'Hypertension', 'jane@example.com', 'last tuesday')",
            [],
        )
        .unwrap();

        let repaired = repair_timestamps(&conn).unwrap();
        assert_eq!(repaired, 1);

        let stored: String = conn
            .query_row("SELECT created_at FROM patients WHERE id = 'P1'", [], |row| row.get(0))
            .unwrap();
        assert!(NaiveDateTime::parse_from_str(&stored, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn repair_leaves_valid_timestamps_alone() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO patients (id, name, age, diagnosis, email, created_at)
             VALUES ('P1', 'Jane Doe', 34, 'Hypertension', 'jane@example.com', '2026-01-15 09:30:00')",
            [],
        )
        .unwrap();

        let repaired = repair_timestamps(&conn).unwrap();
        assert_eq!(repaired, 0);

        let stored: String = conn
            .query_row("SELECT created_at FROM patients WHERE id = 'P1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "2026-01-15 09:30:00");
    }

    #[test]
    fn open_database_on_disk_runs_repair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("careport.db");
        {
            let conn = open_database(&path).unwrap();
            conn.execute(
                "INSERT INTO patients (id, name, age, diagnosis, email, created_at)
                 VALUES ('P9', 'Sam Roe', 52, 'Asthma', 'sam@example.com', 'garbage')",
                [],
            )
            .unwrap();
        }
        let conn = open_database(&path).unwrap();
        let stored: String = conn
            .query_row("SELECT created_at FROM patients WHERE id = 'P9'", [], |row| row.get(0))
            .unwrap();
        assert!(NaiveDateTime::parse_from_str(&stored, TIMESTAMP_FORMAT).is_ok());
    }
}
