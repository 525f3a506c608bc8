use chrono::{Duration, Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::models::{Patient, TIMESTAMP_FORMAT};

const PATIENT_COLUMNS: &str = "id, name, age, diagnosis, email, created_at";

/// Insert or replace a patient record.
///
/// "Most recent wins" for name/age/diagnosis/email; `created_at` is set on
/// first insertion and never overwritten. Email is stored lowercased.
pub fn upsert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, age, diagnosis, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             age = excluded.age,
             diagnosis = excluded.diagnosis,
             email = excluded.email",
        params![
            patient.id,
            patient.name,
            patient.age,
            patient.diagnosis,
            patient.email.trim().to_lowercase(),
            patient.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// All patients, reverse-chronological by creation (rowid tiebreak for a
/// stable listing order).
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map([], map_patient_row)?;
    collect_patients(rows)
}

/// Case-insensitive substring search over name, id, and diagnosis.
pub fn search_patients(conn: &Connection, query: &str) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = format!("%{}%", query.trim());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE name LIKE ?1 OR id LIKE ?1 OR diagnosis LIKE ?1
         ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![pattern], map_patient_row)?;
    collect_patients(rows)
}

pub fn get_patient(conn: &Connection, id: &str) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            map_patient_row,
        )
        .optional()?;
    patient.map(finish_patient_row).transpose()
}

/// Delete a patient. Returns false if no such record existed.
pub fn delete_patient(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Outcome of a bulk ingestion. Per-row failures do not abort siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkInsertOutcome {
    pub inserted: u32,
    pub rejected: u32,
    pub errors: Vec<String>,
}

/// Upsert a batch of records, validating each at the boundary. Rows with
/// missing fields or a malformed email are rejected and reported; the rest
/// are stored.
pub fn insert_patients(conn: &Connection, patients: &[Patient]) -> Result<BulkInsertOutcome, DatabaseError> {
    let mut outcome = BulkInsertOutcome {
        inserted: 0,
        rejected: 0,
        errors: Vec::new(),
    };

    for (index, patient) in patients.iter().enumerate() {
        if let Err(reason) = patient.validate() {
            outcome.rejected += 1;
            outcome.errors.push(format!("Row {}: {reason}", index + 1));
            continue;
        }
        match upsert_patient(conn, patient) {
            Ok(()) => outcome.inserted += 1,
            Err(e) => {
                outcome.rejected += 1;
                outcome.errors.push(format!("Row {}: {e}", index + 1));
            }
        }
    }

    tracing::debug!(
        inserted = outcome.inserted,
        rejected = outcome.rejected,
        "Bulk insert finished"
    );
    Ok(outcome)
}

/// Dashboard counters over the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_patients: u32,
    pub average_age: f64,
    pub added_last_week: u32,
    /// Diagnosis and record count, most frequent first (top 10).
    pub top_diagnoses: Vec<(String, u32)>,
}

pub fn patient_stats(conn: &Connection) -> Result<StoreStats, DatabaseError> {
    let (total, average_age): (u32, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(AVG(age), 0.0) FROM patients",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let week_ago = (Local::now().naive_local() - Duration::days(7))
        .format(TIMESTAMP_FORMAT)
        .to_string();
    let added_last_week: u32 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE created_at >= ?1",
        params![week_ago],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT diagnosis, COUNT(*) as n FROM patients
         GROUP BY diagnosis ORDER BY n DESC, diagnosis ASC LIMIT 10",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;
    let top_diagnoses = rows.collect::<Result<Vec<_>, _>>()?;

    Ok(StoreStats {
        total_patients: total,
        average_age,
        added_last_week,
        top_diagnoses,
    })
}

type PatientRow = (String, String, u32, String, String, String);

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn finish_patient_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    let (id, name, age, diagnosis, email, created_at) = row;
    let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("created_at for {id}: {e}")))?;
    Ok(Patient {
        id,
        name,
        age,
        diagnosis,
        email,
        created_at,
    })
}

fn collect_patients(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<PatientRow>>,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut patients = Vec::new();
    for row in rows {
        patients.push(finish_patient_row(row?)?);
    }
    Ok(patients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn patient(id: &str, name: &str) -> Patient {
        Patient::new(id, name, 34, "Hypertension", &format!("{}@example.com", id.to_lowercase()))
    }

    fn patient_at(id: &str, name: &str, created_at: &str) -> Patient {
        let mut p = patient(id, name);
        p.created_at = NaiveDateTime::parse_from_str(created_at, TIMESTAMP_FORMAT).unwrap();
        p
    }

    #[test]
    fn upsert_then_get_roundtrip() {
        let conn = open_memory_database().unwrap();
        let p = patient_at("P1", "Jane Doe", "2026-01-15 09:30:00");
        upsert_patient(&conn, &p).unwrap();

        let stored = get_patient(&conn, "P1").unwrap().unwrap();
        assert_eq!(stored, p);
    }

    #[test]
    fn upsert_preserves_created_at_and_takes_latest_fields() {
        let conn = open_memory_database().unwrap();
        let first = patient_at("P1", "Jane Doe", "2026-01-15 09:30:00");
        upsert_patient(&conn, &first).unwrap();

        let mut second = patient_at("P1", "Jane A. Doe", "2026-02-20 12:00:00");
        second.diagnosis = "Hypertension stage 2".to_string();
        upsert_patient(&conn, &second).unwrap();

        let all = list_patients(&conn).unwrap();
        assert_eq!(all.len(), 1, "re-upsert must not duplicate the record");

        let stored = &all[0];
        assert_eq!(stored.name, "Jane A. Doe");
        assert_eq!(stored.diagnosis, "Hypertension stage 2");
        assert_eq!(stored.created_at, first.created_at, "created_at survives upsert");
    }

    #[test]
    fn list_is_reverse_chronological() {
        let conn = open_memory_database().unwrap();
        upsert_patient(&conn, &patient_at("P1", "Oldest", "2026-01-01 08:00:00")).unwrap();
        upsert_patient(&conn, &patient_at("P2", "Middle", "2026-01-02 08:00:00")).unwrap();
        upsert_patient(&conn, &patient_at("P3", "Newest", "2026-01-03 08:00:00")).unwrap();

        let names: Vec<_> = list_patients(&conn).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn search_matches_name_id_and_diagnosis_case_insensitively() {
        let conn = open_memory_database().unwrap();
        upsert_patient(&conn, &patient_at("P1", "Jane Doe", "2026-01-01 08:00:00")).unwrap();
        let mut asthma = patient_at("Q7", "Sam Roe", "2026-01-02 08:00:00");
        asthma.diagnosis = "Asthma".to_string();
        upsert_patient(&conn, &asthma).unwrap();

        assert_eq!(search_patients(&conn, "jane").unwrap().len(), 1);
        assert_eq!(search_patients(&conn, "q7").unwrap().len(), 1);
        assert_eq!(search_patients(&conn, "ASTHMA").unwrap().len(), 1);
        assert_eq!(search_patients(&conn, "nothing").unwrap().len(), 0);
    }

    #[test]
    fn delete_reports_whether_record_existed() {
        let conn = open_memory_database().unwrap();
        upsert_patient(&conn, &patient("P1", "Jane Doe")).unwrap();

        assert!(delete_patient(&conn, "P1").unwrap());
        assert!(!delete_patient(&conn, "P1").unwrap());
        assert!(get_patient(&conn, "P1").unwrap().is_none());
    }

    #[test]
    fn bulk_insert_rejects_invalid_rows_and_keeps_rest() {
        let conn = open_memory_database().unwrap();
        let mut bad_email = patient("P2", "Bad Email");
        bad_email.email = "not-an-email".to_string();
        let mut zero_age = patient("P3", "Zero Age");
        zero_age.age = 0;

        let outcome = insert_patients(
            &conn,
            &[patient("P1", "Jane Doe"), bad_email, zero_age],
        )
        .unwrap();

        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.rejected, 2);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("Row 2:"));
        assert!(outcome.errors[1].starts_with("Row 3:"));
        assert_eq!(list_patients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn stats_over_seeded_store() {
        let conn = open_memory_database().unwrap();
        let mut a = patient_at("P1", "A", "2026-01-01 08:00:00");
        a.age = 30;
        let mut b = patient("P2", "B"); // created now, counts as last-week
        b.age = 50;
        b.diagnosis = "Asthma".to_string();
        upsert_patient(&conn, &a).unwrap();
        upsert_patient(&conn, &b).unwrap();

        let stats = patient_stats(&conn).unwrap();
        assert_eq!(stats.total_patients, 2);
        assert!((stats.average_age - 40.0).abs() < f64::EPSILON);
        assert_eq!(stats.added_last_week, 1);
        assert_eq!(stats.top_diagnoses.len(), 2);
    }

    #[test]
    fn stats_on_empty_store() {
        let conn = open_memory_database().unwrap();
        let stats = patient_stats(&conn).unwrap();
        assert_eq!(stats.total_patients, 0);
        assert_eq!(stats.average_age, 0.0);
        assert!(stats.top_diagnoses.is_empty());
    }
}
