use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::DoseRecord;

fn dose_from_row(row: &rusqlite::Row<'_>) -> Result<DoseRecord, rusqlite::Error> {
    Ok(DoseRecord {
        medicine_id: row.get(0)?,
        record_date: row.get(1)?,
        taken: row.get::<_, i64>(2)? != 0,
        taken_at: row.get(3)?,
    })
}

pub fn get_dose_record(
    conn: &Connection,
    medicine_id: i64,
    date: NaiveDate,
) -> Result<Option<DoseRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medicine_id, record_date, taken, taken_at
         FROM dose_records WHERE medicine_id = ?1 AND record_date = ?2",
    )?;
    let mut rows = stmt.query_map(params![medicine_id, date], dose_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Fetch the record for (medicine, date), creating it as not-taken if absent.
/// Never errors for a medicine id that exists in the medicines table.
pub fn get_or_create_dose_record(
    conn: &Connection,
    medicine_id: i64,
    date: NaiveDate,
) -> Result<DoseRecord, DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO dose_records (medicine_id, record_date, taken, taken_at)
         VALUES (?1, ?2, 0, NULL)",
        params![medicine_id, date],
    )?;
    get_dose_record(conn, medicine_id, date)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!(
            "dose record ({medicine_id}, {date}) not readable after upsert"
        ))
    })
}

/// Upsert the taken state, committing before returning.
///
/// `taken_at` is stamped on the false→true transition and cleared on
/// true→false; re-applying the current state is a no-op that keeps the
/// original timestamp.
pub fn set_taken(
    conn: &Connection,
    medicine_id: i64,
    date: NaiveDate,
    taken: bool,
    now: DateTime<Utc>,
) -> Result<DoseRecord, DatabaseError> {
    if let Some(existing) = get_dose_record(conn, medicine_id, date)? {
        if existing.taken == taken {
            return Ok(existing);
        }
    }

    let taken_at: Option<DateTime<Utc>> = if taken { Some(now) } else { None };
    conn.execute(
        "INSERT INTO dose_records (medicine_id, record_date, taken, taken_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (medicine_id, record_date)
         DO UPDATE SET taken = excluded.taken, taken_at = excluded.taken_at",
        params![medicine_id, date, taken as i64, taken_at],
    )?;
    get_dose_record(conn, medicine_id, date)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!(
            "dose record ({medicine_id}, {date}) not readable after upsert"
        ))
    })
}

/// All dose records with record_date in [start, end] (inclusive).
pub fn list_dose_records_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DoseRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medicine_id, record_date, taken, taken_at
         FROM dose_records WHERE record_date >= ?1 AND record_date <= ?2",
    )?;
    let rows = stmt.query_map(params![start, end], dose_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
