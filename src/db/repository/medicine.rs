use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Medicine, MedicineDraft};

const MEDICINE_COLUMNS: &str = "id, name, dosage, take_time, start_date, end_date, notes, active";

fn medicine_from_row(row: &rusqlite::Row<'_>) -> Result<Medicine, rusqlite::Error> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        dosage: row.get(2)?,
        take_time: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        notes: row.get(6)?,
        active: row.get::<_, i64>(7)? != 0,
    })
}

pub fn insert_medicine(conn: &Connection, draft: &MedicineDraft) -> Result<Medicine, DatabaseError> {
    conn.execute(
        "INSERT INTO medicines (name, dosage, take_time, start_date, end_date, notes, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        params![
            draft.name,
            draft.dosage,
            draft.take_time,
            draft.start_date,
            draft.end_date,
            draft.notes,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_medicine(conn, id)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("inserted medicine {id} not readable"))
    })
}

/// Update an existing medicine in place. The id stays stable, so existing
/// dose records for this medicine are untouched.
pub fn update_medicine(
    conn: &Connection,
    id: i64,
    draft: &MedicineDraft,
) -> Result<Medicine, DatabaseError> {
    let changed = conn.execute(
        "UPDATE medicines
         SET name = ?1, dosage = ?2, take_time = ?3, start_date = ?4, end_date = ?5, notes = ?6
         WHERE id = ?7",
        params![
            draft.name,
            draft.dosage,
            draft.take_time,
            draft.start_date,
            draft.end_date,
            draft.notes,
            id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::medicine_not_found(id));
    }
    get_medicine(conn, id)?.ok_or_else(|| DatabaseError::medicine_not_found(id))
}

pub fn get_medicine(conn: &Connection, id: i64) -> Result<Option<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map(params![id], medicine_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Active medicines scheduled on the given date, ordered by time of day
/// (id as tiebreak for a deterministic sequence).
pub fn list_medicines_for_date(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDICINE_COLUMNS} FROM medicines
         WHERE active = 1 AND start_date <= ?1 AND end_date >= ?1
         ORDER BY take_time ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![date], medicine_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Active medicines whose validity range overlaps [start, end] (inclusive).
pub fn list_medicines_overlapping(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDICINE_COLUMNS} FROM medicines
         WHERE active = 1 AND start_date <= ?2 AND end_date >= ?1
         ORDER BY take_time ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![start, end], medicine_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Soft delete: historical dose records keep referencing the row.
pub fn deactivate_medicine(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("UPDATE medicines SET active = 0 WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::medicine_not_found(id));
    }
    Ok(())
}
