//! Medicine registration/edit service — backend data for the manage panel.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::medicine;
use crate::db::DatabaseError;
use crate::models::{Medicine, MedicineDraft};

/// Data for the registration/edit panel of one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct ManagePanel {
    pub record_date: NaiveDate,
    /// The medicine under edit; `None` for a blank registration form.
    pub medicine: Option<Medicine>,
    pub medicines_for_day: Vec<Medicine>,
}

pub fn fetch_manage_panel(
    conn: &Connection,
    date: NaiveDate,
    medicine_id: Option<i64>,
) -> Result<ManagePanel, DatabaseError> {
    let medicine = match medicine_id {
        Some(id) => Some(
            medicine::get_medicine(conn, id)?
                .ok_or_else(|| DatabaseError::medicine_not_found(id))?,
        ),
        None => None,
    };

    Ok(ManagePanel {
        record_date: date,
        medicine,
        medicines_for_day: medicine::list_medicines_for_date(conn, date)?,
    })
}

/// Register a new medicine or edit an existing one. Edits keep the id
/// stable, so past dose records are preserved untouched.
pub fn save_medicine(
    conn: &Connection,
    id: Option<i64>,
    draft: &MedicineDraft,
) -> Result<Medicine, DatabaseError> {
    match id {
        Some(id) => medicine::update_medicine(conn, id, draft),
        None => medicine::insert_medicine(conn, draft),
    }
}

/// Soft-delete a medicine; dose history stays readable.
pub fn delete_medicine(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    medicine::deactivate_medicine(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::dose;
    use crate::db::sqlite::open_memory_database;
    use chrono::{NaiveTime, Utc};

    fn draft(name: &str) -> MedicineDraft {
        MedicineDraft {
            name: name.into(),
            dosage: "100mg".into(),
            take_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            start_date: "2026-08-01".parse().unwrap(),
            end_date: "2026-08-31".parse().unwrap(),
            notes: None,
        }
    }

    fn day() -> NaiveDate {
        "2026-08-10".parse().unwrap()
    }

    #[test]
    fn panel_without_id_has_blank_form() {
        let conn = open_memory_database().unwrap();
        save_medicine(&conn, None, &draft("Aspirin")).unwrap();

        let panel = fetch_manage_panel(&conn, day(), None).unwrap();
        assert!(panel.medicine.is_none());
        assert_eq!(panel.medicines_for_day.len(), 1);
        assert_eq!(panel.record_date, day());
    }

    #[test]
    fn panel_with_id_loads_medicine() {
        let conn = open_memory_database().unwrap();
        let med = save_medicine(&conn, None, &draft("Aspirin")).unwrap();

        let panel = fetch_manage_panel(&conn, day(), Some(med.id)).unwrap();
        assert_eq!(panel.medicine.unwrap().name, "Aspirin");
    }

    #[test]
    fn panel_with_unknown_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = fetch_manage_panel(&conn, day(), Some(42)).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn edit_preserves_dose_history() {
        let conn = open_memory_database().unwrap();
        let med = save_medicine(&conn, None, &draft("Aspirin")).unwrap();
        dose::set_taken(&conn, med.id, day(), true, Utc::now()).unwrap();

        let mut edited = draft("Aspirin Forte");
        edited.take_time = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        save_medicine(&conn, Some(med.id), &edited).unwrap();

        let rec = dose::get_dose_record(&conn, med.id, day()).unwrap().unwrap();
        assert!(rec.taken, "editing name/time does not rewrite history");
    }

    #[test]
    fn delete_removes_from_day_list_only() {
        let conn = open_memory_database().unwrap();
        let med = save_medicine(&conn, None, &draft("Aspirin")).unwrap();
        dose::set_taken(&conn, med.id, day(), true, Utc::now()).unwrap();

        delete_medicine(&conn, med.id).unwrap();

        let panel = fetch_manage_panel(&conn, day(), None).unwrap();
        assert!(panel.medicines_for_day.is_empty());
        assert!(dose::get_dose_record(&conn, med.id, day()).unwrap().is_some());
    }
}
