//! Dose toggle service.
//!
//! Applies a taken/untaken transition for one (medicine, date) pair and
//! returns the resulting state. Concurrent toggles on the same pair
//! serialize through the per-dose lock registry so every call flips exactly
//! once; distinct pairs proceed independently.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::core_state::{CoreError, CoreState};
use crate::db::repository::{dose, medicine};
use crate::db::DatabaseError;
use crate::models::DoseRecord;

#[derive(Error, Debug)]
pub enum ToggleError {
    #[error("medicine {0} not found")]
    MedicineNotFound(i64),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Resulting dose state returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DoseState {
    pub is_taken: bool,
}

/// Flip the taken state for (medicine, date).
///
/// The dose record is created lazily (not taken) on first contact, so the
/// first toggle always lands on taken=true. Untaking retracts the dose from
/// the announced set, re-arming its notification while the window is open.
pub fn toggle(
    state: &CoreState,
    medicine_id: i64,
    date: NaiveDate,
) -> Result<DoseState, ToggleError> {
    let lock = state.dose_locks().lock_for(medicine_id, date)?;
    let _guard = lock.lock().map_err(|_| CoreError::LockPoisoned)?;

    let conn = state.open_db()?;
    if medicine::get_medicine(&conn, medicine_id)?.is_none() {
        return Err(ToggleError::MedicineNotFound(medicine_id));
    }

    let record = dose::get_or_create_dose_record(&conn, medicine_id, date)?;
    let updated = dose::set_taken(&conn, medicine_id, date, !record.taken, Utc::now())?;

    if !updated.taken {
        state.announced()?.retract(medicine_id, date);
    }

    Ok(DoseState {
        is_taken: updated.taken,
    })
}

/// Read the committed record for (medicine, date) without creating one.
pub fn current_record(
    state: &CoreState,
    medicine_id: i64,
    date: NaiveDate,
) -> Result<Option<DoseRecord>, ToggleError> {
    let conn = state.open_db()?;
    if medicine::get_medicine(&conn, medicine_id)?.is_none() {
        return Err(ToggleError::MedicineNotFound(medicine_id));
    }
    Ok(dose::get_dose_record(&conn, medicine_id, date)?)
}
