use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered medicine with a recurring daily schedule.
///
/// Medicines are soft-deleted (`active = false`) so historical dose records
/// keep a valid referent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    /// Wall-clock time of day the dose is scheduled, no date component.
    pub take_time: NaiveTime,
    /// First calendar date the medicine is scheduled on (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar date the medicine is scheduled on (inclusive).
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub active: bool,
}

impl Medicine {
    /// Whether this medicine is scheduled on the given date.
    pub fn scheduled_on(&self, date: NaiveDate) -> bool {
        self.active && self.start_date <= date && date <= self.end_date
    }
}

/// Taken/not-taken state for one medicine on one date.
///
/// At most one record exists per (medicine_id, date); absent means not taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseRecord {
    pub medicine_id: i64,
    pub record_date: NaiveDate,
    pub taken: bool,
    pub taken_at: Option<DateTime<Utc>>,
}

/// Field set for registering or editing a medicine. The id is assigned by
/// the store on insert and stays stable across edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineDraft {
    pub name: String,
    pub dosage: String,
    pub take_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}
