//! API endpoint handlers.
//!
//! Each module corresponds to one screen or collaborator of the calendar
//! front end. Handlers reuse the service modules; request parsing and wire
//! shapes live here.

pub mod calendar;
pub mod doses;
pub mod health;
pub mod medicines;
pub mod notifications;

use chrono::NaiveDate;

use crate::api::error::ApiError;

/// Parse a `YYYY-MM-DD` form/query value.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ApiError::InvalidDate(raw.to_string()))
}

/// Parse an optional medicine id; empty strings read as absent.
pub(crate) fn parse_medicine_id(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid medicine id: {s}"))),
    }
}
