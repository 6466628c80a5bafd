//! Calendar month data — backend assembly for the calendar grid view.
//!
//! One medicines query and one dose-records query per month; the grid is
//! joined in memory.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::{dose, medicine};
use crate::db::DatabaseError;
use crate::models::Medicine;

/// One medicine's taken state on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry {
    pub id: i64,
    pub name: String,
    pub is_taken: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub medicines: Vec<CalendarEntry>,
}

/// Year/month cursor for prev/next navigation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarData {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub prev_month: MonthCursor,
    pub next_month: MonthCursor,
    pub selected_date: NaiveDate,
    pub medicines_for_day: Vec<Medicine>,
}

/// First and last day of a month; `None` for an out-of-range year/month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first - Duration::days(1)))
}

pub fn fetch_calendar_data(
    conn: &Connection,
    year: i32,
    month: u32,
    selected_date: NaiveDate,
) -> Result<CalendarData, DatabaseError> {
    let (first, last) = month_bounds(year, month).ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("invalid month {year}-{month}"))
    })?;

    let medicines = medicine::list_medicines_overlapping(conn, first, last)?;
    let records = dose::list_dose_records_between(conn, first, last)?;
    let taken: HashMap<(i64, NaiveDate), bool> = records
        .into_iter()
        .map(|r| ((r.medicine_id, r.record_date), r.taken))
        .collect();

    let mut days = Vec::with_capacity(last.day() as usize);
    let mut date = first;
    while date <= last {
        let entries = medicines
            .iter()
            .filter(|m| m.scheduled_on(date))
            .map(|m| CalendarEntry {
                id: m.id,
                name: m.name.clone(),
                is_taken: *taken.get(&(m.id, date)).unwrap_or(&false),
            })
            .collect();
        days.push(CalendarDay {
            date,
            medicines: entries,
        });
        date = date + Duration::days(1);
    }

    let prev = first - Duration::days(1);
    let next = last + Duration::days(1);

    Ok(CalendarData {
        year,
        month,
        days,
        prev_month: MonthCursor {
            year: prev.year(),
            month: prev.month(),
        },
        next_month: MonthCursor {
            year: next.year(),
            month: next.month(),
        },
        selected_date,
        medicines_for_day: medicine::list_medicines_for_date(conn, selected_date)?,
    })
}
