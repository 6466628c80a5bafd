//! Calendar month endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Local};
use serde::Deserialize;

use crate::api::endpoints::parse_date;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::calendar::{self, CalendarData};

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub selected_date: Option<String>,
}

/// `GET /calendar?year=…&month=…[&selected_date=…]` — month grid data.
/// Defaults to the current local month with today selected.
pub async fn month(
    State(ctx): State<ApiContext>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarData>, ApiError> {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    calendar::month_bounds(year, month)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid month: {year}-{month}")))?;

    let selected_date = match &query.selected_date {
        Some(raw) => parse_date(raw)?,
        None => today,
    };

    let conn = ctx.core.open_db()?;
    let data = calendar::fetch_calendar_data(&conn, year, month, selected_date)?;
    Ok(Json(data))
}
