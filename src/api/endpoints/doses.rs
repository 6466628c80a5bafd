//! Dose endpoints.
//!
//! - `POST /dose/toggle` — flip taken/untaken for one (medicine, date)
//! - `GET /dose/manage` — data for the registration/edit panel

use axum::extract::{Query, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::{parse_date, parse_medicine_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::doses;
use crate::medicines::{self, ManagePanel};

#[derive(Deserialize)]
pub struct ToggleForm {
    pub medicine_id: String,
    pub date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    pub is_taken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /dose/toggle` — form body `{medicine_id, date}`.
///
/// A failed toggle returns a structured failure and leaves the stored state
/// untouched, so the client never flips optimistically.
pub async fn toggle(
    State(ctx): State<ApiContext>,
    Form(form): Form<ToggleForm>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let medicine_id = parse_medicine_id(Some(form.medicine_id.as_str()))?
        .ok_or_else(|| ApiError::BadRequest("medicine_id is required".into()))?;
    let date = parse_date(&form.date)?;

    let state = doses::toggle(&ctx.core, medicine_id, date)?;

    Ok(Json(ToggleResponse {
        success: true,
        is_taken: state.is_taken,
        message: None,
    }))
}

#[derive(Deserialize)]
pub struct ManageQuery {
    pub date: String,
    pub medicine_id: Option<String>,
    /// Present when the client wants a blank registration form.
    pub new: Option<String>,
}

/// `GET /dose/manage?date=…[&medicine_id=…][&new=1]` — panel data for one day.
pub async fn manage(
    State(ctx): State<ApiContext>,
    Query(query): Query<ManageQuery>,
) -> Result<Json<ManagePanel>, ApiError> {
    let date = parse_date(&query.date)?;
    let medicine_id = if query.new.is_some() {
        None
    } else {
        parse_medicine_id(query.medicine_id.as_deref())?
    };

    let conn = ctx.core.open_db()?;
    let panel = medicines::fetch_manage_panel(&conn, date, medicine_id)?;
    Ok(Json(panel))
}
