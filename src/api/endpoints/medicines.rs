//! Medicine registration/edit/delete endpoint.

use axum::extract::State;
use axum::{Form, Json};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::{parse_date, parse_medicine_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::medicines::{self, ManagePanel};
use crate::models::MedicineDraft;

#[derive(Deserialize)]
pub struct MedicineManageForm {
    pub action: String,
    pub date: String,
    pub medicine_id: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub take_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct MedicineManageResponse {
    pub success: bool,
    pub panel: ManagePanel,
}

/// `POST /medicine/manage` — `action=save` registers or edits, `action=delete`
/// deactivates. Responds with the refreshed panel for the submitted day.
pub async fn manage(
    State(ctx): State<ApiContext>,
    Form(form): Form<MedicineManageForm>,
) -> Result<Json<MedicineManageResponse>, ApiError> {
    let date = parse_date(&form.date)?;
    let medicine_id = parse_medicine_id(form.medicine_id.as_deref())?;
    let conn = ctx.core.open_db()?;

    match form.action.as_str() {
        "save" => {
            let draft = draft_from_form(&form)?;
            medicines::save_medicine(&conn, medicine_id, &draft)?;
        }
        "delete" => {
            let id = medicine_id
                .ok_or_else(|| ApiError::BadRequest("medicine_id is required for delete".into()))?;
            medicines::delete_medicine(&conn, id)?;
        }
        other => {
            return Err(ApiError::BadRequest(format!("Unknown action: {other}")));
        }
    }

    let panel = medicines::fetch_manage_panel(&conn, date, None)?;
    Ok(Json(MedicineManageResponse {
        success: true,
        panel,
    }))
}

fn draft_from_form(form: &MedicineManageForm) -> Result<MedicineDraft, ApiError> {
    let name = required(&form.name, "name")?;
    let dosage = required(&form.dosage, "dosage")?;
    let take_time_raw = required(&form.take_time, "take_time")?;
    let start_date = parse_date(&required(&form.start_date, "start_date")?)?;
    let end_date = parse_date(&required(&form.end_date, "end_date")?)?;

    if end_date < start_date {
        return Err(ApiError::BadRequest(
            "end_date must not precede start_date".into(),
        ));
    }

    let take_time = NaiveTime::parse_from_str(&take_time_raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&take_time_raw, "%H:%M:%S"))
        .map_err(|_| ApiError::BadRequest(format!("Invalid take_time: {take_time_raw}")))?;

    Ok(MedicineDraft {
        name,
        dosage,
        take_time,
        start_date,
        end_date,
        notes: form.notes.clone().filter(|n| !n.trim().is_empty()),
    })
}

fn required(field: &Option<String>, label: &str) -> Result<String, ApiError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest(format!("{label} is required")))
}
