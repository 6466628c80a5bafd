//! Notification poll endpoint.
//!
//! `GET /notifications/check` runs one dispatch cycle. The browser client
//! polls every 300 seconds (first check on load) and plays a single alert
//! sound when `playSound` is true.

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::notify::{dispatch, NotificationBatch};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueNotice {
    pub medicine_name: String,
    pub dosage: String,
    pub take_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub play_sound: bool,
    pub notifications: Vec<DueNotice>,
}

impl From<NotificationBatch> for NotificationsResponse {
    fn from(batch: NotificationBatch) -> Self {
        Self {
            play_sound: batch.should_play_sound,
            notifications: batch
                .items
                .into_iter()
                .map(|d| DueNotice {
                    medicine_name: d.medicine.name,
                    dosage: d.medicine.dosage,
                    take_time: d.take_time.format("%H:%M").to_string(),
                })
                .collect(),
        }
    }
}

/// `GET /notifications/check` — one dispatch cycle at the current local time.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<NotificationsResponse>, ApiError> {
    let batch = dispatch(&ctx.core, Local::now().naive_local())?;
    Ok(Json(batch.into()))
}
