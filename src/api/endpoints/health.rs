//! Liveness probe.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database_ok: bool,
    pub version: &'static str,
}

/// `GET /health` — connection check for the front end.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let database_ok = ctx.core.open_db().is_ok();

    Ok(Json(HealthResponse {
        status: "ok",
        database_ok,
        version: crate::config::APP_VERSION,
    }))
}
