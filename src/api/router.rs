//! Application router.
//!
//! Routes sit at the root (the calendar page and its scripts are the only
//! clients). CORS is permissive so a separately-served page can still reach
//! the API during development.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the application router.
pub fn app_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/calendar", get(endpoints::calendar::month))
        .route("/dose/toggle", post(endpoints::doses::toggle))
        .route("/dose/manage", get(endpoints::doses::manage))
        .route("/medicine/manage", post(endpoints::medicines::manage))
        .route("/notifications/check", get(endpoints::notifications::check))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
