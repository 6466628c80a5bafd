//! HTTP API for the presentation layer.
//!
//! The calendar page, manage panel, and notification poller are external
//! collaborators: they call these endpoints and render whatever comes back.
//! The router is composable — `app_router()` returns a `Router` that can be
//! mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
