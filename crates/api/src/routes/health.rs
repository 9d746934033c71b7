//! Health check handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness response body.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub customers: usize,
}

/// Readiness health check endpoint.
///
/// The store is in memory, so the service is ready as soon as it is
/// listening. Reports the current customer count.
pub async fn readiness(State(state): State<AppState>) -> Json<Readiness> {
    Json(Readiness {
        status: "ok",
        customers: state.store().len(),
    })
}
