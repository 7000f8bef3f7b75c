//! `GET /api/v1/asi-status`.

use asi_core::platform::PlatformSnapshot;
use axum::Json;
use axum::extract::State;

use crate::server::AppState;

/// Current platform figures and counters.
pub async fn asi_status(State(state): State<AppState>) -> Json<PlatformSnapshot> {
    Json(state.platform.snapshot())
}
