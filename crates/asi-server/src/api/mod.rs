//! Versioned HTTP API mounted under `/api/v1`.

pub mod algorithm;
pub mod client_key;
pub mod consultation;
pub mod errors;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use crate::server::AppState;

pub use client_key::ClientKey;
pub use errors::ApiError;

/// Routes relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consultation", post(consultation::consultation))
        .route("/asi-status", get(status::asi_status))
        .route("/algorithm-generation", post(algorithm::algorithm_generation))
}
