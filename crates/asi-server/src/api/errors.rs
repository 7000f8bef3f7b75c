//! HTTP error mapping.

use std::time::Duration;

use asi_core::errors::{ProducerError, ValidationError};
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::limiter::retry_after_secs;

/// Generic body text for a failed consultation.
pub const CONSULTATION_FAILED: &str = "Superintelligent processing temporarily unavailable";
/// What a client should do after a failed consultation.
pub const CONSULTATION_FALLBACK: &str = "Contact ASI support for immediate assistance";
/// Body text for a failed algorithm generation.
pub const ALGORITHM_FAILED: &str = "Algorithm generation requires proper licensing";

/// Failure of an HTTP endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not pass boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller exhausted its rate limit window.
    #[error("rate limit exceeded, retry after {retry_after:?}")]
    RateLimited {
        /// Time until the caller's window resets.
        retry_after: Duration,
    },

    /// The body exceeded the configured size limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// Consultation production failed.
    #[error("consultation failed: {0}")]
    Consultation(ProducerError),

    /// Algorithm generation failed.
    #[error("algorithm generation failed: {0}")]
    Algorithm(ProducerError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Consultation(_) | Self::Algorithm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(err) => {
                debug!(code = err.code(), error = %err, "request rejected");
                (
                    status,
                    Json(json!({
                        "success": false,
                        "error": err.to_string(),
                        "code": err.code(),
                    })),
                )
                    .into_response()
            }
            Self::RateLimited { retry_after } => {
                let secs = retry_after_secs(retry_after);
                let mut response = (
                    status,
                    Json(json!({
                        "success": false,
                        "error": "Too many requests",
                        "retryAfterSecs": secs,
                    })),
                )
                    .into_response();
                let _ = response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                response
            }
            Self::PayloadTooLarge => (
                status,
                Json(json!({
                    "success": false,
                    "error": "Request body too large",
                    "code": "PAYLOAD_TOO_LARGE",
                })),
            )
                .into_response(),
            Self::Consultation(err) => {
                error!(error = %err, "consultation production failed");
                (
                    status,
                    Json(json!({
                        "success": false,
                        "error": CONSULTATION_FAILED,
                        "fallbackRecommendation": CONSULTATION_FALLBACK,
                    })),
                )
                    .into_response()
            }
            Self::Algorithm(err) => {
                error!(error = %err, "algorithm generation failed");
                (
                    status,
                    Json(json!({
                        "success": false,
                        "error": ALGORITHM_FAILED,
                    })),
                )
                    .into_response()
            }
        }
    }
}
