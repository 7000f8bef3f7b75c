//! `POST /api/v1/consultation`.

use std::time::Instant;

use asi_core::constants::ASI_SIGNATURE;
use asi_core::errors::ValidationError;
use asi_core::ids::RequestId;
use asi_core::producer::run_guarded;
use asi_core::types::{ConsultationBody, ConsultationResult};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{debug, info};

use crate::limiter::Admission;
use crate::metrics::{
    ASI_CONSULTATIONS_TOTAL, ASI_PRODUCTION_DURATION_SECONDS, ASI_RATE_LIMIT_REJECTIONS_TOTAL,
};
use crate::server::AppState;

use super::client_key::ClientKey;
use super::errors::ApiError;

/// Successful consultation body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    /// Always `true`.
    pub success: bool,
    /// The generated consultation.
    pub consultation: ConsultationResult,
    /// RFC 3339 response time.
    pub timestamp: String,
    /// Provenance tag.
    pub asi_signature: &'static str,
    /// Always `true`.
    pub patent_protected: bool,
}

/// Map a body extraction failure to an API error.
pub(crate) fn body_rejection(rejection: &JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

/// Rate limit, validate, produce.
///
/// The limiter runs first so a rejected caller never reaches validation or
/// the producer.
pub async fn consultation(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    body: Result<Json<ConsultationBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    if let Admission::Rejected { retry_after } = state.limiter.consume(&client) {
        counter!(ASI_RATE_LIMIT_REJECTIONS_TOTAL, "surface" => "http").increment(1);
        debug!(client, ?retry_after, "consultation rate limited");
        return Err(ApiError::RateLimited { retry_after });
    }

    let Json(body) = body.map_err(|rejection| body_rejection(&rejection))?;
    let request = body.validate()?;
    let request_id = RequestId::new();

    let started = Instant::now();
    let result = run_guarded(
        state.config.production_timeout(),
        state.producer.consult(&request),
    )
    .await;
    histogram!(ASI_PRODUCTION_DURATION_SECONDS, "kind" => "consultation")
        .record(started.elapsed().as_secs_f64());

    let consultation = result.map_err(|err| {
        counter!(ASI_CONSULTATIONS_TOTAL, "outcome" => "failed").increment(1);
        ApiError::Consultation(err)
    })?;

    let served = state.platform.record_consultation();
    counter!(ASI_CONSULTATIONS_TOTAL, "outcome" => "served").increment(1);
    info!(
        request_id = %request_id,
        client,
        industry = %request.context.industry,
        company_size = %request.context.company_size,
        value = consultation.value,
        served,
        "consultation served"
    );

    Ok(Json(ConsultationResponse {
        success: true,
        consultation,
        timestamp: chrono::Utc::now().to_rfc3339(),
        asi_signature: ASI_SIGNATURE,
        patent_protected: true,
    }))
}
