//! `POST /api/v1/algorithm-generation`.

use asi_core::constants::{LICENSING_CONTACT, PATENT_NOTICE};
use asi_core::producer::run_guarded;
use asi_core::types::{AlgorithmBlueprint, AlgorithmRequest};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use metrics::counter;
use serde::Serialize;
use tracing::info;

use crate::metrics::ASI_ALGORITHMS_TOTAL;
use crate::server::AppState;

use super::consultation::body_rejection;
use super::errors::ApiError;

/// Successful generation body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResponse {
    /// Always `true`.
    pub success: bool,
    /// The generated blueprint.
    pub algorithm: AlgorithmBlueprint,
    /// Patent notice.
    pub patent_notice: &'static str,
    /// Always `true`.
    pub license_required: bool,
    /// Licensing contact.
    pub contact_info: &'static str,
}

/// Generate an algorithm blueprint. Every field of the body is optional; a
/// request without a JSON content type is treated as empty.
pub async fn algorithm_generation(
    State(state): State<AppState>,
    body: Result<Json<AlgorithmRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => AlgorithmRequest::default(),
        Err(rejection) => return Err(body_rejection(&rejection)),
    };

    let algorithm = run_guarded(
        state.config.production_timeout(),
        state.producer.generate_algorithm(&request),
    )
    .await
    .map_err(|err| {
        counter!(ASI_ALGORITHMS_TOTAL, "outcome" => "failed").increment(1);
        ApiError::Algorithm(err)
    })?;

    counter!(ASI_ALGORITHMS_TOTAL, "outcome" => "generated").increment(1);
    info!(
        domain = request.domain_type.as_deref().unwrap_or("general"),
        steps = algorithm.implementation_steps.len(),
        "algorithm generated"
    );

    Ok(Json(AlgorithmResponse {
        success: true,
        algorithm,
        patent_notice: PATENT_NOTICE,
        license_required: true,
        contact_info: LICENSING_CONTACT,
    }))
}
