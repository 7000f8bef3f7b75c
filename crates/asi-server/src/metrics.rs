//! Prometheus metrics recorder and `/metrics` endpoint handler.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Call once at startup before any metrics are recorded.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Build a handle without installing a global recorder.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across modules.

/// Consultations served total (counter, labels: outcome).
pub const ASI_CONSULTATIONS_TOTAL: &str = "asi_consultations_total";
/// Analyses produced total (counter, labels: outcome).
pub const ASI_ANALYSES_TOTAL: &str = "asi_analyses_total";
/// Algorithm blueprints generated total (counter, labels: outcome).
pub const ASI_ALGORITHMS_TOTAL: &str = "asi_algorithms_total";
/// Requests refused by the rate limiter (counter, labels: surface).
pub const ASI_RATE_LIMIT_REJECTIONS_TOTAL: &str = "asi_rate_limit_rejections_total";
/// Results discarded because their session was gone (counter).
pub const ASI_DELIVERIES_DROPPED_TOTAL: &str = "asi_deliveries_dropped_total";
/// Result production duration seconds (histogram, labels: kind).
pub const ASI_PRODUCTION_DURATION_SECONDS: &str = "asi_production_duration_seconds";
/// WebSocket connections opened total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// WebSocket disconnections total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Active WebSocket connections (gauge).
pub const WS_CONNECTIONS_ACTIVE: &str = "ws_connections_active";
/// Refused upgrades, labelled by `reason` (counter).
pub const WS_CONNECTIONS_REJECTED_TOTAL: &str = "ws_connections_rejected_total";
/// WebSocket connection duration seconds (histogram).
pub const WS_CONNECTION_DURATION_SECONDS: &str = "ws_connection_duration_seconds";
