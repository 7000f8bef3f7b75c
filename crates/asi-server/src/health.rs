//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Channel sockets holding a connection slot.
    pub connections: usize,
    /// Number of registered channel sessions.
    pub active_sessions: usize,
    /// Clients with a live rate limit window.
    pub tracked_clients: usize,
}

/// Build a health response from live counters.
pub fn health_check(
    start_time: Instant,
    connections: usize,
    sessions: usize,
    tracked_clients: usize,
) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        version: asi_core::constants::VERSION.into(),
        uptime_secs: start_time.elapsed().as_secs(),
        connections,
        active_sessions: sessions,
        tracked_clients,
    }
}
