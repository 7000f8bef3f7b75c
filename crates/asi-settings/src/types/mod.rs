//! Settings schema.

mod runtime;
mod server;

pub use runtime::{LoggingSettings, ProducerKind, ProducerSettings, RateLimitSettings};
pub use server::{DEFAULT_BODY_LIMIT_BYTES, DEFAULT_PORT, ServerSettings};

use serde::{Deserialize, Serialize};

/// Root settings object, as stored in `settings.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsiSettings {
    /// Network and connection settings.
    pub server: ServerSettings,
    /// Admission policy.
    pub rate_limit: RateLimitSettings,
    /// Result production.
    pub producer: ProducerSettings,
    /// Log output.
    pub logging: LoggingSettings,
}
