//! Rate limiting, result production, and logging settings.

use asi_core::logging::LogFormat;
use serde::{Deserialize, Serialize};

/// Per-client admission policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitSettings {
    /// Admissions per window per client.
    pub points: u32,
    /// Window length in seconds.
    pub window_secs: u64,
    /// Interval of the expired-window sweep in seconds.
    pub sweep_interval_secs: u64,
    /// Also gate channel analysis requests.
    pub apply_to_channel: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            points: 100,
            window_secs: 60,
            sweep_interval_secs: 60,
            apply_to_channel: true,
        }
    }
}

/// Which result producer backs the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerKind {
    /// Randomized branded payloads.
    #[default]
    Random,
    /// Deterministic payloads.
    Fixed,
}

/// Result production settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProducerSettings {
    /// Producer implementation.
    pub kind: ProducerKind,
    /// Upper bound on a single production, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            kind: ProducerKind::Random,
            timeout_ms: 30_000,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level, used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}
