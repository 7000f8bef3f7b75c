//! Network and connection settings.

use serde::{Deserialize, Serialize};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request body limit (10 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Server network and connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Allowed CORS origins. Empty or `["*"]` means any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum concurrent channel connections.
    pub max_connections: usize,
    /// Channel ping interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Seconds without a pong before a channel is closed.
    pub heartbeat_timeout_secs: u64,
    /// Maximum inbound channel frame size in bytes.
    pub max_message_size: usize,
    /// Maximum HTTP request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
            max_connections: 1_000,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
            max_message_size: 1024 * 1024,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerSettings {
    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}
