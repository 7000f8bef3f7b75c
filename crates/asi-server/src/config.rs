//! Server configuration.

use std::time::Duration;

use asi_settings::AsiSettings;
use serde::{Deserialize, Serialize};

use crate::limiter::LimiterConfig;

/// Configuration for the ASI server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Allowed CORS origins. Empty or containing `"*"` means any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum concurrent channel connections.
    pub max_connections: usize,
    /// Heartbeat interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Close a channel after this many seconds without a pong.
    pub heartbeat_timeout_secs: u64,
    /// Max inbound channel frame size in bytes.
    pub max_message_size: usize,
    /// Max HTTP request body size in bytes.
    pub body_limit_bytes: usize,
    /// Outbound queue depth per channel session.
    pub outbound_queue: usize,
    /// Admissions per client per window.
    pub rate_limit_points: u32,
    /// Rate limit window in seconds.
    pub rate_limit_window_secs: u64,
    /// Interval of the expired-window sweep in seconds.
    pub rate_limit_sweep_secs: u64,
    /// Whether channel analysis requests consume rate limit points.
    pub rate_limit_channel: bool,
    /// Upper bound on a single result production, in milliseconds.
    pub production_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            allowed_origins: Vec::new(),
            max_connections: 1_000,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
            max_message_size: 1024 * 1024,
            body_limit_bytes: 10 * 1024 * 1024,
            outbound_queue: 256,
            rate_limit_points: 100,
            rate_limit_window_secs: 60,
            rate_limit_sweep_secs: 60,
            rate_limit_channel: true,
            production_timeout_ms: 30_000,
        }
    }
}

impl ServerConfig {
    /// Build from loaded settings.
    pub fn from_settings(settings: &AsiSettings) -> Self {
        Self {
            host: settings.server.host.clone(),
            port: settings.server.port,
            allowed_origins: settings.server.allowed_origins.clone(),
            max_connections: settings.server.max_connections,
            heartbeat_interval_secs: settings.server.heartbeat_interval_secs,
            heartbeat_timeout_secs: settings.server.heartbeat_timeout_secs,
            max_message_size: settings.server.max_message_size,
            body_limit_bytes: settings.server.body_limit_bytes,
            rate_limit_points: settings.rate_limit.points,
            rate_limit_window_secs: settings.rate_limit.window_secs,
            rate_limit_sweep_secs: settings.rate_limit.sweep_interval_secs,
            rate_limit_channel: settings.rate_limit.apply_to_channel,
            production_timeout_ms: settings.producer.timeout_ms,
            ..Self::default()
        }
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Rate limiter policy.
    pub fn limiter(&self) -> LimiterConfig {
        LimiterConfig {
            points: self.rate_limit_points,
            window: Duration::from_secs(self.rate_limit_window_secs),
        }
    }

    /// Production time bound.
    pub fn production_timeout(&self) -> Duration {
        Duration::from_millis(self.production_timeout_ms)
    }

    /// Interval between channel pings.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    /// Pong deadline for a channel.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    /// Sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_loopback_auto_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 0);
    }

    #[test]
    fn default_rate_limit_policy() {
        let limiter = ServerConfig::default().limiter();
        assert_eq!(limiter.points, 100);
        assert_eq!(limiter.window, Duration::from_secs(60));
    }

    #[test]
    fn default_body_limit_is_ten_mib() {
        assert_eq!(ServerConfig::default().body_limit_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn default_production_timeout() {
        assert_eq!(
            ServerConfig::default().production_timeout(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn from_settings_copies_every_section() {
        let mut settings = AsiSettings::default();
        settings.server.port = 3000;
        settings.server.host = "0.0.0.0".into();
        settings.server.allowed_origins = vec!["https://a.example".into()];
        settings.rate_limit.points = 7;
        settings.rate_limit.window_secs = 5;
        settings.rate_limit.apply_to_channel = false;
        settings.producer.timeout_ms = 250;

        let cfg = ServerConfig::from_settings(&settings);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert!(!cfg.allows_any_origin());
        assert_eq!(cfg.rate_limit_points, 7);
        assert_eq!(cfg.limiter().window, Duration::from_secs(5));
        assert!(!cfg.rate_limit_channel);
        assert_eq!(cfg.production_timeout(), Duration::from_millis(250));
        assert_eq!(cfg.outbound_queue, 256);
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let cfg = ServerConfig {
            allowed_origins: vec!["*".into()],
            ..ServerConfig::default()
        };
        assert!(cfg.allows_any_origin());
    }

    #[test]
    fn heartbeat_durations() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.heartbeat_interval(), Duration::from_secs(30));
        assert_eq!(cfg.heartbeat_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn sweep_interval_floor() {
        let cfg = ServerConfig {
            rate_limit_sweep_secs: 0,
            ..ServerConfig::default()
        };
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn deserialize_from_json_string() {
        let cfg: ServerConfig = serde_json::from_value(
            serde_json::to_value(ServerConfig {
                port: 3000,
                ..ServerConfig::default()
            })
            .unwrap(),
        )
        .unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.max_connections, 1_000);
    }
}
