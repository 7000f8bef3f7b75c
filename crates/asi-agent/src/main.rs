//! # asi-agent
//!
//! ASI consultation server binary. Loads settings, wires the producer and
//! platform state into the server and runs until ctrl-c.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use asi_core::platform::PlatformState;
use asi_core::producer::{FixedProducer, RandomProducer, ResultProducer};
use asi_server::config::ServerConfig;
use asi_server::server::AsiServer;
use asi_settings::{AsiSettings, ProducerKind};
use clap::Parser;

/// How long shutdown waits for background tasks.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// ASI consultation server.
#[derive(Parser, Debug)]
#[command(name = "asi-agent", about = "ASI consultation server", version)]
struct Cli {
    /// Host to bind (overrides settings and `HOST`).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings and `PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Settings file (defaults to `~/.asi/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset (overrides settings).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(asi_settings::settings_path)
    }

    /// Apply CLI overrides on top of loaded settings.
    fn apply(&self, settings: &mut AsiSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

fn build_producer(kind: ProducerKind, platform: &Arc<PlatformState>) -> Arc<dyn ResultProducer> {
    match kind {
        ProducerKind::Random => Arc::new(RandomProducer::new(Arc::clone(platform))),
        ProducerKind::Fixed => Arc::new(FixedProducer::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args.settings_path();
    let mut settings = asi_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    args.apply(&mut settings);

    asi_core::logging::init_subscriber(&settings.logging.level, settings.logging.format);
    tracing::info!(path = %settings_path.display(), "settings loaded");

    let metrics_handle =
        asi_server::metrics::install_recorder().context("Failed to install metrics recorder")?;

    let platform = Arc::new(PlatformState::default());
    let producer = build_producer(settings.producer.kind, &platform);
    tracing::info!(producer = producer.name(), "result producer ready");

    let config = ServerConfig::from_settings(&settings);
    let server = AsiServer::new(config, producer, platform, metrics_handle);
    let addr = server.listen().await.context("Failed to bind server")?;

    tracing::info!("ASI server listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server
        .shutdown()
        .graceful_shutdown(Some(SHUTDOWN_TIMEOUT))
        .await;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_leave_settings_alone() {
        let cli = Cli::parse_from(["asi-agent"]);
        let mut settings = AsiSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings, AsiSettings::default());
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn cli_custom_port() {
        let cli = Cli::parse_from(["asi-agent", "--port", "8080"]);
        let mut settings = AsiSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn cli_custom_host_and_level() {
        let cli = Cli::parse_from(["asi-agent", "--host", "127.0.0.1", "--log-level", "debug"]);
        let mut settings = AsiSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn cli_rejects_bad_port() {
        assert!(Cli::try_parse_from(["asi-agent", "--port", "70000"]).is_err());
    }

    #[test]
    fn settings_path_defaults_under_asi_dir() {
        let cli = Cli::parse_from(["asi-agent"]);
        assert!(cli.settings_path().ends_with(".asi/settings.json"));
    }

    #[test]
    fn settings_path_flag() {
        let cli = Cli::parse_from(["asi-agent", "--settings", "/tmp/asi.json"]);
        assert_eq!(cli.settings_path(), PathBuf::from("/tmp/asi.json"));
    }

    #[test]
    fn settings_file_feeds_server_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 4100}, "rateLimit": {"points": 5}, "producer": {"kind": "fixed"}}"#,
        )
        .unwrap();

        let mut settings = asi_settings::load_settings_with(&path, |_: &str| None).unwrap();
        Cli::parse_from(["asi-agent", "--port", "4200"]).apply(&mut settings);
        let config = ServerConfig::from_settings(&settings);

        assert_eq!(config.port, 4200);
        assert_eq!(config.rate_limit_points, 5);
        assert_eq!(settings.producer.kind, ProducerKind::Fixed);
    }

    #[test]
    fn producer_kind_selects_implementation() {
        let platform = Arc::new(PlatformState::default());
        assert_eq!(build_producer(ProducerKind::Random, &platform).name(), "random");
        assert_eq!(build_producer(ProducerKind::Fixed, &platform).name(), "fixed");
    }
}
