//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`AsiSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use asi_core::logging::LogFormat;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::AsiSettings;

/// Resolve the path to the settings file (`~/.asi/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_owned());
    PathBuf::from(home).join(".asi").join("settings.json")
}

/// Load settings from `path` with process env overrides.
///
/// A missing file yields defaults; a file with invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<AsiSettings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, reading overrides through `lookup`.
pub fn load_settings_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AsiSettings> {
    let defaults = serde_json::to_value(AsiSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: AsiSettings = serde_json::from_value(merged)?;
    apply_env_overrides_with(&mut settings, lookup);
    validate(&settings)?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Upper bound for `server.maxConnections`, from the file or `ASI_MAX_CONNECTIONS`.
pub const MAX_CONNECTIONS_LIMIT: usize = 100_000;

/// Reject settings the server cannot run with.
pub fn validate(settings: &AsiSettings) -> Result<()> {
    if settings.rate_limit.points == 0 {
        return Err(SettingsError::InvalidValue(
            "rateLimit.points must be at least 1".into(),
        ));
    }
    if settings.rate_limit.window_secs == 0 {
        return Err(SettingsError::InvalidValue(
            "rateLimit.windowSecs must be at least 1".into(),
        ));
    }
    if settings.producer.timeout_ms == 0 {
        return Err(SettingsError::InvalidValue(
            "producer.timeoutMs must be at least 1".into(),
        ));
    }
    if !(1..=MAX_CONNECTIONS_LIMIT).contains(&settings.server.max_connections) {
        return Err(SettingsError::InvalidValue(format!(
            "server.maxConnections must be between 1 and {MAX_CONNECTIONS_LIMIT}"
        )));
    }
    Ok(())
}

/// Apply overrides, reading each variable through `lookup`.
///
/// Invalid values are ignored with a warning (falling back to file/default).
pub fn apply_env_overrides_with(
    settings: &mut AsiSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let env = EnvReader { lookup };

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = env.u16("PORT", 1, u16::MAX) {
        settings.server.port = v;
    }
    if let Some(v) = env.string("HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.string("ALLOWED_ORIGINS") {
        settings.server.allowed_origins = parse_origins(&v);
    }
    if let Some(v) = env.usize("ASI_MAX_CONNECTIONS", 1, MAX_CONNECTIONS_LIMIT) {
        settings.server.max_connections = v;
    }

    // ── Rate limiting ───────────────────────────────────────────────
    if let Some(v) = env.u64("ASI_RATE_LIMIT_POINTS", 1, u64::from(u32::MAX)) {
        settings.rate_limit.points = v as u32;
    }
    if let Some(v) = env.u64("ASI_RATE_LIMIT_WINDOW_SECS", 1, 86_400) {
        settings.rate_limit.window_secs = v;
    }
    if let Some(v) = env.bool("ASI_RATE_LIMIT_CHANNEL") {
        settings.rate_limit.apply_to_channel = v;
    }

    // ── Producer ────────────────────────────────────────────────────
    if let Some(v) = env.u64("ASI_PRODUCTION_TIMEOUT_MS", 1, 600_000) {
        settings.producer.timeout_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("ASI_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = env.string("ASI_LOG_FORMAT") {
        match v.parse::<LogFormat>() {
            Ok(format) => settings.logging.format = format,
            Err(_) => warn!(key = "ASI_LOG_FORMAT", value = %v, "invalid log format env var, ignoring"),
        }
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Split a comma-separated origin list, trimming blanks.
pub fn parse_origins(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn parsed<T>(&self, name: &str, kind: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let val = self.string(name)?;
        let result = parse(&val);
        if result.is_none() {
            warn!(key = name, value = %val, kind, "invalid env var, ignoring");
        }
        result
    }

    fn bool(&self, name: &str) -> Option<bool> {
        self.parsed(name, "bool", parse_bool)
    }

    fn u16(&self, name: &str, min: u16, max: u16) -> Option<u16> {
        self.parsed(name, "u16", |v| parse_u16_range(v, min, max))
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        self.parsed(name, "u64", |v| parse_u64_range(v, min, max))
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        self.parsed(name, "usize", |v| parse_usize_range(v, min, max))
    }
}
