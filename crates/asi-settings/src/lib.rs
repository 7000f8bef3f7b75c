//! # asi-settings
//!
//! Layered configuration for the ASI consultation server.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`AsiSettings::default()`]
//! 2. **Settings file**: `~/.asi/settings.json` or an explicit path (deep-merged over defaults)
//! 3. **Environment variables**: `PORT`, `HOST`, `ALLOWED_ORIGINS` and `ASI_*` overrides

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    MAX_CONNECTIONS_LIMIT, apply_env_overrides_with, deep_merge, load_settings_from_path,
    load_settings_with, settings_path,
};
pub use types::*;
