// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./helpdesk.toml` > `~/.config/helpdesk/helpdesk.toml` >
//! `/etc/helpdesk/helpdesk.toml` with environment variable overrides via `HELPDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HelpdeskConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/helpdesk/helpdesk.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "helpdesk.toml";

/// Sections recognized in `HELPDESK_<SECTION>_<KEY>` variable names.
const ENV_SECTIONS: &[&str] = &["agent", "routing", "gemini", "openai", "data", "evaluation"];

/// User config file under the XDG config directory, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("helpdesk/helpdesk.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/helpdesk/helpdesk.toml` (system-wide)
/// 3. `~/.config/helpdesk/helpdesk.toml` (user XDG config)
/// 4. `./helpdesk.toml` (local directory)
/// 5. `HELPDESK_*` environment variables
pub fn load_config() -> Result<HelpdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over compiled defaults (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HelpdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HelpdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Maps a prefix-stripped, lower-cased env var name to a dotted config key.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `gemini_api_key` maps to `gemini.api_key`, not `gemini.api.key`. Names
/// without a known section are returned unchanged and rejected later as
/// unknown top-level keys.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
fn env_provider() -> Env {
    Env::prefixed("HELPDESK_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}
