// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stayflow.toml` > `~/.config/stayflow/stayflow.toml`
//! > `/etc/stayflow/stayflow.toml` with environment variable overrides via the
//! `STAYFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StayflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stayflow/stayflow.toml` (system-wide)
/// 3. `~/.config/stayflow/stayflow.toml` (user XDG config)
/// 4. `./stayflow.toml` (local directory)
/// 5. `STAYFLOW_*` environment variables
pub fn load_config() -> Result<StayflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StayflowConfig::default()))
        .merge(Toml::file("/etc/stayflow/stayflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("stayflow/stayflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("stayflow.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<StayflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StayflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StayflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StayflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `STAYFLOW_ROUTING_MIN_CONFIDENCE` must map
/// to `routing.min_confidence`, not `routing.min.confidence`.
fn env_provider() -> Env {
    Env::prefixed("STAYFLOW_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: STAYFLOW_ROUTING_MIN_CONFIDENCE -> "routing_min_confidence"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("escalation_", "escalation.", 1)
            .replacen("autonomy_", "autonomy.", 1);
        mapped.into()
    })
}
