// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Stayflow platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level Stayflow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StayflowConfig {
    /// Platform identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Task routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Escalation heuristics settings.
    #[serde(default)]
    pub escalation: EscalationConfig,

    /// Autonomy policy settings.
    #[serde(default)]
    pub autonomy: AutonomyConfig,
}

/// Platform identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant, used in pending-reply templates.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "stayflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("stayflow").join("stayflow.db"))
        .and_then(|p| p.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "stayflow.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Task routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Minimum classification confidence for task creation.
    /// Below this, routing never acts on the classified intent.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Whether created tasks are auto-assigned to on-shift staff.
    #[serde(default)]
    pub auto_assign: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            auto_assign: false,
        }
    }
}

fn default_min_confidence() -> f32 {
    0.6
}

/// Escalation heuristics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EscalationConfig {
    /// AI confidence below this value counts toward the low-confidence streak.
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f32,

    /// Number of consecutive low-confidence AI turns that triggers escalation.
    #[serde(default = "default_low_confidence_streak")]
    pub low_confidence_streak: u32,

    /// How many recent messages to inspect when evaluating history heuristics.
    #[serde(default = "default_history_window")]
    pub history_window: u32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
            low_confidence_streak: default_low_confidence_streak(),
            history_window: default_history_window(),
        }
    }
}

fn default_low_confidence_threshold() -> f32 {
    0.5
}

fn default_low_confidence_streak() -> u32 {
    2
}

fn default_history_window() -> u32 {
    10
}

/// Per-action autonomy level.
///
/// `L1` actions always require staff approval; `L2` actions may execute
/// autonomously when the policy conditions and confidence thresholds allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutonomyLevel {
    L1,
    L2,
}

/// Autonomy policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutonomyConfig {
    /// Level applied to action types without an explicit override.
    #[serde(default = "default_autonomy_level")]
    pub default_level: AutonomyLevel,

    /// Per-action-type level overrides, keyed by action name
    /// (e.g. `respond_to_guest`, `create_housekeeping_task`).
    #[serde(default)]
    pub action_levels: HashMap<String, AutonomyLevel>,

    /// Confidence at or above which an action may auto-execute.
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: f32,

    /// Confidence below which a deferred action is flagged for urgent review.
    #[serde(default = "default_urgent_threshold")]
    pub urgent_threshold: f32,

    /// Route every VIP-guest action through staff review regardless of level.
    #[serde(default)]
    pub require_approval_for_vip: bool,
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            default_level: default_autonomy_level(),
            action_levels: HashMap::new(),
            approval_threshold: default_approval_threshold(),
            urgent_threshold: default_urgent_threshold(),
            require_approval_for_vip: false,
        }
    }
}

fn default_autonomy_level() -> AutonomyLevel {
    AutonomyLevel::L2
}

fn default_approval_threshold() -> f32 {
    0.7
}

fn default_urgent_threshold() -> f32 {
    0.4
}
