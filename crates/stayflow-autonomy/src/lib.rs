// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Autonomy policy gate for AI-initiated actions.

pub mod engine;

pub use engine::{
    AutonomyEngine, AutonomySettings, ConfidenceGate, ConfigSettingsProvider, SettingsProvider,
};
