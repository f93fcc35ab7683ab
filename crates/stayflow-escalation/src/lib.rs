// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-handoff escalation heuristics for the Stayflow platform.

pub mod engine;

pub use engine::{EscalationDecision, EscalationEngine, EscalationReason};
