// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff approval queue for deferred AI actions.

pub mod queue;

pub use queue::{
    ApprovalDecision, ApprovalQueue, DecisionOutcome, ResponseAction, TaskAction,
};
