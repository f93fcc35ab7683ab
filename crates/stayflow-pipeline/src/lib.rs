// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message processing pipeline for the Stayflow platform.
//!
//! The [`MessageProcessor`] is the root orchestrator: it composes the intent
//! taxonomy, task router, escalation engine, autonomy gate, and approval
//! queue into one guest-message-in, response-out transaction.

pub mod processor;
pub mod templates;

pub use processor::MessageProcessor;
pub use templates::pending_reply;
