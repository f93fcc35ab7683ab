// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Stayflow guest-messaging platform.
//!
//! This crate provides the error type, domain types, and service traits used
//! throughout the Stayflow workspace. The message-processing pipeline in
//! `stayflow-pipeline` composes implementations of the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StayflowError;
pub use traits::{
    ApprovalStore, ConversationStore, GuestContextSource, GuestDirectory, Responder, TaskStore,
};
pub use types::{Channel, ConversationState, Department, Priority};
