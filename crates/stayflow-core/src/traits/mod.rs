// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service traits that form the seams of the message-processing pipeline.
//!
//! Implementations live in `stayflow-storage` (SQLite) and
//! `stayflow-test-utils` (in-memory fakes).

pub mod approval;
pub mod conversation;
pub mod guest;
pub mod responder;
pub mod task;

pub use approval::ApprovalStore;
pub use conversation::ConversationStore;
pub use guest::{GuestContextSource, GuestDirectory};
pub use responder::Responder;
pub use task::TaskStore;
