// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Stayflow integration tests.
//!
//! Provides the scripted [`MockResponder`], in-memory service fakes, and the
//! full-stack [`TestHarness`] over a temp SQLite database.

pub mod harness;
pub mod memory;
pub mod mock_responder;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory::{
    InMemoryApprovalStore, InMemoryConversationStore, InMemoryGuestContextSource,
    InMemoryGuestDirectory, InMemoryTaskStore,
};
pub use mock_responder::MockResponder;
