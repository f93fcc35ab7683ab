// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval store trait backing the approval queue.

use async_trait::async_trait;

use crate::error::StayflowError;
use crate::types::{ApprovalItem, ApprovalStatus, NewApprovalItem};

/// Durable holding area for AI actions deferred pending a staff decision.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    async fn insert(&self, item: NewApprovalItem) -> Result<ApprovalItem, StayflowError>;

    async fn get(&self, item_id: &str) -> Result<Option<ApprovalItem>, StayflowError>;

    /// Marks a pending item as decided. Returns
    /// [`StayflowError::InvalidState`] if the item is already terminal.
    ///
    /// [`StayflowError::InvalidState`]: crate::error::StayflowError::InvalidState
    async fn mark_decided(
        &self,
        item_id: &str,
        status: ApprovalStatus,
        decided_by: &str,
    ) -> Result<ApprovalItem, StayflowError>;

    /// Oldest pending items first.
    async fn pending(&self, limit: u32) -> Result<Vec<ApprovalItem>, StayflowError>;
}
