// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task store trait for staff work items.

use async_trait::async_trait;

use crate::error::StayflowError;
use crate::types::{NewTask, Task};

/// Persistence for staff tasks derived from guest requests.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task, StayflowError>;

    async fn get(&self, task_id: &str) -> Result<Option<Task>, StayflowError>;

    /// Assigns a pending task to a staff member.
    async fn claim(&self, task_id: &str, staff_id: &str) -> Result<Task, StayflowError>;

    async fn complete(&self, task_id: &str) -> Result<Task, StayflowError>;

    async fn cancel(&self, task_id: &str) -> Result<Task, StayflowError>;
}
