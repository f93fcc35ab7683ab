// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementations of the core service traits.
//!
//! Each store is a thin handle over the shared [`Database`]; all stores are
//! cheap to clone and safe for concurrent use (writes serialize through the
//! single tokio-rusqlite thread).

use async_trait::async_trait;
use stayflow_core::error::StayflowError;
use stayflow_core::traits::{
    ApprovalStore, ConversationStore, GuestContextSource, GuestDirectory, TaskStore,
};
use stayflow_core::types::{
    ApprovalItem, ApprovalStatus, Channel, Conversation, ConversationMessage, ConversationState,
    Guest, GuestContext, NewApprovalItem, NewConversationMessage, NewTask, Task, TaskStatus,
};

use crate::database::Database;
use crate::queries;

/// Conversation persistence over SQLite.
#[derive(Clone)]
pub struct SqliteConversationStore {
    db: Database,
}

impl SqliteConversationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn find_or_create(
        &self,
        channel: Channel,
        channel_id: &str,
        guest_id: Option<&str>,
    ) -> Result<Conversation, StayflowError> {
        queries::conversations::find_or_create(&self.db, channel, channel_id, guest_id).await
    }

    async fn get(&self, conversation_id: &str) -> Result<Option<Conversation>, StayflowError> {
        queries::conversations::get(&self.db, conversation_id).await
    }

    async fn add_message(
        &self,
        conversation_id: &str,
        message: NewConversationMessage,
    ) -> Result<ConversationMessage, StayflowError> {
        let stored = ConversationMessage {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            direction: message.direction,
            sender_type: message.sender_type,
            content: message.content,
            content_type: message.content_type,
            intent: message.intent,
            confidence: message.confidence,
            created_at: queries::now_rfc3339(),
        };
        queries::messages::insert(&self.db, &stored).await?;
        Ok(stored)
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationMessage>, StayflowError> {
        queries::messages::recent(&self.db, conversation_id, limit).await
    }

    async fn set_state(
        &self,
        conversation_id: &str,
        state: ConversationState,
    ) -> Result<(), StayflowError> {
        queries::conversations::set_state(&self.db, conversation_id, state).await
    }
}

/// Guest identity lookup over SQLite.
#[derive(Clone)]
pub struct SqliteGuestDirectory {
    db: Database,
}

impl SqliteGuestDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Seed/admin helper: update profile fields for a known guest.
    pub async fn update_profile(
        &self,
        guest_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        is_vip: bool,
    ) -> Result<(), StayflowError> {
        queries::guests::update_profile(&self.db, guest_id, first_name, last_name, is_vip).await
    }
}

#[async_trait]
impl GuestDirectory for SqliteGuestDirectory {
    async fn find_or_create_by_phone(&self, phone: &str) -> Result<Guest, StayflowError> {
        queries::guests::find_or_create_by_phone(&self.db, phone).await
    }
}

/// Guest-context matching over SQLite.
#[derive(Clone)]
pub struct SqliteGuestContextSource {
    db: Database,
}

impl SqliteGuestContextSource {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// PMS/seed helper: record stay details for a matched conversation.
    pub async fn set_stay_details(
        &self,
        conversation_id: &str,
        room_number: Option<&str>,
        loyalty_tier: Option<&str>,
        language: Option<&str>,
    ) -> Result<(), StayflowError> {
        queries::contexts::set_stay_details(
            &self.db,
            conversation_id,
            room_number,
            loyalty_tier,
            language,
        )
        .await
    }
}

#[async_trait]
impl GuestContextSource for SqliteGuestContextSource {
    async fn match_conversation(
        &self,
        conversation_id: &str,
        phone: &str,
    ) -> Result<(), StayflowError> {
        queries::contexts::match_conversation(&self.db, conversation_id, phone).await
    }

    async fn context_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<GuestContext>, StayflowError> {
        queries::contexts::context_for_conversation(&self.db, conversation_id).await
    }
}

/// Task persistence over SQLite.
#[derive(Clone)]
pub struct SqliteTaskStore {
    db: Database,
}

impl SqliteTaskStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task, StayflowError> {
        queries::tasks::insert(&self.db, task).await
    }

    async fn get(&self, task_id: &str) -> Result<Option<Task>, StayflowError> {
        queries::tasks::get(&self.db, task_id).await
    }

    async fn claim(&self, task_id: &str, staff_id: &str) -> Result<Task, StayflowError> {
        queries::tasks::update_status(&self.db, task_id, TaskStatus::Assigned, Some(staff_id))
            .await
    }

    async fn complete(&self, task_id: &str) -> Result<Task, StayflowError> {
        queries::tasks::update_status(&self.db, task_id, TaskStatus::Completed, None).await
    }

    async fn cancel(&self, task_id: &str) -> Result<Task, StayflowError> {
        queries::tasks::update_status(&self.db, task_id, TaskStatus::Cancelled, None).await
    }
}

/// Approval item persistence over SQLite.
#[derive(Clone)]
pub struct SqliteApprovalStore {
    db: Database,
}

impl SqliteApprovalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApprovalStore for SqliteApprovalStore {
    async fn insert(&self, item: NewApprovalItem) -> Result<ApprovalItem, StayflowError> {
        queries::approvals::insert(&self.db, item).await
    }

    async fn get(&self, item_id: &str) -> Result<Option<ApprovalItem>, StayflowError> {
        queries::approvals::get(&self.db, item_id).await
    }

    async fn mark_decided(
        &self,
        item_id: &str,
        status: ApprovalStatus,
        decided_by: &str,
    ) -> Result<ApprovalItem, StayflowError> {
        queries::approvals::mark_decided(&self.db, item_id, status, decided_by).await
    }

    async fn pending(&self, limit: u32) -> Result<Vec<ApprovalItem>, StayflowError> {
        queries::approvals::pending(&self.db, limit).await
    }
}
