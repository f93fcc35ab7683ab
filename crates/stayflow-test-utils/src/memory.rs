// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory service fakes for unit tests that don't want a database.
//!
//! Semantics mirror the SQLite stores: find-or-create converges per key,
//! `recent_messages` returns newest first, and approval decisions are
//! terminal.

use std::collections::HashMap;

use async_trait::async_trait;
use stayflow_core::error::StayflowError;
use stayflow_core::traits::{
    ApprovalStore, ConversationStore, GuestContextSource, GuestDirectory, TaskStore,
};
use stayflow_core::types::{
    ApprovalItem, ApprovalStatus, Channel, Conversation, ConversationMessage, ConversationState,
    Guest, GuestContext, NewApprovalItem, NewConversationMessage, NewTask, Task, TaskStatus,
};
use tokio::sync::Mutex;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Default)]
struct ConversationTable {
    by_key: HashMap<(Channel, String), Conversation>,
    messages: HashMap<String, Vec<ConversationMessage>>,
}

/// In-memory [`ConversationStore`].
#[derive(Default)]
pub struct InMemoryConversationStore {
    state: Mutex<ConversationTable>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find_or_create(
        &self,
        channel: Channel,
        channel_id: &str,
        guest_id: Option<&str>,
    ) -> Result<Conversation, StayflowError> {
        let mut state = self.state.lock().await;
        let key = (channel, channel_id.to_string());
        let conversation = state.by_key.entry(key).or_insert_with(|| Conversation {
            id: new_id(),
            channel,
            channel_id: channel_id.to_string(),
            guest_id: None,
            state: ConversationState::Active,
            created_at: now(),
            updated_at: now(),
        });
        if conversation.guest_id.is_none()
            && let Some(gid) = guest_id
        {
            conversation.guest_id = Some(gid.to_string());
        }
        Ok(conversation.clone())
    }

    async fn get(&self, conversation_id: &str) -> Result<Option<Conversation>, StayflowError> {
        let state = self.state.lock().await;
        Ok(state
            .by_key
            .values()
            .find(|c| c.id == conversation_id)
            .cloned())
    }

    async fn add_message(
        &self,
        conversation_id: &str,
        message: NewConversationMessage,
    ) -> Result<ConversationMessage, StayflowError> {
        let mut state = self.state.lock().await;
        let stored = ConversationMessage {
            id: new_id(),
            conversation_id: conversation_id.to_string(),
            direction: message.direction,
            sender_type: message.sender_type,
            content: message.content,
            content_type: message.content_type,
            intent: message.intent,
            confidence: message.confidence,
            created_at: now(),
        };
        state
            .messages
            .entry(conversation_id.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationMessage>, StayflowError> {
        let state = self.state.lock().await;
        let mut messages: Vec<ConversationMessage> = state
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default();
        messages.reverse();
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn set_state(
        &self,
        conversation_id: &str,
        new_state: ConversationState,
    ) -> Result<(), StayflowError> {
        let mut state = self.state.lock().await;
        let conversation = state
            .by_key
            .values_mut()
            .find(|c| c.id == conversation_id)
            .ok_or_else(|| StayflowError::NotFound {
                entity: "conversation",
                id: conversation_id.to_string(),
            })?;
        conversation.state = new_state;
        conversation.updated_at = now();
        Ok(())
    }
}

/// In-memory [`GuestDirectory`] with a profile-seeding helper.
#[derive(Default)]
pub struct InMemoryGuestDirectory {
    by_phone: Mutex<HashMap<String, Guest>>,
}

impl InMemoryGuestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a guest profile for a phone number.
    pub async fn seed(&self, phone: &str, first_name: Option<&str>, is_vip: bool) -> Guest {
        let mut by_phone = self.by_phone.lock().await;
        let guest = Guest {
            id: new_id(),
            phone: Some(phone.to_string()),
            first_name: first_name.map(|s| s.to_string()),
            last_name: None,
            is_vip,
            created_at: now(),
        };
        by_phone.insert(phone.to_string(), guest.clone());
        guest
    }
}

#[async_trait]
impl GuestDirectory for InMemoryGuestDirectory {
    async fn find_or_create_by_phone(&self, phone: &str) -> Result<Guest, StayflowError> {
        let mut by_phone = self.by_phone.lock().await;
        let guest = by_phone.entry(phone.to_string()).or_insert_with(|| Guest {
            id: new_id(),
            phone: Some(phone.to_string()),
            first_name: None,
            last_name: None,
            is_vip: false,
            created_at: now(),
        });
        Ok(guest.clone())
    }
}

/// In-memory [`GuestContextSource`] keyed by conversation.
#[derive(Default)]
pub struct InMemoryGuestContextSource {
    contexts: Mutex<HashMap<String, GuestContext>>,
    /// Phone-to-context templates used when a conversation is matched.
    by_phone: Mutex<HashMap<String, GuestContext>>,
}

impl InMemoryGuestContextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the context that matching this phone number should produce.
    pub async fn seed_phone(&self, phone: &str, context: GuestContext) {
        self.by_phone.lock().await.insert(phone.to_string(), context);
    }
}

#[async_trait]
impl GuestContextSource for InMemoryGuestContextSource {
    async fn match_conversation(
        &self,
        conversation_id: &str,
        phone: &str,
    ) -> Result<(), StayflowError> {
        if let Some(context) = self.by_phone.lock().await.get(phone).cloned() {
            self.contexts
                .lock()
                .await
                .entry(conversation_id.to_string())
                .or_insert(context);
        }
        Ok(())
    }

    async fn context_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<GuestContext>, StayflowError> {
        Ok(self.contexts.lock().await.get(conversation_id).cloned())
    }
}

/// In-memory [`TaskStore`].
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored tasks, insertion order not guaranteed.
    pub async fn all(&self) -> Vec<Task> {
        self.tasks.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, input: NewTask) -> Result<Task, StayflowError> {
        let task = Task {
            id: new_id(),
            conversation_id: input.conversation_id,
            message_id: input.message_id,
            task_type: input.task_type,
            department: input.department,
            room_number: input.room_number,
            description: input.description,
            priority: input.priority,
            status: TaskStatus::Pending,
            assigned_to: None,
            source: input.source,
            created_at: now(),
            updated_at: now(),
        };
        self.tasks.lock().await.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn get(&self, task_id: &str) -> Result<Option<Task>, StayflowError> {
        Ok(self.tasks.lock().await.get(task_id).cloned())
    }

    async fn claim(&self, task_id: &str, staff_id: &str) -> Result<Task, StayflowError> {
        self.transition(task_id, TaskStatus::Assigned, Some(staff_id)).await
    }

    async fn complete(&self, task_id: &str) -> Result<Task, StayflowError> {
        self.transition(task_id, TaskStatus::Completed, None).await
    }

    async fn cancel(&self, task_id: &str) -> Result<Task, StayflowError> {
        self.transition(task_id, TaskStatus::Cancelled, None).await
    }
}

impl InMemoryTaskStore {
    async fn transition(
        &self,
        task_id: &str,
        status: TaskStatus,
        assigned_to: Option<&str>,
    ) -> Result<Task, StayflowError> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks.get_mut(task_id).ok_or_else(|| StayflowError::NotFound {
            entity: "task",
            id: task_id.to_string(),
        })?;
        task.status = status;
        if let Some(staff) = assigned_to {
            task.assigned_to = Some(staff.to_string());
        }
        task.updated_at = now();
        Ok(task.clone())
    }
}

/// In-memory [`ApprovalStore`] with terminal decisions.
#[derive(Default)]
pub struct InMemoryApprovalStore {
    items: Mutex<Vec<ApprovalItem>>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApprovalStore for InMemoryApprovalStore {
    async fn insert(&self, input: NewApprovalItem) -> Result<ApprovalItem, StayflowError> {
        let item = ApprovalItem {
            id: new_id(),
            kind: input.kind,
            action_type: input.action_type,
            action_data: input.action_data,
            conversation_id: input.conversation_id,
            guest_id: input.guest_id,
            status: ApprovalStatus::Pending,
            decided_by: None,
            created_at: now(),
            decided_at: None,
        };
        self.items.lock().await.push(item.clone());
        Ok(item)
    }

    async fn get(&self, item_id: &str) -> Result<Option<ApprovalItem>, StayflowError> {
        Ok(self
            .items
            .lock()
            .await
            .iter()
            .find(|i| i.id == item_id)
            .cloned())
    }

    async fn mark_decided(
        &self,
        item_id: &str,
        status: ApprovalStatus,
        decided_by: &str,
    ) -> Result<ApprovalItem, StayflowError> {
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| StayflowError::NotFound {
                entity: "approval",
                id: item_id.to_string(),
            })?;
        if item.status != ApprovalStatus::Pending {
            return Err(StayflowError::InvalidState(format!(
                "approval {item_id} already decided ({})",
                item.status
            )));
        }
        item.status = status;
        item.decided_by = Some(decided_by.to_string());
        item.decided_at = Some(now());
        Ok(item.clone())
    }

    async fn pending(&self, limit: u32) -> Result<Vec<ApprovalItem>, StayflowError> {
        Ok(self
            .items
            .lock()
            .await
            .iter()
            .filter(|i| i.status == ApprovalStatus::Pending)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_find_or_create_converges() {
        let store = InMemoryConversationStore::new();
        let a = store
            .find_or_create(Channel::Webchat, "session-1", None)
            .await
            .unwrap();
        let b = store
            .find_or_create(Channel::Webchat, "session-1", Some("guest-1"))
            .await
            .unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.guest_id.as_deref(), Some("guest-1"));
    }

    #[tokio::test]
    async fn in_memory_recent_is_newest_first() {
        let store = InMemoryConversationStore::new();
        let conv = store
            .find_or_create(Channel::Sms, "+15550001111", None)
            .await
            .unwrap();
        for content in ["one", "two", "three"] {
            store
                .add_message(
                    &conv.id,
                    NewConversationMessage {
                        direction: stayflow_core::types::Direction::Inbound,
                        sender_type: stayflow_core::types::SenderType::Guest,
                        content: content.into(),
                        content_type: stayflow_core::types::ContentType::Text,
                        intent: None,
                        confidence: None,
                    },
                )
                .await
                .unwrap();
        }
        let recent = store.recent_messages(&conv.id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "three");
    }

    #[tokio::test]
    async fn in_memory_approval_decisions_are_terminal() {
        let store = InMemoryApprovalStore::new();
        let item = store
            .insert(NewApprovalItem {
                kind: stayflow_core::types::ApprovalKind::Response,
                action_type: "respond_to_guest".into(),
                action_data: serde_json::json!({"content": "x"}),
                conversation_id: "c".into(),
                guest_id: None,
            })
            .await
            .unwrap();
        store
            .mark_decided(&item.id, ApprovalStatus::Approved, "staff")
            .await
            .unwrap();
        assert!(
            store
                .mark_decided(&item.id, ApprovalStatus::Rejected, "staff")
                .await
                .is_err()
        );
    }
}
