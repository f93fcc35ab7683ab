// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval queue: durable holding area for deferred AI actions.
//!
//! Actions that the autonomy policy refused to auto-execute are queued here
//! with an opaque `action_data` snapshot. A staff decision later either
//! executes the snapshot verbatim (approve) or discards it (reject). The
//! queue never re-derives `action_data`: what staff approved is exactly what
//! runs, regardless of how the guest's context changed in the meantime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stayflow_bus::{Event, EventBus};
use stayflow_core::error::StayflowError;
use stayflow_core::traits::{ApprovalStore, ConversationStore, TaskStore};
use stayflow_core::types::{
    ApprovalItem, ApprovalKind, ApprovalStatus, ContentType, ConversationMessage, Direction,
    NewApprovalItem, NewConversationMessage, NewTask, Task,
};
use tracing::{error, info};

/// Snapshot payload for a deferred task creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAction {
    pub task: NewTask,
}

/// Snapshot payload for a deferred guest reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseAction {
    pub content: String,
    pub intent: Option<String>,
    pub confidence: Option<f32>,
    /// Flagged when classification confidence was below the urgent-review
    /// threshold at deferral time.
    pub urgent_review: bool,
}

/// A staff decision on a pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// What executing (or discarding) a decision produced.
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    Rejected(ApprovalItem),
    TaskCreated(Task),
    ResponseReleased(ConversationMessage),
}

/// Queues deferred actions and executes staff decisions.
pub struct ApprovalQueue {
    approvals: Arc<dyn ApprovalStore>,
    tasks: Arc<dyn TaskStore>,
    conversations: Arc<dyn ConversationStore>,
    bus: EventBus,
}

impl ApprovalQueue {
    pub fn new(
        approvals: Arc<dyn ApprovalStore>,
        tasks: Arc<dyn TaskStore>,
        conversations: Arc<dyn ConversationStore>,
        bus: EventBus,
    ) -> Self {
        Self {
            approvals,
            tasks,
            conversations,
            bus,
        }
    }

    /// Queue an action for staff approval. The item starts `pending`.
    pub async fn queue(&self, item: NewApprovalItem) -> Result<ApprovalItem, StayflowError> {
        let stored = self.approvals.insert(item).await?;
        info!(
            approval_id = stored.id.as_str(),
            kind = %stored.kind,
            action_type = stored.action_type.as_str(),
            conversation_id = stored.conversation_id.as_str(),
            "action queued for approval"
        );
        Ok(stored)
    }

    /// Oldest pending items first, for the staff review surface.
    pub async fn pending(&self, limit: u32) -> Result<Vec<ApprovalItem>, StayflowError> {
        self.approvals.pending(limit).await
    }

    /// Apply a staff decision to a pending item.
    ///
    /// The item is marked decided before the deferred action runs, so a
    /// racing second decision fails with `InvalidState` instead of executing
    /// twice. Approval executes the stored snapshot verbatim.
    pub async fn decide(
        &self,
        item_id: &str,
        decision: ApprovalDecision,
        decided_by: &str,
    ) -> Result<DecisionOutcome, StayflowError> {
        let status = match decision {
            ApprovalDecision::Approve => ApprovalStatus::Approved,
            ApprovalDecision::Reject => ApprovalStatus::Rejected,
        };

        let item = self.approvals.mark_decided(item_id, status, decided_by).await?;

        info!(
            approval_id = item.id.as_str(),
            status = %item.status,
            decided_by,
            "approval decided"
        );

        if decision == ApprovalDecision::Reject {
            return Ok(DecisionOutcome::Rejected(item));
        }

        match item.kind {
            ApprovalKind::Task => self.execute_task(&item).await,
            ApprovalKind::Response => self.execute_response(&item).await,
        }
    }

    async fn execute_task(&self, item: &ApprovalItem) -> Result<DecisionOutcome, StayflowError> {
        let action: TaskAction = serde_json::from_value(item.action_data.clone())
            .map_err(|e| malformed_action(&item.id, e))?;

        let task = self.tasks.create(action.task).await?;
        self.bus.emit(Event::TaskCreated {
            task_id: task.id.clone(),
            department: task.department,
            priority: task.priority,
        });

        info!(
            approval_id = item.id.as_str(),
            task_id = task.id.as_str(),
            "deferred task created on approval"
        );
        Ok(DecisionOutcome::TaskCreated(task))
    }

    async fn execute_response(
        &self,
        item: &ApprovalItem,
    ) -> Result<DecisionOutcome, StayflowError> {
        let action: ResponseAction = serde_json::from_value(item.action_data.clone())
            .map_err(|e| malformed_action(&item.id, e))?;

        let message = self
            .conversations
            .add_message(
                &item.conversation_id,
                NewConversationMessage {
                    direction: Direction::Outbound,
                    sender_type: stayflow_core::types::SenderType::Ai,
                    content: action.content,
                    content_type: ContentType::Text,
                    intent: action.intent,
                    confidence: action.confidence,
                },
            )
            .await?;

        self.bus.emit(Event::MessageSent {
            conversation_id: item.conversation_id.clone(),
            message_id: message.id.clone(),
        });

        info!(
            approval_id = item.id.as_str(),
            message_id = message.id.as_str(),
            "held response released on approval"
        );
        Ok(DecisionOutcome::ResponseReleased(message))
    }
}

fn malformed_action(item_id: &str, e: serde_json::Error) -> StayflowError {
    error!(approval_id = item_id, error = %e, "malformed approval action data");
    StayflowError::Internal(format!("malformed action data for approval {item_id}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stayflow_core::types::{Channel, Department, Priority, TaskSource, TaskType};
    use stayflow_test_utils::{InMemoryApprovalStore, InMemoryConversationStore, InMemoryTaskStore};

    fn queue_with_stores() -> (ApprovalQueue, Arc<InMemoryConversationStore>, EventBus) {
        let approvals = Arc::new(InMemoryApprovalStore::new());
        let tasks = Arc::new(InMemoryTaskStore::new());
        let conversations = Arc::new(InMemoryConversationStore::new());
        let bus = EventBus::new();
        let queue = ApprovalQueue::new(approvals, tasks, conversations.clone(), bus.clone());
        (queue, conversations, bus)
    }

    fn new_task() -> NewTask {
        NewTask {
            conversation_id: Some("conv-1".into()),
            message_id: None,
            task_type: TaskType::Housekeeping,
            department: Department::Housekeeping,
            room_number: Some("305".into()),
            description: "bring towels to room 305".into(),
            priority: Priority::Standard,
            source: TaskSource::Auto,
        }
    }

    #[tokio::test]
    async fn queued_item_starts_pending() {
        let (queue, _, _) = queue_with_stores();
        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Task,
                action_type: "create_housekeeping_task".into(),
                action_data: serde_json::to_value(TaskAction { task: new_task() }).unwrap(),
                conversation_id: "conv-1".into(),
                guest_id: None,
            })
            .await
            .unwrap();

        assert_eq!(item.status, ApprovalStatus::Pending);
        assert_eq!(queue.pending(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approving_task_item_creates_the_snapshot_task() {
        let (queue, _, bus) = queue_with_stores();
        let mut rx = bus.subscribe();

        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Task,
                action_type: "create_housekeeping_task".into(),
                action_data: serde_json::to_value(TaskAction { task: new_task() }).unwrap(),
                conversation_id: "conv-1".into(),
                guest_id: None,
            })
            .await
            .unwrap();

        let outcome = queue
            .decide(&item.id, ApprovalDecision::Approve, "staff-7")
            .await
            .unwrap();

        let DecisionOutcome::TaskCreated(task) = outcome else {
            panic!("expected a created task");
        };
        assert_eq!(task.description, "bring towels to room 305");
        assert_eq!(task.department, Department::Housekeeping);
        assert!(matches!(rx.recv().await.unwrap(), Event::TaskCreated { .. }));
    }

    #[tokio::test]
    async fn approving_response_item_releases_the_held_content() {
        let (queue, conversations, _) = queue_with_stores();
        let conv = conversations
            .find_or_create(Channel::Whatsapp, "+15550001111", None)
            .await
            .unwrap();

        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Response,
                action_type: "respond_to_guest".into(),
                action_data: serde_json::to_value(ResponseAction {
                    content: "Engineering is on the way.".into(),
                    intent: Some("request.maintenance.ac".into()),
                    confidence: Some(0.9),
                    urgent_review: false,
                })
                .unwrap(),
                conversation_id: conv.id.clone(),
                guest_id: None,
            })
            .await
            .unwrap();

        let outcome = queue
            .decide(&item.id, ApprovalDecision::Approve, "staff-1")
            .await
            .unwrap();

        let DecisionOutcome::ResponseReleased(message) = outcome else {
            panic!("expected a released response");
        };
        assert_eq!(message.content, "Engineering is on the way.");
        assert_eq!(message.sender_type, stayflow_core::types::SenderType::Ai);
    }

    #[tokio::test]
    async fn rejecting_discards_without_executing() {
        let (queue, conversations, _) = queue_with_stores();
        let conv = conversations
            .find_or_create(Channel::Sms, "+15550002222", None)
            .await
            .unwrap();

        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Response,
                action_type: "respond_to_guest".into(),
                action_data: serde_json::to_value(ResponseAction {
                    content: "hidden".into(),
                    intent: None,
                    confidence: None,
                    urgent_review: true,
                })
                .unwrap(),
                conversation_id: conv.id.clone(),
                guest_id: None,
            })
            .await
            .unwrap();

        let outcome = queue
            .decide(&item.id, ApprovalDecision::Reject, "staff-2")
            .await
            .unwrap();
        assert!(matches!(outcome, DecisionOutcome::Rejected(_)));

        // Nothing was appended to the conversation.
        let messages = conversations.recent_messages(&conv.id, 10).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn deciding_twice_is_an_error() {
        let (queue, _, _) = queue_with_stores();
        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Task,
                action_type: "create_housekeeping_task".into(),
                action_data: serde_json::to_value(TaskAction { task: new_task() }).unwrap(),
                conversation_id: "conv-1".into(),
                guest_id: None,
            })
            .await
            .unwrap();

        queue
            .decide(&item.id, ApprovalDecision::Reject, "staff-1")
            .await
            .unwrap();
        let err = queue
            .decide(&item.id, ApprovalDecision::Approve, "staff-2")
            .await
            .unwrap_err();
        assert!(matches!(err, StayflowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn malformed_action_data_is_an_internal_error() {
        let (queue, _, _) = queue_with_stores();
        let item = queue
            .queue(NewApprovalItem {
                kind: ApprovalKind::Task,
                action_type: "create_housekeeping_task".into(),
                action_data: json!({"not": "a task"}),
                conversation_id: "conv-1".into(),
                guest_id: None,
            })
            .await
            .unwrap();

        let err = queue
            .decide(&item.id, ApprovalDecision::Approve, "staff-1")
            .await
            .unwrap_err();
        assert!(matches!(err, StayflowError::Internal(_)));
    }
}
