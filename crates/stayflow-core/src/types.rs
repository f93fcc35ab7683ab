// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Stayflow workspace.
//!
//! Persistent entities (conversations, messages, tasks, approval items) carry
//! RFC 3339 string timestamps as stored; ephemeral pipeline types use typed
//! values and never hit the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A guest-facing messaging channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Whatsapp,
    Sms,
    Email,
    Webchat,
}

impl Channel {
    /// Channels whose external identity is a phone number. Guest
    /// identification and reservation matching only run for these.
    pub fn is_phone_keyed(self) -> bool {
        matches!(self, Channel::Whatsapp | Channel::Sms)
    }
}

/// Content type of a message body.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Audio,
    Document,
}

/// Staff department responsible for acting on a guest intent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Housekeeping,
    Maintenance,
    Concierge,
    RoomService,
    FrontDesk,
}

/// Task category derived from the guest's intent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Housekeeping,
    Maintenance,
    RoomService,
    Concierge,
    Other,
}

/// Task and routing priority. Ordering is `Low < Standard < High < Urgent`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Standard,
    High,
    Urgent,
}

impl Priority {
    /// One step toward `Urgent`. Elevating `Urgent` stays `Urgent`.
    pub fn elevated(self) -> Priority {
        match self {
            Priority::Low => Priority::Standard,
            Priority::Standard => Priority::High,
            Priority::High => Priority::Urgent,
            Priority::Urgent => Priority::Urgent,
        }
    }
}

/// Direction of a conversation message relative to the platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Who authored a conversation message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Guest,
    Ai,
    Staff,
}

/// Conversation lifecycle state. `Active -> Escalated` is one-way per
/// escalation event; staff resolve the conversation back out of `Escalated`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Active,
    Escalated,
    Resolved,
}

/// An inbound guest message as handed over by a channel adapter.
///
/// Consumed exactly once by the message processor; persisted as a
/// [`ConversationMessage`], never stored in this shape.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel-assigned message identifier.
    pub id: String,
    pub channel: Channel,
    /// Channel-specific sender identity (phone number, email address,
    /// webchat session token).
    pub channel_id: String,
    pub content: String,
    pub content_type: ContentType,
    pub timestamp: DateTime<Utc>,
    /// Raw channel payload, kept for audit and adapter-specific fields.
    pub raw: Option<serde_json::Value>,
}

/// Output of the AI responder for one inbound message.
#[derive(Debug, Clone)]
pub struct ResponderOutput {
    pub content: String,
    /// Dotted intent name (e.g. `request.maintenance`), if classified.
    pub intent: Option<String>,
    /// Classification confidence in `0.0..=1.0`.
    pub confidence: Option<f32>,
    /// Extracted entities (room numbers, dates, item names).
    pub entities: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

/// A classified guest intent, ready for routing and autonomy decisions.
///
/// Ephemeral: produced from [`ResponderOutput`] plus the taxonomy, consumed
/// by the task router and the autonomy engine within the same transaction.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub intent: String,
    pub confidence: f32,
    pub department: Option<Department>,
    pub requires_action: bool,
}

/// A known guest identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_vip: bool,
    pub created_at: String,
}

/// Router-facing guest context, recomputed per message from the guest and
/// reservation services. Not persisted as its own entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestContext {
    pub guest_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub room_number: Option<String>,
    pub is_vip: bool,
    pub loyalty_tier: Option<String>,
    pub language: Option<String>,
}

/// A persistent conversation, unique per `(channel, channel_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub channel: Channel,
    pub channel_id: String,
    pub guest_id: Option<String>,
    pub state: ConversationState,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub conversation_id: String,
    pub direction: Direction,
    pub sender_type: SenderType,
    pub content: String,
    pub content_type: ContentType,
    pub intent: Option<String>,
    pub confidence: Option<f32>,
    pub created_at: String,
}

/// Input for appending a message to a conversation.
#[derive(Debug, Clone)]
pub struct NewConversationMessage {
    pub direction: Direction,
    pub sender_type: SenderType,
    pub content: String,
    pub content_type: ContentType,
    pub intent: Option<String>,
    pub confidence: Option<f32>,
}

/// Task lifecycle status, mutated by staff through claim/complete.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

/// How a task came to exist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    Manual,
    Auto,
    Automation,
}

/// A persistent staff work item derived from a guest request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub task_type: TaskType,
    pub department: Department,
    pub room_number: Option<String>,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: Option<String>,
    pub source: TaskSource,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub task_type: TaskType,
    pub department: Department,
    pub room_number: Option<String>,
    pub description: String,
    pub priority: Priority,
    pub source: TaskSource,
}

/// What kind of deferred action an approval item holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Task,
    Response,
}

/// Approval item lifecycle. Terminal once `Approved` or `Rejected`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A deferred AI action awaiting a staff decision.
///
/// `action_data` is an opaque snapshot taken at deferral time. It is executed
/// verbatim on approval and never re-derived, so later changes in guest
/// context cannot retroactively alter what gets approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalItem {
    pub id: String,
    pub kind: ApprovalKind,
    pub action_type: String,
    pub action_data: serde_json::Value,
    pub conversation_id: String,
    pub guest_id: Option<String>,
    pub status: ApprovalStatus,
    pub decided_by: Option<String>,
    pub created_at: String,
    pub decided_at: Option<String>,
}

/// Input for queueing an action for approval.
#[derive(Debug, Clone)]
pub struct NewApprovalItem {
    pub kind: ApprovalKind,
    pub action_type: String,
    pub action_data: serde_json::Value,
    pub conversation_id: String,
    pub guest_id: Option<String>,
}

/// Typed pipeline outcome markers attached to an outbound message, in the
/// order they were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseAnnotation {
    TaskCreated { task_id: String },
    TaskPendingApproval { approval_id: String },
    Escalated { reasons: Vec<String> },
    ResponsePendingApproval { approval_id: String },
}

/// The single outbound message produced for one inbound message: either the
/// real AI answer or a pending-acknowledgement placeholder.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub conversation_id: String,
    pub content: String,
    pub content_type: ContentType,
    pub annotations: Vec<ResponseAnnotation>,
}
