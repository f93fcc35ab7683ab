// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message processor: one guest-message-in, one response-out.
//!
//! Composes guest identification, conversation state, task routing,
//! escalation, and the autonomy/approval gate in a fixed order. Each step
//! tolerates failure of best-effort enrichment (guest identity, context
//! matching) and side effects (task creation); only conversation persistence
//! and the responder call propagate. The channel adapter layer owns the
//! generic-apology fallback for propagated failures.
//!
//! Every inbound message produces exactly one outbound message: either the
//! real AI answer or a contextual pending-acknowledgement placeholder.

use std::sync::Arc;

use dashmap::DashMap;
use stayflow_approval::{ApprovalQueue, ResponseAction, TaskAction};
use stayflow_autonomy::{AutonomyEngine, ConfidenceGate};
use stayflow_bus::{Event, EventBus};
use stayflow_core::error::StayflowError;
use stayflow_core::traits::{
    ConversationStore, GuestContextSource, GuestDirectory, Responder, TaskStore,
};
use stayflow_core::types::{
    ApprovalKind, ClassificationResult, ContentType, Conversation, Direction, Guest,
    GuestContext, InboundMessage, NewApprovalItem, NewConversationMessage, NewTask,
    OutboundMessage, ResponseAnnotation, SenderType, TaskSource, TaskType,
};
use stayflow_escalation::EscalationEngine;
use stayflow_router::TaskRouter;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::templates;

/// Notice appended (never replacing) when a conversation escalates.
const ESCALATION_NOTICE: &str =
    "\n\nI've also brought in our team. A member of staff will follow up with you shortly.";

/// Action name for the reply autonomy gate.
const RESPOND_ACTION: &str = "respond_to_guest";

/// Orchestrates the full inbound-message transaction.
///
/// Constructed once at process start with explicit dependencies; holds no
/// per-call mutable state, so one instance serves all channels concurrently.
pub struct MessageProcessor {
    conversations: Arc<dyn ConversationStore>,
    guests: Arc<dyn GuestDirectory>,
    guest_contexts: Arc<dyn GuestContextSource>,
    tasks: Arc<dyn TaskStore>,
    responder: Arc<dyn Responder>,
    router: TaskRouter,
    escalation: EscalationEngine,
    autonomy: Arc<AutonomyEngine>,
    approvals: Arc<ApprovalQueue>,
    bus: EventBus,
    /// Per-(channel, channel_id) locks serializing conversation creation and
    /// inbound persistence. Entries live for the process lifetime; the key
    /// space is bounded by active guest identities.
    conversation_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MessageProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        guests: Arc<dyn GuestDirectory>,
        guest_contexts: Arc<dyn GuestContextSource>,
        tasks: Arc<dyn TaskStore>,
        responder: Arc<dyn Responder>,
        router: TaskRouter,
        escalation: EscalationEngine,
        autonomy: Arc<AutonomyEngine>,
        approvals: Arc<ApprovalQueue>,
        bus: EventBus,
    ) -> Self {
        Self {
            conversations,
            guests,
            guest_contexts,
            tasks,
            responder,
            router,
            escalation,
            autonomy,
            approvals,
            bus,
            conversation_locks: DashMap::new(),
        }
    }

    /// Process one inbound guest message into exactly one outbound message.
    ///
    /// Returns the final response or a pending-approval placeholder. Policy
    /// outcomes (no task, escalated, pending approval) are represented in the
    /// returned annotations, never as errors; only infrastructure failures
    /// from conversation persistence or the responder propagate.
    pub async fn process(&self, inbound: InboundMessage) -> Result<OutboundMessage, StayflowError> {
        // Step 1: identify the guest. Phone-keyed channels only; failure is
        // logged and processing continues without an identity.
        let guest = self.identify_guest(&inbound).await;

        // Steps 2-4 run under a per-identity lock so two racing messages for
        // the same guest cannot create duplicate conversations or interleave
        // their inbound appends.
        let lock = self.conversation_lock(&inbound);
        let (conversation, guest_context, inbound_message_id) = {
            let _guard = lock.lock().await;

            // Step 2: find-or-create the conversation. The anchor for all
            // later persistence; failure propagates.
            let conversation = self
                .conversations
                .find_or_create(
                    inbound.channel,
                    &inbound.channel_id,
                    guest.as_ref().map(|g| g.id.as_str()),
                )
                .await?;

            // Step 3: match guest/reservation context, best effort.
            let guest_context = self.match_context(&inbound, &conversation).await;

            // Step 4: persist the inbound message.
            let stored = self
                .conversations
                .add_message(
                    &conversation.id,
                    NewConversationMessage {
                        direction: Direction::Inbound,
                        sender_type: SenderType::Guest,
                        content: inbound.content.clone(),
                        content_type: inbound.content_type,
                        intent: None,
                        confidence: None,
                    },
                )
                .await?;

            self.bus.emit(Event::MessageReceived {
                conversation_id: conversation.id.clone(),
                message_id: stored.id.clone(),
                channel: inbound.channel,
            });

            (conversation, guest_context, stored.id)
        };

        // Step 5: generate the AI response. Not caught here: the adapter
        // layer substitutes the generic apology on failure.
        let response = self
            .responder
            .generate(&conversation, &inbound, guest_context.as_ref())
            .await?;

        let mut content = response.content.clone();
        let mut annotations: Vec<ResponseAnnotation> = Vec::new();

        // Step 6: task routing.
        if let Some(intent) = response.intent.as_deref() {
            self.route_task(
                &inbound,
                &conversation,
                &inbound_message_id,
                guest_context.as_ref(),
                intent,
                response.confidence,
                &mut annotations,
            )
            .await;
        }

        // Step 7: escalation check, always run regardless of task outcome.
        self.check_escalation(
            &inbound,
            &conversation,
            response.confidence,
            &mut content,
            &mut annotations,
        )
        .await;

        // Step 8: autonomy gate on the reply itself. Both checks must allow.
        let policy_allows = self
            .autonomy
            .can_auto_execute(RESPOND_ACTION, guest_context.as_ref())
            .await?;
        let confidence_gate = self
            .autonomy
            .should_auto_execute_by_confidence(response.confidence)
            .await?;

        if !policy_allows || confidence_gate == ConfidenceGate::ApprovalRequired {
            return self
                .hold_for_approval(
                    &conversation,
                    guest.as_ref(),
                    guest_context.as_ref(),
                    &response.intent,
                    response.confidence,
                    content,
                    annotations,
                )
                .await;
        }

        // Step 9: persist the outbound message and return the final reply.
        let outbound = self
            .conversations
            .add_message(
                &conversation.id,
                NewConversationMessage {
                    direction: Direction::Outbound,
                    sender_type: SenderType::Ai,
                    content: content.clone(),
                    content_type: ContentType::Text,
                    intent: response.intent.clone(),
                    confidence: response.confidence,
                },
            )
            .await?;

        self.bus.emit(Event::MessageSent {
            conversation_id: conversation.id.clone(),
            message_id: outbound.id,
        });

        info!(
            conversation_id = conversation.id.as_str(),
            channel = %inbound.channel,
            intent = response.intent.as_deref().unwrap_or("-"),
            annotations = annotations.len(),
            "message processed"
        );

        Ok(OutboundMessage {
            conversation_id: conversation.id,
            content,
            content_type: ContentType::Text,
            annotations,
        })
    }

    async fn identify_guest(&self, inbound: &InboundMessage) -> Option<Guest> {
        if !inbound.channel.is_phone_keyed() {
            return None;
        }
        match self.guests.find_or_create_by_phone(&inbound.channel_id).await {
            Ok(guest) => Some(guest),
            Err(e) => {
                warn!(
                    channel = %inbound.channel,
                    error = %e,
                    "guest identification failed, continuing without identity"
                );
                None
            }
        }
    }

    async fn match_context(
        &self,
        inbound: &InboundMessage,
        conversation: &Conversation,
    ) -> Option<GuestContext> {
        if !inbound.channel.is_phone_keyed() {
            return None;
        }

        if let Err(e) = self
            .guest_contexts
            .match_conversation(&conversation.id, &inbound.channel_id)
            .await
        {
            warn!(
                conversation_id = conversation.id.as_str(),
                error = %e,
                "guest context matching failed, continuing without context"
            );
        }

        match self
            .guest_contexts
            .context_for_conversation(&conversation.id)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!(
                    conversation_id = conversation.id.as_str(),
                    error = %e,
                    "guest context lookup failed, continuing without context"
                );
                None
            }
        }
    }

    /// Step 6: consult the router, then either create the task directly or
    /// defer it through the approval queue. No failure here may affect the
    /// guest-visible reply.
    #[allow(clippy::too_many_arguments)]
    async fn route_task(
        &self,
        inbound: &InboundMessage,
        conversation: &Conversation,
        inbound_message_id: &str,
        guest_context: Option<&GuestContext>,
        intent: &str,
        confidence: Option<f32>,
        annotations: &mut Vec<ResponseAnnotation>,
    ) {
        let Some(confidence) = confidence else {
            debug!(intent, "no confidence reported, skipping task routing");
            return;
        };

        let definition = stayflow_taxonomy::definition(intent);
        let classification = ClassificationResult {
            intent: intent.to_string(),
            confidence,
            department: definition.and_then(|d| d.department),
            requires_action: definition.is_some_and(|d| d.requires_action),
        };

        let default_context = GuestContext::default();
        let router_context = guest_context.unwrap_or(&default_context);
        let decision = self.router.process(&classification, router_context);

        if !decision.should_create_task {
            return;
        }
        let Some(department) = decision.department else {
            return;
        };

        let task = NewTask {
            conversation_id: Some(conversation.id.to_string()),
            message_id: Some(inbound_message_id.to_string()),
            task_type: decision.task_type.unwrap_or(TaskType::Other),
            department,
            room_number: guest_context.and_then(|c| c.room_number.clone()),
            // The literal guest message is more actionable for staff than the
            // taxonomy's generic description.
            description: inbound.content.clone(),
            priority: decision.priority,
            source: TaskSource::Auto,
        };

        let action_type = format!("create_{department}_task");

        let allowed = match self.autonomy.can_auto_execute(&action_type, guest_context).await {
            Ok(allowed) => allowed,
            Err(e) => {
                error!(action_type, error = %e, "autonomy check failed, skipping task");
                return;
            }
        };

        if allowed {
            match self.tasks.create(task).await {
                Ok(created) => {
                    self.bus.emit(Event::TaskCreated {
                        task_id: created.id.clone(),
                        department: created.department,
                        priority: created.priority,
                    });
                    info!(
                        task_id = created.id.as_str(),
                        department = %created.department,
                        priority = %created.priority,
                        "task created"
                    );
                    annotations.push(ResponseAnnotation::TaskCreated {
                        task_id: created.id,
                    });
                }
                Err(e) => {
                    // The guest still gets their answer even if this failed.
                    error!(
                        conversation_id = conversation.id.as_str(),
                        error = %e,
                        "task creation failed"
                    );
                }
            }
            return;
        }

        let action_data = match serde_json::to_value(TaskAction { task }) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "task action serialization failed, skipping deferral");
                return;
            }
        };

        match self
            .approvals
            .queue(NewApprovalItem {
                kind: ApprovalKind::Task,
                action_type,
                action_data,
                conversation_id: conversation.id.to_string(),
                guest_id: guest_context.map(|c| c.guest_id.clone()),
            })
            .await
        {
            Ok(item) => {
                annotations.push(ResponseAnnotation::TaskPendingApproval {
                    approval_id: item.id,
                });
            }
            Err(e) => {
                error!(
                    conversation_id = conversation.id.as_str(),
                    error = %e,
                    "task approval deferral failed"
                );
            }
        }
    }

    /// Step 7: escalation is side-effecting but never fatal. The notice is
    /// appended so the AI's substantive answer survives as a prefix.
    async fn check_escalation(
        &self,
        inbound: &InboundMessage,
        conversation: &Conversation,
        confidence: Option<f32>,
        content: &mut String,
        annotations: &mut Vec<ResponseAnnotation>,
    ) {
        let decision = match self
            .escalation
            .should_escalate(&conversation.id, &inbound.content, confidence)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                error!(
                    conversation_id = conversation.id.as_str(),
                    error = %e,
                    "escalation check failed"
                );
                return;
            }
        };

        if !decision.should_escalate {
            return;
        }

        if let Err(e) = self
            .conversations
            .set_state(&conversation.id, stayflow_core::types::ConversationState::Escalated)
            .await
        {
            error!(
                conversation_id = conversation.id.as_str(),
                error = %e,
                "escalation state transition failed"
            );
        }

        let reasons: Vec<String> = decision.reasons.iter().map(ToString::to_string).collect();
        self.bus.emit(Event::ConversationEscalated {
            conversation_id: conversation.id.to_string(),
            reasons: reasons.clone(),
        });

        info!(
            conversation_id = conversation.id.as_str(),
            priority = %decision.priority,
            ?reasons,
            "conversation escalated"
        );

        content.push_str(ESCALATION_NOTICE);
        annotations.push(ResponseAnnotation::Escalated { reasons });
    }

    /// Step 8 denial path: snapshot the real reply into the approval queue
    /// and give the guest a contextual acknowledgement. The real content
    /// stays hidden until staff approve it.
    #[allow(clippy::too_many_arguments)]
    async fn hold_for_approval(
        &self,
        conversation: &Conversation,
        guest: Option<&Guest>,
        guest_context: Option<&GuestContext>,
        intent: &Option<String>,
        confidence: Option<f32>,
        content: String,
        mut annotations: Vec<ResponseAnnotation>,
    ) -> Result<OutboundMessage, StayflowError> {
        let urgent_review = self.autonomy.requires_urgent_review(confidence).await?;

        let action = ResponseAction {
            content,
            intent: intent.clone(),
            confidence,
            urgent_review,
        };
        let action_data = serde_json::to_value(&action)
            .map_err(|e| StayflowError::Internal(format!("response snapshot failed: {e}")))?;

        // Losing the snapshot would strand the real reply, so this failure
        // propagates unlike the task-side deferral.
        let item = self
            .approvals
            .queue(NewApprovalItem {
                kind: ApprovalKind::Response,
                action_type: RESPOND_ACTION.to_string(),
                action_data,
                conversation_id: conversation.id.to_string(),
                guest_id: guest_context
                    .map(|c| c.guest_id.clone())
                    .or_else(|| guest.map(|g| g.id.clone())),
            })
            .await?;

        annotations.push(ResponseAnnotation::ResponsePendingApproval {
            approval_id: item.id.clone(),
        });

        let first_name = guest_context
            .and_then(|c| c.first_name.clone())
            .or_else(|| guest.and_then(|g| g.first_name.clone()));
        let placeholder = templates::pending_reply(intent.as_deref(), first_name.as_deref());

        self.conversations
            .add_message(
                &conversation.id,
                NewConversationMessage {
                    direction: Direction::Outbound,
                    sender_type: SenderType::Ai,
                    content: placeholder.clone(),
                    content_type: ContentType::Text,
                    intent: intent.clone(),
                    confidence,
                },
            )
            .await?;

        info!(
            conversation_id = conversation.id.as_str(),
            approval_id = item.id.as_str(),
            urgent_review,
            "reply held for approval, placeholder sent"
        );

        Ok(OutboundMessage {
            conversation_id: conversation.id.to_string(),
            content: placeholder,
            content_type: ContentType::Text,
            annotations,
        })
    }

    fn conversation_lock(&self, inbound: &InboundMessage) -> Arc<Mutex<()>> {
        let key = format!("{}:{}", inbound.channel, inbound.channel_id);
        self.conversation_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
