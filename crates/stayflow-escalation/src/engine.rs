// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation decision engine.
//!
//! Decides when a conversation should be handed off from AI to human staff,
//! based on the current message text, the AI's classification confidence, and
//! recent conversation history. The engine only *requests* the state
//! transition; conversation state is owned by the conversation store.
//!
//! Idempotent per message: a conversation already in the `escalated` state
//! never re-escalates until staff resolve it.

use std::sync::Arc;

use stayflow_config::EscalationConfig;
use stayflow_core::error::StayflowError;
use stayflow_core::traits::ConversationStore;
use stayflow_core::types::{ConversationState, Priority, SenderType};
use strum::Display;
use tracing::debug;

/// Why a conversation is being escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EscalationReason {
    /// The AI produced several consecutive low-confidence replies.
    RepeatedLowConfidence,
    /// The guest explicitly asked for a human.
    HumanRequested,
    /// The message reads as a complaint.
    ComplaintDetected,
    /// The message reads as an emergency.
    EmergencyDetected,
}

/// Result of an escalation check for one message.
#[derive(Debug, Clone)]
pub struct EscalationDecision {
    pub should_escalate: bool,
    pub reasons: Vec<EscalationReason>,
    /// Handoff priority for staff triage.
    pub priority: Priority,
}

impl EscalationDecision {
    fn no_escalation() -> Self {
        Self {
            should_escalate: false,
            reasons: Vec::new(),
            priority: Priority::Standard,
        }
    }
}

/// Explicit human-request phrases (contains, case-insensitive).
static HUMAN_REQUEST_PHRASES: &[&str] = &[
    "speak to a human",
    "talk to a human",
    "speak to someone",
    "talk to someone",
    "speak to an agent",
    "talk to an agent",
    "speak to the manager",
    "talk to the manager",
    "real person",
    "human please",
    "get me a person",
];

/// Emergency indicator keywords (contains, case-insensitive).
static EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency", "fire", "smoke", "flood", "ambulance", "doctor", "injured", "police",
];

/// Complaint indicator keywords (contains, case-insensitive).
static COMPLAINT_KEYWORDS: &[&str] = &[
    "unacceptable",
    "terrible",
    "awful",
    "worst",
    "disgusting",
    "furious",
    "angry",
    "refund",
    "disappointed",
];

/// Decides AI-to-human handoff per message.
///
/// Holds configuration and a conversation store handle; safe for concurrent
/// use across messages.
pub struct EscalationEngine {
    config: EscalationConfig,
    conversations: Arc<dyn ConversationStore>,
}

impl EscalationEngine {
    pub fn new(config: EscalationConfig, conversations: Arc<dyn ConversationStore>) -> Self {
        Self {
            config,
            conversations,
        }
    }

    /// Evaluate whether this message should escalate its conversation.
    ///
    /// `ai_confidence` is the classification confidence for the current
    /// message, when available. Calling twice for the same message cannot
    /// double-escalate: once the conversation is `escalated` the engine
    /// reports no further escalations until staff resolve it.
    pub async fn should_escalate(
        &self,
        conversation_id: &str,
        message_content: &str,
        ai_confidence: Option<f32>,
    ) -> Result<EscalationDecision, StayflowError> {
        let conversation = self
            .conversations
            .get(conversation_id)
            .await?
            .ok_or_else(|| StayflowError::NotFound {
                entity: "conversation",
                id: conversation_id.to_string(),
            })?;

        if conversation.state == ConversationState::Escalated {
            debug!(conversation_id, "conversation already escalated, no-op");
            return Ok(EscalationDecision::no_escalation());
        }

        let lower = message_content.to_lowercase();
        let mut reasons = Vec::new();

        if EMERGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            reasons.push(EscalationReason::EmergencyDetected);
        }

        if HUMAN_REQUEST_PHRASES.iter().any(|p| lower.contains(p)) {
            reasons.push(EscalationReason::HumanRequested);
        }

        if COMPLAINT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            reasons.push(EscalationReason::ComplaintDetected);
        }

        if self.low_confidence_streak(conversation_id, ai_confidence).await? {
            reasons.push(EscalationReason::RepeatedLowConfidence);
        }

        if reasons.is_empty() {
            return Ok(EscalationDecision::no_escalation());
        }

        let priority = if reasons.contains(&EscalationReason::EmergencyDetected) {
            Priority::Urgent
        } else if reasons.contains(&EscalationReason::HumanRequested)
            || reasons.contains(&EscalationReason::ComplaintDetected)
        {
            Priority::High
        } else {
            Priority::Standard
        };

        debug!(
            conversation_id,
            ?reasons,
            priority = %priority,
            "escalation triggered"
        );

        Ok(EscalationDecision {
            should_escalate: true,
            reasons,
            priority,
        })
    }

    /// True when the current confidence plus recent consecutive low-confidence
    /// AI turns reach the configured streak length.
    async fn low_confidence_streak(
        &self,
        conversation_id: &str,
        ai_confidence: Option<f32>,
    ) -> Result<bool, StayflowError> {
        let threshold = self.config.low_confidence_threshold;

        let mut streak: u32 = match ai_confidence {
            Some(c) if c < threshold => 1,
            // A confident (or unclassified) current turn resets the streak.
            _ => return Ok(false),
        };

        let recent = self
            .conversations
            .recent_messages(conversation_id, self.config.history_window)
            .await?;

        // Newest first; a confident AI turn breaks the streak.
        for msg in recent.iter().filter(|m| m.sender_type == SenderType::Ai) {
            match msg.confidence {
                Some(c) if c < threshold => streak += 1,
                _ => break,
            }
        }

        Ok(streak >= self.config.low_confidence_streak)
    }
}
