// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder trait for AI response generation backends.

use async_trait::async_trait;

use crate::error::StayflowError;
use crate::types::{Conversation, GuestContext, InboundMessage, ResponderOutput};

/// Generates a reply (and optional intent classification) for one inbound
/// guest message.
///
/// This is the pipeline's longest-latency step and the one infrastructure
/// failure that propagates out of the processor: the channel adapter layer
/// owns the generic-apology fallback, not implementations of this trait.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(
        &self,
        conversation: &Conversation,
        inbound: &InboundMessage,
        guest_context: Option<&GuestContext>,
    ) -> Result<ResponderOutput, StayflowError>;
}
