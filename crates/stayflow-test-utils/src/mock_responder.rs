// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI responder for deterministic testing.
//!
//! `MockResponder` implements [`Responder`] with pre-scripted outputs,
//! enabling fast, CI-runnable pipeline tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use stayflow_core::error::StayflowError;
use stayflow_core::traits::Responder;
use stayflow_core::types::{Conversation, GuestContext, InboundMessage, ResponderOutput};
use tokio::sync::Mutex;

enum Scripted {
    Output(ResponderOutput),
    Failure(String),
}

/// A mock responder that pops scripted outputs from a FIFO queue.
///
/// When the queue is empty, a default unclassified reply is returned.
pub struct MockResponder {
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl MockResponder {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a scripted output.
    pub async fn push(&self, output: ResponderOutput) {
        self.script.lock().await.push_back(Scripted::Output(output));
    }

    /// Queue a failure; the next `generate` call will error.
    pub async fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// Convenience: a classified reply.
    pub fn classified(content: &str, intent: &str, confidence: f32) -> ResponderOutput {
        ResponderOutput {
            content: content.to_string(),
            intent: Some(intent.to_string()),
            confidence: Some(confidence),
            entities: None,
            metadata: None,
        }
    }

    /// Convenience: an unclassified reply.
    pub fn unclassified(content: &str) -> ResponderOutput {
        ResponderOutput {
            content: content.to_string(),
            intent: None,
            confidence: None,
            entities: None,
            metadata: None,
        }
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn generate(
        &self,
        _conversation: &Conversation,
        _inbound: &InboundMessage,
        _guest_context: Option<&GuestContext>,
    ) -> Result<ResponderOutput, StayflowError> {
        match self.script.lock().await.pop_front() {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::Failure(message)) => Err(StayflowError::Responder {
                message,
                source: None,
            }),
            None => Ok(Self::unclassified("Happy to help!")),
        }
    }
}
