// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait: lookup/creation and message persistence.

use async_trait::async_trait;

use crate::error::StayflowError;
use crate::types::{
    Channel, Conversation, ConversationMessage, ConversationState, NewConversationMessage,
};

/// Owns conversation state and message history.
///
/// Conversation state transitions go through [`set_state`]; other components
/// (notably the escalation engine) only request transitions, they never own
/// the state themselves.
///
/// [`set_state`]: ConversationStore::set_state
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Finds the conversation for `(channel, channel_id)` or creates it.
    ///
    /// Implementations must be safe under concurrent calls for the same key:
    /// two racing messages for one guest must land in one conversation.
    async fn find_or_create(
        &self,
        channel: Channel,
        channel_id: &str,
        guest_id: Option<&str>,
    ) -> Result<Conversation, StayflowError>;

    async fn get(&self, conversation_id: &str) -> Result<Option<Conversation>, StayflowError>;

    /// Appends a message to the conversation's history.
    async fn add_message(
        &self,
        conversation_id: &str,
        message: NewConversationMessage,
    ) -> Result<ConversationMessage, StayflowError>;

    /// Most recent messages in reverse-chronological order, newest first.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationMessage>, StayflowError>;

    async fn set_state(
        &self,
        conversation_id: &str,
        state: ConversationState,
    ) -> Result<(), StayflowError>;
}
