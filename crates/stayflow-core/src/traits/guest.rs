// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest identity and guest-context traits.

use async_trait::async_trait;

use crate::error::StayflowError;
use crate::types::{Guest, GuestContext};

/// Guest identity lookup keyed by phone number (WhatsApp/SMS channels).
#[async_trait]
pub trait GuestDirectory: Send + Sync {
    async fn find_or_create_by_phone(&self, phone: &str) -> Result<Guest, StayflowError>;
}

/// Per-conversation guest/reservation context, recomputed on demand.
#[async_trait]
pub trait GuestContextSource: Send + Sync {
    /// Links a conversation to a guest/reservation by phone number.
    async fn match_conversation(
        &self,
        conversation_id: &str,
        phone: &str,
    ) -> Result<(), StayflowError>;

    /// Router-facing context for the conversation's guest, if matched.
    async fn context_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<GuestContext>, StayflowError>;
}
