// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles the complete message pipeline over a temp SQLite
//! database with a scripted mock responder. `send()` drives one message
//! through the full pipeline the way a channel adapter would.

use std::sync::Arc;

use stayflow_approval::ApprovalQueue;
use stayflow_autonomy::AutonomyEngine;
use stayflow_bus::EventBus;
use stayflow_config::StayflowConfig;
use stayflow_core::error::StayflowError;
use stayflow_core::types::{Channel, ContentType, GuestContext, InboundMessage, OutboundMessage};
use stayflow_escalation::EscalationEngine;
use stayflow_pipeline::MessageProcessor;
use stayflow_router::TaskRouter;
use stayflow_storage::{
    Database, SqliteApprovalStore, SqliteConversationStore, SqliteGuestContextSource,
    SqliteGuestDirectory, SqliteTaskStore,
};

use crate::mock_responder::MockResponder;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: StayflowConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: StayflowConfig::default(),
        }
    }

    /// Replace the full configuration.
    pub fn with_config(mut self, config: StayflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Adjust only the autonomy section.
    pub fn with_autonomy(mut self, autonomy: stayflow_config::AutonomyConfig) -> Self {
        self.config.autonomy = autonomy;
        self
    }

    /// Build the harness, creating all subsystems over a temp database.
    pub async fn build(self) -> Result<TestHarness, StayflowError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| StayflowError::Storage {
            source: e.into(),
        })?;
        let db_path = temp_dir.path().join("test.db");
        let db = Database::open(&db_path.to_string_lossy()).await?;

        let conversations = Arc::new(SqliteConversationStore::new(db.clone()));
        let guests = Arc::new(SqliteGuestDirectory::new(db.clone()));
        let contexts = Arc::new(SqliteGuestContextSource::new(db.clone()));
        let tasks = Arc::new(SqliteTaskStore::new(db.clone()));
        let approvals = Arc::new(SqliteApprovalStore::new(db.clone()));

        let bus = EventBus::new();
        let responder = Arc::new(MockResponder::new());

        let router = TaskRouter::new(self.config.routing.clone());
        let escalation =
            EscalationEngine::new(self.config.escalation.clone(), conversations.clone());
        let autonomy = Arc::new(AutonomyEngine::from_config(self.config.autonomy.clone()));
        let approval_queue = Arc::new(ApprovalQueue::new(
            approvals.clone(),
            tasks.clone(),
            conversations.clone(),
            bus.clone(),
        ));

        let processor = MessageProcessor::new(
            conversations.clone(),
            guests.clone(),
            contexts.clone(),
            tasks.clone(),
            responder.clone(),
            router,
            escalation,
            autonomy.clone(),
            approval_queue.clone(),
            bus.clone(),
        );

        Ok(TestHarness {
            processor,
            responder,
            conversations,
            guests,
            contexts,
            tasks,
            approvals,
            approval_queue,
            autonomy,
            bus,
            db,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired pipeline over a temp SQLite database.
pub struct TestHarness {
    pub processor: MessageProcessor,
    pub responder: Arc<MockResponder>,
    pub conversations: Arc<SqliteConversationStore>,
    pub guests: Arc<SqliteGuestDirectory>,
    pub contexts: Arc<SqliteGuestContextSource>,
    pub tasks: Arc<SqliteTaskStore>,
    pub approvals: Arc<SqliteApprovalStore>,
    pub approval_queue: Arc<ApprovalQueue>,
    pub autonomy: Arc<AutonomyEngine>,
    pub bus: EventBus,
    pub db: Database,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive one message through the full pipeline.
    pub async fn send(
        &self,
        channel: Channel,
        channel_id: &str,
        content: &str,
    ) -> Result<OutboundMessage, StayflowError> {
        self.processor
            .process(InboundMessage {
                id: uuid::Uuid::new_v4().to_string(),
                channel,
                channel_id: channel_id.to_string(),
                content: content.to_string(),
                content_type: ContentType::Text,
                timestamp: chrono::Utc::now(),
                raw: None,
            })
            .await
    }

    /// Shorthand for the most common test channel.
    pub async fn send_whatsapp(
        &self,
        phone: &str,
        content: &str,
    ) -> Result<OutboundMessage, StayflowError> {
        self.send(Channel::Whatsapp, phone, content).await
    }

    /// Seed a guest profile and a matchable context for a phone number.
    ///
    /// The context row is created lazily when a conversation matches; this
    /// registers the guest record the matcher will find.
    pub async fn seed_guest(
        &self,
        phone: &str,
        first_name: Option<&str>,
        is_vip: bool,
    ) -> Result<GuestContext, StayflowError> {
        use stayflow_core::traits::GuestDirectory;

        let guest = self.guests.find_or_create_by_phone(phone).await?;
        self.guests
            .update_profile(&guest.id, first_name, None, is_vip)
            .await?;
        Ok(GuestContext {
            guest_id: guest.id,
            first_name: first_name.map(|s| s.to_string()),
            last_name: None,
            room_number: None,
            is_vip,
            loyalty_tier: None,
            language: None,
        })
    }

    /// Count persisted AI messages for a conversation.
    pub async fn ai_message_count(&self, conversation_id: &str) -> Result<i64, StayflowError> {
        stayflow_storage::queries::messages::count_by_sender(&self.db, conversation_id, "ai").await
    }
}
