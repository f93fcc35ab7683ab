// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process wiring: construct the pipeline from configuration.
//!
//! Services are built once here and injected into the processor; nothing in
//! the workspace reaches for global singletons.

use std::sync::Arc;

use stayflow_approval::ApprovalQueue;
use stayflow_autonomy::AutonomyEngine;
use stayflow_bus::EventBus;
use stayflow_config::StayflowConfig;
use stayflow_core::StayflowError;
use stayflow_core::traits::Responder;
use stayflow_escalation::EscalationEngine;
use stayflow_pipeline::MessageProcessor;
use stayflow_router::TaskRouter;
use stayflow_storage::{
    Database, SqliteApprovalStore, SqliteConversationStore, SqliteGuestContextSource,
    SqliteGuestDirectory, SqliteTaskStore,
};

/// The wired pipeline plus the handles CLI commands need.
pub struct App {
    pub processor: MessageProcessor,
    pub approval_queue: Arc<ApprovalQueue>,
    pub bus: EventBus,
    pub db: Database,
}

/// Open storage and assemble the full pipeline around `responder`.
pub async fn build(
    config: &StayflowConfig,
    responder: Arc<dyn Responder>,
) -> Result<App, StayflowError> {
    let db = stayflow_storage::open_from_config(&config.storage).await?;

    let conversations = Arc::new(SqliteConversationStore::new(db.clone()));
    let guests = Arc::new(SqliteGuestDirectory::new(db.clone()));
    let contexts = Arc::new(SqliteGuestContextSource::new(db.clone()));
    let tasks = Arc::new(SqliteTaskStore::new(db.clone()));
    let approvals = Arc::new(SqliteApprovalStore::new(db.clone()));

    let bus = EventBus::new();
    let router = TaskRouter::new(config.routing.clone());
    let escalation = EscalationEngine::new(config.escalation.clone(), conversations.clone());
    let autonomy = Arc::new(AutonomyEngine::from_config(config.autonomy.clone()));
    autonomy.ensure_loaded().await?;

    let approval_queue = Arc::new(ApprovalQueue::new(
        approvals,
        tasks.clone(),
        conversations.clone(),
        bus.clone(),
    ));

    let processor = MessageProcessor::new(
        conversations,
        guests,
        contexts,
        tasks,
        responder,
        router,
        escalation,
        autonomy,
        approval_queue.clone(),
        bus.clone(),
    );

    Ok(App {
        processor,
        approval_queue,
        bus,
        db,
    })
}
