// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stayflow approvals`: inspect and decide pending approval items.

use std::sync::Arc;

use clap::Subcommand;
use stayflow_approval::{ApprovalDecision, DecisionOutcome};
use stayflow_config::StayflowConfig;
use stayflow_core::StayflowError;

use crate::simulate::KeywordResponder;
use crate::wiring;

#[derive(Subcommand, Debug)]
pub enum ApprovalsCommand {
    /// List pending approval items, oldest first.
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Decide a pending item.
    Decide {
        /// Approval item id.
        id: String,
        /// Approve instead of reject.
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        /// Reject instead of approve.
        #[arg(long)]
        reject: bool,
        /// Staff identifier recorded on the decision.
        #[arg(long, default_value = "operator")]
        by: String,
    },
}

pub async fn run(config: &StayflowConfig, command: ApprovalsCommand) -> Result<(), StayflowError> {
    let app = wiring::build(config, Arc::new(KeywordResponder)).await?;

    match command {
        ApprovalsCommand::List { limit } => {
            let items = app.approval_queue.pending(limit).await?;
            if items.is_empty() {
                println!("no pending approvals");
                return Ok(());
            }
            for item in items {
                println!(
                    "{}  {}  {}  conversation={}  created={}",
                    item.id, item.kind, item.action_type, item.conversation_id, item.created_at
                );
            }
        }
        ApprovalsCommand::Decide {
            id,
            approve,
            reject,
            by,
        } => {
            let decision = match (approve, reject) {
                (true, false) => ApprovalDecision::Approve,
                (false, true) => ApprovalDecision::Reject,
                _ => {
                    return Err(StayflowError::InvalidState(
                        "pass exactly one of --approve or --reject".into(),
                    ));
                }
            };

            match app.approval_queue.decide(&id, decision, &by).await? {
                DecisionOutcome::Rejected(item) => {
                    println!("rejected {}", item.id);
                }
                DecisionOutcome::TaskCreated(task) => {
                    println!(
                        "approved: task {} created for {} ({})",
                        task.id, task.department, task.priority
                    );
                }
                DecisionOutcome::ResponseReleased(message) => {
                    println!(
                        "approved: response released to conversation {}",
                        message.conversation_id
                    );
                }
            }
        }
    }

    Ok(())
}
