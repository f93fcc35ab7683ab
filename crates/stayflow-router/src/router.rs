// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task routing: decides whether a classified intent becomes a staff task,
//! for which department, and at what priority.
//!
//! Routing never throws: low confidence, informational intents, and unknown
//! intents all yield a no-task decision.

use stayflow_config::RoutingConfig;
use stayflow_core::types::{ClassificationResult, Department, GuestContext, Priority, TaskType};
use tracing::debug;

use crate::mapping::task_type_for_intent;

/// Result of routing one classified message.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Whether a staff task should be created for this message.
    pub should_create_task: bool,
    pub department: Option<Department>,
    pub task_type: Option<TaskType>,
    /// Effective priority after VIP elevation.
    pub priority: Priority,
    /// Default task description from the taxonomy. Callers may override with
    /// the literal guest message for more actionable tasks.
    pub description: Option<String>,
    /// Whether the task should be auto-assigned to on-shift staff.
    pub auto_assign: bool,
}

impl RoutingDecision {
    fn no_task() -> Self {
        Self {
            should_create_task: false,
            department: None,
            task_type: None,
            priority: Priority::Standard,
            description: None,
            auto_assign: false,
        }
    }
}

/// Routes classified intents to staff tasks.
///
/// Holds only configuration; safe for concurrent use across messages.
pub struct TaskRouter {
    config: RoutingConfig,
}

impl TaskRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Decide task creation for a classification and guest context.
    ///
    /// 1. Confidence below the routing minimum never creates a task.
    /// 2. Intents without `requires_action` or without a department never
    ///    create a task.
    /// 3. Otherwise the intent prefix selects the task type, and the
    ///    taxonomy's base priority is elevated one step for VIP guests
    ///    (capped at urgent).
    pub fn process(
        &self,
        classification: &ClassificationResult,
        guest: &GuestContext,
    ) -> RoutingDecision {
        if classification.confidence < self.config.min_confidence {
            debug!(
                intent = classification.intent.as_str(),
                confidence = classification.confidence,
                "confidence below routing minimum, no task"
            );
            return RoutingDecision::no_task();
        }

        if !classification.requires_action {
            return RoutingDecision::no_task();
        }

        let Some(department) = classification.department else {
            return RoutingDecision::no_task();
        };

        let task_type = task_type_for_intent(&classification.intent);

        let base_priority = stayflow_taxonomy::definition(&classification.intent)
            .map(|def| def.priority)
            .unwrap_or(Priority::Standard);
        let priority = if guest.is_vip {
            base_priority.elevated()
        } else {
            base_priority
        };

        let description = stayflow_taxonomy::definition(&classification.intent)
            .map(|def| def.description.to_string());

        debug!(
            intent = classification.intent.as_str(),
            department = %department,
            task_type = %task_type,
            priority = %priority,
            vip = guest.is_vip,
            "routing decision: create task"
        );

        RoutingDecision {
            should_create_task: true,
            department: Some(department),
            task_type: Some(task_type),
            priority,
            description,
            auto_assign: self.config.auto_assign,
        }
    }
}
