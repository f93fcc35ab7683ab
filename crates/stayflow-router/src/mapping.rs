// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-prefix to task-type mapping.
//!
//! Represented as an explicit table rather than chained `starts_with`
//! branches, so adding a department is a data change, not a code change.
//! Longest prefixes first: matching stops at the first hit.

use stayflow_core::types::TaskType;

/// Prefix rules, checked in order.
static PREFIX_RULES: &[(&str, TaskType)] = &[
    ("request.housekeeping", TaskType::Housekeeping),
    ("request.maintenance", TaskType::Maintenance),
    ("request.room_service", TaskType::RoomService),
    ("request.concierge", TaskType::Concierge),
    ("inquiry.reservation", TaskType::Concierge),
    ("feedback.complaint", TaskType::Other),
    ("emergency", TaskType::Other),
];

/// Map an intent name to a task type via its namespace prefix.
///
/// Intents outside every rule fall back to [`TaskType::Other`]; the caller
/// has already established that the intent is actionable and owned by a
/// department before consulting this table.
pub fn task_type_for_intent(intent: &str) -> TaskType {
    PREFIX_RULES
        .iter()
        .find(|(prefix, _)| intent.starts_with(prefix))
        .map(|(_, task_type)| *task_type)
        .unwrap_or(TaskType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn housekeeping_prefix_maps() {
        assert_eq!(
            task_type_for_intent("request.housekeeping.towels"),
            TaskType::Housekeeping
        );
        assert_eq!(
            task_type_for_intent("request.housekeeping"),
            TaskType::Housekeeping
        );
    }

    #[test]
    fn maintenance_prefix_maps() {
        assert_eq!(
            task_type_for_intent("request.maintenance.ac"),
            TaskType::Maintenance
        );
        assert_eq!(task_type_for_intent("request.maintenance"), TaskType::Maintenance);
    }

    #[test]
    fn concierge_covers_reservation_inquiries() {
        assert_eq!(
            task_type_for_intent("request.concierge.transport"),
            TaskType::Concierge
        );
        assert_eq!(
            task_type_for_intent("inquiry.reservation.change"),
            TaskType::Concierge
        );
    }

    #[test]
    fn complaints_and_emergencies_map_to_other() {
        assert_eq!(task_type_for_intent("feedback.complaint"), TaskType::Other);
        assert_eq!(task_type_for_intent("emergency"), TaskType::Other);
    }

    #[test]
    fn unmapped_prefix_falls_back_to_other() {
        assert_eq!(task_type_for_intent("request.special_occasion"), TaskType::Other);
        assert_eq!(task_type_for_intent("report.noise"), TaskType::Other);
    }
}
