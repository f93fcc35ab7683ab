// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static guest-intent taxonomy.
//!
//! A read-only registry mapping dotted intent names
//! (e.g. `request.housekeeping.towels`) to their definitions. Compiled into
//! the binary; never mutated at runtime. The table is the single source of
//! truth for an intent's department and base priority, so task routing and
//! any staff-facing surfaces cannot diverge.

use stayflow_core::types::{Department, Priority};

/// Definition of a single guest intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentDef {
    /// Dotted namespace name, e.g. `request.maintenance.ac`.
    pub name: &'static str,
    /// Short staff-facing description, used as the default task description.
    pub description: &'static str,
    /// Example guest utterances, used for classifier prompting and demos.
    pub examples: &'static [&'static str],
    /// Department responsible for acting on the intent. `None` marks
    /// informational intents that never spawn tasks.
    pub department: Option<Department>,
    /// Whether the intent calls for staff action at all.
    pub requires_action: bool,
    /// Base priority before any guest-specific elevation.
    pub priority: Priority,
}

/// The full intent table, ordered by namespace.
static INTENTS: &[IntentDef] = &[
    IntentDef {
        name: "greeting",
        description: "Guest greeting or small talk",
        examples: &["hi", "hello", "good morning"],
        department: None,
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "request.housekeeping.towels",
        description: "Fresh towels requested",
        examples: &["can we get more towels", "need extra towels please"],
        department: Some(Department::Housekeeping),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.housekeeping.cleaning",
        description: "Room cleaning requested",
        examples: &["please clean our room", "can housekeeping come by"],
        department: Some(Department::Housekeeping),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.housekeeping.amenities",
        description: "Amenities restock requested",
        examples: &["we're out of shampoo", "more coffee pods please"],
        department: Some(Department::Housekeeping),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.maintenance",
        description: "Maintenance issue reported",
        examples: &["something is broken in the room", "the AC is not working"],
        department: Some(Department::Maintenance),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "request.maintenance.ac",
        description: "Air conditioning issue reported",
        examples: &["the AC is not working", "room is too hot"],
        department: Some(Department::Maintenance),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "request.maintenance.plumbing",
        description: "Plumbing issue reported",
        examples: &["the shower is leaking", "toilet won't flush"],
        department: Some(Department::Maintenance),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "request.maintenance.electrical",
        description: "Electrical issue reported",
        examples: &["the lights don't turn on", "outlet not working"],
        department: Some(Department::Maintenance),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "request.room_service.order",
        description: "Room service order placed",
        examples: &["I'd like to order breakfast", "can I get a club sandwich"],
        department: Some(Department::RoomService),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.room_service.tray_pickup",
        description: "Tray pickup requested",
        examples: &["please pick up our trays"],
        department: Some(Department::RoomService),
        requires_action: true,
        priority: Priority::Low,
    },
    IntentDef {
        name: "request.concierge.transport",
        description: "Transport or taxi arrangement requested",
        examples: &["can you book a taxi to the airport", "we need a car at 9"],
        department: Some(Department::Concierge),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.concierge.booking",
        description: "Restaurant or activity booking requested",
        examples: &["book us a table for two tonight", "tickets for the show"],
        department: Some(Department::Concierge),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.concierge.recommendation",
        description: "Local recommendation requested",
        examples: &["where should we eat nearby", "what's worth seeing here"],
        department: Some(Department::Concierge),
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "request.special_occasion",
        description: "Special occasion arrangement requested",
        examples: &["it's our anniversary, can you do something special"],
        department: Some(Department::Concierge),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "request.room_change",
        description: "Room change requested",
        examples: &["we'd like a different room", "can we move to a higher floor"],
        department: Some(Department::FrontDesk),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "inquiry.reservation.details",
        description: "Reservation details inquiry",
        examples: &["what time is check-in", "is breakfast included"],
        department: Some(Department::FrontDesk),
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "inquiry.reservation.change",
        description: "Reservation change requested",
        examples: &["can we extend our stay by a night", "add a rollaway bed"],
        department: Some(Department::FrontDesk),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "inquiry.checkout",
        description: "Checkout process inquiry",
        examples: &["when is checkout", "can we have a late checkout"],
        department: None,
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "inquiry.amenities",
        description: "Hotel amenities inquiry",
        examples: &["is there a gym", "what time does the pool close"],
        department: None,
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "inquiry.billing",
        description: "Billing question",
        examples: &["what's this charge on my folio", "can I get an invoice"],
        department: Some(Department::FrontDesk),
        requires_action: false,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "report.noise",
        description: "Noise disturbance reported",
        examples: &["the room next door is very loud", "noise in the hallway"],
        department: Some(Department::FrontDesk),
        requires_action: true,
        priority: Priority::Standard,
    },
    IntentDef {
        name: "feedback.complaint",
        description: "Guest complaint",
        examples: &["this is unacceptable", "I want to speak to the manager"],
        department: Some(Department::FrontDesk),
        requires_action: true,
        priority: Priority::High,
    },
    IntentDef {
        name: "feedback.praise",
        description: "Guest compliment",
        examples: &["the staff has been wonderful", "lovely room, thank you"],
        department: None,
        requires_action: false,
        priority: Priority::Low,
    },
    IntentDef {
        name: "emergency",
        description: "Emergency reported by guest",
        examples: &["there's a fire", "someone needs a doctor"],
        department: Some(Department::FrontDesk),
        requires_action: true,
        priority: Priority::Urgent,
    },
];

/// Look up an intent definition by its dotted name.
///
/// Absent names return `None`, never an error.
pub fn definition(name: &str) -> Option<&'static IntentDef> {
    INTENTS.iter().find(|def| def.name == name)
}

/// All intent names registered for a department.
pub fn by_department(department: Department) -> Vec<&'static str> {
    INTENTS
        .iter()
        .filter(|def| def.department == Some(department))
        .map(|def| def.name)
        .collect()
}

/// All intent names that call for staff action.
pub fn actionable() -> Vec<&'static str> {
    INTENTS
        .iter()
        .filter(|def| def.requires_action)
        .map(|def| def.name)
        .collect()
}

/// The full intent table.
pub fn all() -> &'static [IntentDef] {
    INTENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_intent() {
        let def = definition("request.maintenance.ac").unwrap();
        assert_eq!(def.department, Some(Department::Maintenance));
        assert_eq!(def.priority, Priority::High);
        assert!(def.requires_action);
    }

    #[test]
    fn lookup_unknown_intent_returns_none() {
        assert!(definition("request.spa.booking").is_none());
        assert!(definition("").is_none());
    }

    #[test]
    fn checkout_inquiry_has_no_department() {
        let def = definition("inquiry.checkout").unwrap();
        assert!(def.department.is_none());
        assert!(!def.requires_action);
    }

    #[test]
    fn by_department_finds_housekeeping_intents() {
        let names = by_department(Department::Housekeeping);
        assert!(names.contains(&"request.housekeeping.towels"));
        assert!(names.contains(&"request.housekeeping.cleaning"));
        assert!(!names.contains(&"request.maintenance.ac"));
    }

    #[test]
    fn actionable_excludes_informational_intents() {
        let names = actionable();
        assert!(names.contains(&"request.maintenance"));
        assert!(names.contains(&"emergency"));
        assert!(!names.contains(&"greeting"));
        assert!(!names.contains(&"inquiry.checkout"));
        assert!(!names.contains(&"feedback.praise"));
    }

    #[test]
    fn actionable_intents_all_have_departments() {
        for name in actionable() {
            let def = definition(name).unwrap();
            assert!(
                def.department.is_some(),
                "actionable intent {name} must map to a department"
            );
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = all().iter().map(|d| d.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn emergency_is_urgent() {
        assert_eq!(definition("emergency").unwrap().priority, Priority::Urgent);
    }
}
