// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending-reply templates for the approval path.
//!
//! When the autonomy gate holds a reply for staff review, the guest receives
//! a contextual acknowledgement instead of a bare "pending" message. The
//! template is chosen by intent prefix family; most specific prefixes first.

/// Prefix-to-template table, checked in order. `{n}` is the name fragment.
static TEMPLATES: &[(&str, &str)] = &[
    (
        "request.housekeeping",
        "Thanks{n}! I've passed your housekeeping request to our team and they'll take care of it shortly.",
    ),
    (
        "request.maintenance",
        "Thanks for letting us know{n}. I've flagged this for our maintenance team and someone will look into it right away.",
    ),
    (
        "request.room_service",
        "Thanks{n}! I'm getting your room service request over to the kitchen now.",
    ),
    (
        "request.concierge.transport",
        "Got it{n}. I'm checking transport options for you and will confirm shortly.",
    ),
    (
        "request.special_occasion",
        "How lovely{n}! I'm checking with our team to arrange something special and will be in touch soon.",
    ),
    (
        "request.room_change",
        "Thanks{n}. Let me check room availability with our front desk and I'll follow up shortly.",
    ),
    (
        "inquiry.reservation",
        "Thanks{n}. I'm pulling up your reservation details and will get back to you in a moment.",
    ),
    (
        "inquiry.billing",
        "Thanks{n}. I'm reviewing your folio with our front desk and will come back to you shortly.",
    ),
    (
        "report.noise",
        "I'm sorry about the disturbance{n}. I've alerted our team and someone will address it right away.",
    ),
    (
        "feedback.complaint",
        "I'm very sorry{n}. I've shared this with our duty manager and someone will follow up with you personally.",
    ),
    (
        "emergency",
        "We're on it{n}. Our team has been alerted and someone is coming to help immediately.",
    ),
    (
        "inquiry",
        "Thanks{n}. I'm checking that for you and will get right back to you.",
    ),
];

/// Generic fallback when the intent is absent or unmatched.
static FALLBACK: &str = "Thanks{n}, I'm looking into this and will get back to you shortly.";

/// Build the guest-visible acknowledgement for a reply held for approval.
pub fn pending_reply(intent: Option<&str>, first_name: Option<&str>) -> String {
    let template = intent
        .and_then(|name| {
            TEMPLATES
                .iter()
                .find(|(prefix, _)| name.starts_with(prefix))
                .map(|(_, text)| *text)
        })
        .unwrap_or(FALLBACK);

    let name_fragment = first_name
        .map(|name| format!(" {name}"))
        .unwrap_or_default();

    template.replace("{n}", &name_fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_family_template() {
        let text = pending_reply(Some("request.maintenance.ac"), Some("Dana"));
        assert!(text.contains("maintenance team"));
        assert!(text.contains(" Dana"));
    }

    #[test]
    fn transport_is_more_specific_than_concierge() {
        let text = pending_reply(Some("request.concierge.transport"), None);
        assert!(text.contains("transport options"));
    }

    #[test]
    fn reservation_and_billing_have_distinct_tones() {
        let reservation = pending_reply(Some("inquiry.reservation.details"), None);
        let billing = pending_reply(Some("inquiry.billing"), None);
        assert!(reservation.contains("reservation details"));
        assert!(billing.contains("folio"));
        assert_ne!(reservation, billing);
    }

    #[test]
    fn generic_inquiry_falls_through_after_specific_prefixes() {
        let text = pending_reply(Some("inquiry.amenities"), None);
        assert!(text.contains("checking that for you"));
    }

    #[test]
    fn unknown_intent_uses_fallback() {
        let text = pending_reply(Some("something.new"), None);
        assert_eq!(text, "Thanks, I'm looking into this and will get back to you shortly.");
    }

    #[test]
    fn missing_intent_uses_fallback_with_name() {
        let text = pending_reply(None, Some("Ira"));
        assert!(text.starts_with("Thanks Ira,"));
    }

    #[test]
    fn no_template_leaks_the_placeholder() {
        for (_, template) in TEMPLATES {
            let rendered = template.replace("{n}", "");
            assert!(!rendered.contains("{n}"));
        }
    }
}
