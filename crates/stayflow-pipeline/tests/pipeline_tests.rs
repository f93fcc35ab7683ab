// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests over a temp SQLite database.

use stayflow_approval::{ApprovalDecision, DecisionOutcome, ResponseAction};
use stayflow_bus::Event;
use stayflow_config::{AutonomyConfig, AutonomyLevel};
use stayflow_core::error::StayflowError;
use stayflow_core::types::{
    ApprovalKind, ApprovalStatus, Channel, ConversationState, Department, Priority,
    ResponseAnnotation, TaskStatus,
};
use stayflow_test_utils::{MockResponder, TestHarness};

const PHONE: &str = "+15550001111";

fn autonomy_with(action: &str, level: AutonomyLevel) -> AutonomyConfig {
    let mut config = AutonomyConfig::default();
    config.action_levels.insert(action.to_string(), level);
    config
}

#[tokio::test]
async fn maintenance_request_creates_task_and_persists_reply() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .responder
        .push(MockResponder::classified(
            "I'm sorry about the AC. Our maintenance team is on it.",
            "request.maintenance",
            0.9,
        ))
        .await;

    let outbound = harness
        .send_whatsapp(PHONE, "The AC is not working")
        .await
        .unwrap();

    assert_eq!(
        outbound.content,
        "I'm sorry about the AC. Our maintenance team is on it."
    );

    let task_id = outbound
        .annotations
        .iter()
        .find_map(|a| match a {
            ResponseAnnotation::TaskCreated { task_id } => Some(task_id.clone()),
            _ => None,
        })
        .expect("a maintenance task should be created directly");

    use stayflow_core::traits::TaskStore;
    let task = harness.tasks.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.department, Department::Maintenance);
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.description, "The AC is not working");

    // Exactly one AI message persisted for the conversation.
    assert_eq!(
        harness.ai_message_count(&outbound.conversation_id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn vip_guest_elevates_task_priority_to_urgent() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.seed_guest(PHONE, Some("Dana"), true).await.unwrap();
    harness
        .responder
        .push(MockResponder::classified(
            "Right away.",
            "request.maintenance.ac",
            0.9,
        ))
        .await;

    let outbound = harness
        .send_whatsapp(PHONE, "The AC is not working")
        .await
        .unwrap();

    let task_id = outbound
        .annotations
        .iter()
        .find_map(|a| match a {
            ResponseAnnotation::TaskCreated { task_id } => Some(task_id.clone()),
            _ => None,
        })
        .expect("task should be created");

    use stayflow_core::traits::TaskStore;
    let task = harness.tasks.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.priority, Priority::Urgent, "high elevates to urgent for VIP");
}

#[tokio::test]
async fn exactly_one_outbound_per_inbound() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness
        .responder
        .push(MockResponder::classified("Reply one.", "inquiry.amenities", 0.9))
        .await;
    let first = harness.send_whatsapp(PHONE, "Is there a pool?").await.unwrap();
    assert_eq!(harness.ai_message_count(&first.conversation_id).await.unwrap(), 1);

    harness
        .responder
        .push(MockResponder::classified("Reply two.", "inquiry.amenities", 0.9))
        .await;
    let second = harness.send_whatsapp(PHONE, "And a gym?").await.unwrap();
    assert_eq!(first.conversation_id, second.conversation_id);
    assert_eq!(harness.ai_message_count(&second.conversation_id).await.unwrap(), 2);
}

#[tokio::test]
async fn low_confidence_never_creates_a_task() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .responder
        .push(MockResponder::classified(
            "I think you need maintenance?",
            "request.maintenance.ac",
            0.55,
        ))
        .await;

    let outbound = harness.send_whatsapp(PHONE, "something hums").await.unwrap();

    assert!(
        !outbound
            .annotations
            .iter()
            .any(|a| matches!(
                a,
                ResponseAnnotation::TaskCreated { .. }
                    | ResponseAnnotation::TaskPendingApproval { .. }
            )),
        "no task path may trigger below the routing minimum"
    );
}

#[tokio::test]
async fn intent_without_department_never_creates_a_task() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .responder
        .push(MockResponder::classified(
            "Checkout is at 11am.",
            "inquiry.checkout",
            0.97,
        ))
        .await;

    let outbound = harness.send_whatsapp(PHONE, "when is checkout?").await.unwrap();
    assert_eq!(outbound.content, "Checkout is at 11am.");
    assert!(outbound.annotations.is_empty());
}

#[tokio::test]
async fn l1_reply_gate_hides_real_content_behind_approval() {
    let harness = TestHarness::builder()
        .with_autonomy(autonomy_with("respond_to_guest", AutonomyLevel::L1))
        .build()
        .await
        .unwrap();
    harness.seed_guest(PHONE, Some("Dana"), false).await.unwrap();

    let real = "Our engineer will be with you in 15 minutes.";
    harness
        .responder
        .push(MockResponder::classified(real, "request.maintenance.ac", 0.9))
        .await;

    let outbound = harness
        .send_whatsapp(PHONE, "The AC is not working")
        .await
        .unwrap();

    // The guest sees the maintenance acknowledgement, not the real reply.
    assert_ne!(outbound.content, real);
    assert!(outbound.content.contains("maintenance team"));
    assert!(outbound.content.contains("Dana"));

    // Exactly one pending response approval holds the real content.
    let pending = harness.approval_queue.pending(10).await.unwrap();
    let items: Vec<_> = pending
        .iter()
        .filter(|i| i.kind == ApprovalKind::Response)
        .collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ApprovalStatus::Pending);
    let action: ResponseAction = serde_json::from_value(items[0].action_data.clone()).unwrap();
    assert_eq!(action.content, real);

    // The task was still allowed through (its action is L2 by default).
    assert!(
        outbound
            .annotations
            .iter()
            .any(|a| matches!(a, ResponseAnnotation::TaskCreated { .. }))
    );

    // Placeholder counts as the single outbound AI message.
    assert_eq!(
        harness.ai_message_count(&outbound.conversation_id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn approving_a_held_reply_releases_the_real_content() {
    let harness = TestHarness::builder()
        .with_autonomy(autonomy_with("respond_to_guest", AutonomyLevel::L1))
        .build()
        .await
        .unwrap();

    let real = "Here is the full answer.";
    harness
        .responder
        .push(MockResponder::classified(real, "inquiry.amenities", 0.95))
        .await;

    let outbound = harness.send_whatsapp(PHONE, "pool hours?").await.unwrap();
    let approval_id = outbound
        .annotations
        .iter()
        .find_map(|a| match a {
            ResponseAnnotation::ResponsePendingApproval { approval_id } => {
                Some(approval_id.clone())
            }
            _ => None,
        })
        .expect("reply should be held for approval");

    let outcome = harness
        .approval_queue
        .decide(&approval_id, ApprovalDecision::Approve, "staff-1")
        .await
        .unwrap();

    let DecisionOutcome::ResponseReleased(message) = outcome else {
        panic!("expected a released response");
    };
    assert_eq!(message.content, real);

    // Placeholder plus released reply.
    assert_eq!(
        harness.ai_message_count(&outbound.conversation_id).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn deferred_task_waits_for_approval_then_executes() {
    let harness = TestHarness::builder()
        .with_autonomy(autonomy_with("create_maintenance_task", AutonomyLevel::L1))
        .build()
        .await
        .unwrap();

    harness
        .responder
        .push(MockResponder::classified(
            "Maintenance is notified.",
            "request.maintenance.plumbing",
            0.9,
        ))
        .await;

    let outbound = harness
        .send_whatsapp(PHONE, "the shower is leaking")
        .await
        .unwrap();

    let approval_id = outbound
        .annotations
        .iter()
        .find_map(|a| match a {
            ResponseAnnotation::TaskPendingApproval { approval_id } => Some(approval_id.clone()),
            _ => None,
        })
        .expect("task should be deferred for approval");

    // The reply itself went out (respond_to_guest is still L2 and 0.9 clears
    // the threshold).
    assert_eq!(outbound.content, "Maintenance is notified.");

    let outcome = harness
        .approval_queue
        .decide(&approval_id, ApprovalDecision::Approve, "supervisor")
        .await
        .unwrap();
    let DecisionOutcome::TaskCreated(task) = outcome else {
        panic!("expected task creation on approval");
    };
    assert_eq!(task.department, Department::Maintenance);
    assert_eq!(task.description, "the shower is leaking");
}

#[tokio::test]
async fn escalation_notice_is_appended_not_replacing() {
    let harness = TestHarness::builder().build().await.unwrap();
    let mut events = harness.bus.subscribe();

    let answer = "I'm very sorry about your experience.";
    harness
        .responder
        .push(MockResponder::classified(answer, "feedback.complaint", 0.9))
        .await;

    let outbound = harness
        .send_whatsapp(PHONE, "this stay has been unacceptable")
        .await
        .unwrap();

    // The substantive answer survives as a prefix.
    assert!(outbound.content.starts_with(answer));
    assert!(outbound.content.len() > answer.len());
    assert!(
        outbound
            .annotations
            .iter()
            .any(|a| matches!(a, ResponseAnnotation::Escalated { .. }))
    );

    use stayflow_core::traits::ConversationStore;
    let conversation = harness
        .conversations
        .get(&outbound.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.state, ConversationState::Escalated);

    // MessageReceived, TaskCreated (complaint is actionable), escalation,
    // MessageSent; exactly one escalation event among them.
    let mut escalations = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, Event::ConversationEscalated { .. }) {
            escalations += 1;
        }
    }
    assert_eq!(escalations, 1);
}

#[tokio::test]
async fn repeated_low_confidence_escalates_exactly_once() {
    let harness = TestHarness::builder().build().await.unwrap();
    let mut events = harness.bus.subscribe();

    // Three consecutive low-confidence turns in one conversation. Confidence
    // 0.3 also fails the reply gate, so each guest message gets a placeholder
    // while the low-confidence streak accumulates in history.
    for text in ["I need the thing", "you know, the thing", "still the thing"] {
        harness
            .responder
            .push(MockResponder::classified(
                "I'm not sure I follow.",
                "inquiry.amenities",
                0.3,
            ))
            .await;
        harness.send_whatsapp(PHONE, text).await.unwrap();
    }

    let mut escalations = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, Event::ConversationEscalated { .. }) {
            escalations += 1;
        }
    }
    assert_eq!(
        escalations, 1,
        "an already-escalated conversation must not re-fire"
    );
}

#[tokio::test]
async fn webchat_skips_guest_identification() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .responder
        .push(MockResponder::classified("Welcome!", "greeting", 0.99))
        .await;

    let outbound = harness
        .send(Channel::Webchat, "session-xyz", "hi there")
        .await
        .unwrap();

    use stayflow_core::traits::ConversationStore;
    let conversation = harness
        .conversations
        .get(&outbound.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert!(conversation.guest_id.is_none());
    assert_eq!(outbound.content, "Welcome!");
}

#[tokio::test]
async fn responder_failure_propagates_to_the_adapter_layer() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.responder.push_failure("model unavailable").await;

    let err = harness.send_whatsapp(PHONE, "hello?").await.unwrap_err();
    assert!(matches!(err, StayflowError::Responder { .. }));

    // The inbound message was persisted before the failure.
    use stayflow_core::traits::ConversationStore;
    let conversation = harness
        .conversations
        .find_or_create(Channel::Whatsapp, PHONE, None)
        .await
        .unwrap();
    let messages = harness
        .conversations
        .recent_messages(&conversation.id, 10)
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hello?");
}

#[tokio::test]
async fn unclassified_reply_is_held_with_generic_placeholder() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .responder
        .push(MockResponder::unclassified("Some freeform answer."))
        .await;

    let outbound = harness.send_whatsapp(PHONE, "???").await.unwrap();

    // No confidence means no auto-send.
    assert!(outbound.content.contains("looking into this"));
    assert!(
        outbound
            .annotations
            .iter()
            .any(|a| matches!(a, ResponseAnnotation::ResponsePendingApproval { .. }))
    );
}

#[tokio::test]
async fn concurrent_messages_share_one_conversation() {
    let harness = std::sync::Arc::new(TestHarness::builder().build().await.unwrap());

    for _ in 0..6 {
        harness
            .responder
            .push(MockResponder::classified("ok", "greeting", 0.95))
            .await;
    }

    let mut handles = Vec::new();
    for i in 0..6 {
        let harness = harness.clone();
        handles.push(tokio::spawn(async move {
            harness.send_whatsapp(PHONE, &format!("msg {i}")).await
        }));
    }

    let mut conversation_ids = Vec::new();
    for handle in handles {
        conversation_ids.push(handle.await.unwrap().unwrap().conversation_id);
    }
    conversation_ids.sort();
    conversation_ids.dedup();
    assert_eq!(conversation_ids.len(), 1);
}
