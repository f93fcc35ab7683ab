// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process event bus for pipeline notifications.
//!
//! Events are fire-and-forget: they drive downstream notification and audit,
//! never control flow. Emitting with no subscribers, or past a lagging
//! subscriber, must never block or fail the message pipeline.

use serde::{Deserialize, Serialize};
use stayflow_core::types::{Channel, Department, Priority};
use tokio::sync::broadcast;
use tracing::trace;

/// Buffered events per subscriber before the oldest are dropped.
const BUS_CAPACITY: usize = 256;

/// Pipeline events observable by downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MessageReceived {
        conversation_id: String,
        message_id: String,
        channel: Channel,
    },
    MessageSent {
        conversation_id: String,
        message_id: String,
    },
    TaskCreated {
        task_id: String,
        department: Department,
        priority: Priority,
    },
    ConversationEscalated {
        conversation_id: String,
        reasons: Vec<String>,
    },
}

/// Broadcast-backed event bus.
///
/// Cloneable and cheap to share; all clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish an event. Fire-and-forget: a send with no live subscribers is
    /// not an error.
    pub fn emit(&self, event: Event) {
        let receivers = self.tx.receiver_count();
        trace!(?event, receivers, "event emitted");
        let _ = self.tx.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(Event::MessageSent {
            conversation_id: "conv-1".into(),
            message_id: "msg-1".into(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            Event::MessageSent {
                conversation_id: "conv-1".into(),
                message_id: "msg-1".into(),
            }
        );
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        // No subscriber; must not panic or error.
        bus.emit(Event::ConversationEscalated {
            conversation_id: "conv-2".into(),
            reasons: vec!["human_requested".into()],
        });
    }

    #[tokio::test]
    async fn clones_share_one_channel() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let mut rx = bus.subscribe();

        clone.emit(Event::TaskCreated {
            task_id: "task-1".into(),
            department: Department::Maintenance,
            priority: Priority::High,
        });

        assert!(matches!(rx.recv().await.unwrap(), Event::TaskCreated { .. }));
    }

    #[test]
    fn event_serde_tagged() {
        let event = Event::MessageReceived {
            conversation_id: "c".into(),
            message_id: "m".into(),
            channel: Channel::Whatsapp,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message_received");
        assert_eq!(json["channel"], "whatsapp");
    }
}
