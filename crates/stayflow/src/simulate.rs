// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stayflow simulate`: drive one guest message through the full pipeline.
//!
//! Uses a keyword responder that classifies against the taxonomy's example
//! utterances, so the whole pipeline is exercisable without an AI provider.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use stayflow_config::StayflowConfig;
use stayflow_core::StayflowError;
use stayflow_core::traits::Responder;
use stayflow_core::types::{
    Channel, ContentType, Conversation, GuestContext, InboundMessage, ResponderOutput,
};
use tracing::info;

use crate::wiring;

/// Classifies by word overlap with taxonomy example utterances.
///
/// Demo-quality only: the production responder is an AI provider behind the
/// same trait.
pub struct KeywordResponder;

impl KeywordResponder {
    fn classify(text: &str) -> Option<(&'static str, f32)> {
        let words: HashSet<String> = tokenize(text);
        if words.is_empty() {
            return None;
        }

        let mut best: Option<(&'static str, f32)> = None;
        for def in stayflow_taxonomy::all() {
            for example in def.examples {
                let example_words = tokenize(example);
                if example_words.is_empty() {
                    continue;
                }
                let overlap = example_words.intersection(&words).count();
                let score = overlap as f32 / example_words.len() as f32;
                if score > best.map(|(_, s)| s).unwrap_or(0.0) {
                    best = Some((def.name, score));
                }
            }
        }

        // Map overlap onto a plausible confidence band.
        best.filter(|(_, score)| *score >= 0.34)
            .map(|(name, score)| (name, (0.5 + score / 2.0).min(0.98)))
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn generate(
        &self,
        _conversation: &Conversation,
        inbound: &InboundMessage,
        guest_context: Option<&GuestContext>,
    ) -> Result<ResponderOutput, StayflowError> {
        let classified = Self::classify(&inbound.content);
        let greeting = guest_context
            .and_then(|c| c.first_name.as_deref())
            .map(|name| format!("Of course, {name}! "))
            .unwrap_or_default();

        let content = match classified {
            Some((intent, _)) => {
                let description = stayflow_taxonomy::definition(intent)
                    .map(|d| d.description.to_lowercase())
                    .unwrap_or_else(|| "your request".to_string());
                format!("{greeting}I've noted this: {description}. Our team is on it.")
            }
            None => format!("{greeting}Thanks for your message, let me look into that for you."),
        };

        Ok(ResponderOutput {
            content,
            intent: classified.map(|(intent, _)| intent.to_string()),
            confidence: classified.map(|(_, confidence)| confidence),
            entities: None,
            metadata: None,
        })
    }
}

/// Run the simulate command.
pub async fn run(
    config: &StayflowConfig,
    channel: Channel,
    from: &str,
    message: &str,
) -> Result<(), StayflowError> {
    let app = wiring::build(config, Arc::new(KeywordResponder)).await?;

    let inbound = InboundMessage {
        id: uuid::Uuid::new_v4().to_string(),
        channel,
        channel_id: from.to_string(),
        content: message.to_string(),
        content_type: ContentType::Text,
        timestamp: chrono::Utc::now(),
        raw: None,
    };

    info!(%channel, from, "simulating inbound message");
    let outbound = app.processor.process(inbound).await?;

    println!("conversation: {}", outbound.conversation_id);
    println!("reply: {}", outbound.content);
    for annotation in &outbound.annotations {
        println!("outcome: {}", serde_json::to_string(annotation).unwrap_or_default());
    }

    Ok(())
}
