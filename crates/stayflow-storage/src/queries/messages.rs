// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation message CRUD operations.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::ConversationMessage;

use crate::database::{Database, map_tr_err};
use crate::queries::parse_col;

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationMessage> {
    Ok(ConversationMessage {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        direction: parse_col(2, row.get::<_, String>(2)?)?,
        sender_type: parse_col(3, row.get::<_, String>(3)?)?,
        content: row.get(4)?,
        content_type: parse_col(5, row.get::<_, String>(5)?)?,
        intent: row.get(6)?,
        confidence: row.get::<_, Option<f64>>(7)?.map(|v| v as f32),
        created_at: row.get(8)?,
    })
}

const SELECT_COLS: &str =
    "id, conversation_id, direction, sender_type, content, content_type, intent, confidence, created_at";

/// Insert a new message.
pub async fn insert(db: &Database, msg: &ConversationMessage) -> Result<(), StayflowError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages
                 (id, conversation_id, direction, sender_type, content, content_type, intent, confidence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.id,
                    msg.conversation_id,
                    msg.direction.to_string(),
                    msg.sender_type.to_string(),
                    msg.content,
                    msg.content_type.to_string(),
                    msg.intent,
                    msg.confidence.map(f64::from),
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent messages for a conversation, newest first.
pub async fn recent(
    db: &Database,
    conversation_id: &str,
    limit: u32,
) -> Result<Vec<ConversationMessage>, StayflowError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Count messages for a conversation by sender type. Used by tests and the
/// doctor command, not the hot path.
pub async fn count_by_sender(
    db: &Database,
    conversation_id: &str,
    sender_type: &str,
) -> Result<i64, StayflowError> {
    let conversation_id = conversation_id.to_string();
    let sender_type = sender_type.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1 AND sender_type = ?2",
                params![conversation_id, sender_type],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations;
    use stayflow_core::types::{Channel, ContentType, Direction, SenderType};
    use tempfile::tempdir;

    async fn setup() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let conv = conversations::find_or_create(&db, Channel::Whatsapp, "+15550001111", None)
            .await
            .unwrap();
        (db, conv.id, dir)
    }

    fn make_msg(id: &str, conversation_id: &str, sender: SenderType, ts: &str) -> ConversationMessage {
        ConversationMessage {
            id: id.to_string(),
            conversation_id: conversation_id.to_string(),
            direction: if sender == SenderType::Guest {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            sender_type: sender,
            content: format!("content of {id}"),
            content_type: ContentType::Text,
            intent: Some("request.maintenance.ac".into()),
            confidence: Some(0.9),
            created_at: ts.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_recent_newest_first() {
        let (db, conv_id, _dir) = setup().await;

        for (i, ts) in ["2026-02-01T00:00:01Z", "2026-02-01T00:00:02Z", "2026-02-01T00:00:03Z"]
            .iter()
            .enumerate()
        {
            let msg = make_msg(&format!("m{i}"), &conv_id, SenderType::Guest, ts);
            insert(&db, &msg).await.unwrap();
        }

        let messages = recent(&db, &conv_id, 10).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, "m2", "newest first");
        assert_eq!(messages[2].id, "m0");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_respects_limit() {
        let (db, conv_id, _dir) = setup().await;

        for i in 0..5 {
            let msg = make_msg(
                &format!("m{i}"),
                &conv_id,
                SenderType::Ai,
                &format!("2026-02-01T00:00:0{i}Z"),
            );
            insert(&db, &msg).await.unwrap();
        }

        let messages = recent(&db, &conv_id, 2).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "m4");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn round_trip_preserves_typed_fields() {
        let (db, conv_id, _dir) = setup().await;

        let msg = make_msg("m0", &conv_id, SenderType::Ai, "2026-02-01T00:00:00Z");
        insert(&db, &msg).await.unwrap();

        let fetched = recent(&db, &conv_id, 1).await.unwrap().remove(0);
        assert_eq!(fetched.sender_type, SenderType::Ai);
        assert_eq!(fetched.direction, Direction::Outbound);
        assert_eq!(fetched.content_type, ContentType::Text);
        assert_eq!(fetched.intent.as_deref(), Some("request.maintenance.ac"));
        assert!((fetched.confidence.unwrap() - 0.9).abs() < 1e-6);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn count_by_sender_filters() {
        let (db, conv_id, _dir) = setup().await;

        insert(&db, &make_msg("g1", &conv_id, SenderType::Guest, "2026-02-01T00:00:01Z"))
            .await
            .unwrap();
        insert(&db, &make_msg("a1", &conv_id, SenderType::Ai, "2026-02-01T00:00:02Z"))
            .await
            .unwrap();

        assert_eq!(count_by_sender(&db, &conv_id, "ai").await.unwrap(), 1);
        assert_eq!(count_by_sender(&db, &conv_id, "guest").await.unwrap(), 1);
        assert_eq!(count_by_sender(&db, &conv_id, "staff").await.unwrap(), 0);

        db.close().await.unwrap();
    }
}
