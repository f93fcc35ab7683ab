// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::{Channel, Conversation, ConversationState};

use crate::database::{Database, map_tr_err};
use crate::queries::{now_rfc3339, parse_col};

fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        channel: parse_col(1, row.get::<_, String>(1)?)?,
        channel_id: row.get(2)?,
        guest_id: row.get(3)?,
        state: parse_col(4, row.get::<_, String>(4)?)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const SELECT_COLS: &str = "id, channel, channel_id, guest_id, state, created_at, updated_at";

/// Find the conversation for `(channel, channel_id)` or create it.
///
/// Runs as one transaction: the `UNIQUE (channel, channel_id)` constraint
/// plus `ON CONFLICT DO NOTHING` and the follow-up read make concurrent
/// calls for the same key converge on one row. A known guest id backfills a
/// row created before the guest was identified.
pub async fn find_or_create(
    db: &Database,
    channel: Channel,
    channel_id: &str,
    guest_id: Option<&str>,
) -> Result<Conversation, StayflowError> {
    let channel_id = channel_id.to_string();
    let guest_id = guest_id.map(|s| s.to_string());
    let new_id = uuid::Uuid::new_v4().to_string();
    let now = now_rfc3339();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO conversations (id, channel, channel_id, guest_id, state, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 'active', ?5, ?5)
                 ON CONFLICT (channel, channel_id) DO NOTHING",
                params![new_id, channel.to_string(), channel_id, guest_id, now],
            )?;

            if let Some(ref gid) = guest_id {
                tx.execute(
                    "UPDATE conversations SET guest_id = ?1
                     WHERE channel = ?2 AND channel_id = ?3 AND guest_id IS NULL",
                    params![gid, channel.to_string(), channel_id],
                )?;
            }

            let conversation = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLS} FROM conversations
                     WHERE channel = ?1 AND channel_id = ?2"
                ))?;
                stmt.query_row(params![channel.to_string(), channel_id], row_to_conversation)?
            };

            tx.commit()?;
            Ok(conversation)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a conversation by ID.
pub async fn get(db: &Database, id: &str) -> Result<Option<Conversation>, StayflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLS} FROM conversations WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_conversation);
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Update a conversation's state and `updated_at` timestamp.
pub async fn set_state(
    db: &Database,
    id: &str,
    state: ConversationState,
) -> Result<(), StayflowError> {
    let id = id.to_string();
    let id_for_query = id.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE conversations
                 SET state = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![state.to_string(), id_for_query],
            )?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)
        .and_then(|changed| {
            if changed == 0 {
                Err(StayflowError::NotFound {
                    entity: "conversation",
                    id: id.to_string(),
                })
            } else {
                Ok(())
            }
        })
}
