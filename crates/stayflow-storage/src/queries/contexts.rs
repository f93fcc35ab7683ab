// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest-context matching queries.
//!
//! A `guest_contexts` row links a conversation to a guest record. Stay
//! details (room, loyalty tier, language) are filled by the PMS integration
//! when available; the context is reassembled on every read, never cached.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::GuestContext;

use crate::database::{Database, map_tr_err};
use crate::queries::now_rfc3339;

/// Link a conversation to the guest identified by `phone`.
///
/// A no-op when no guest record exists for the phone number; matching is
/// best-effort enrichment, not identification.
pub async fn match_conversation(
    db: &Database,
    conversation_id: &str,
    phone: &str,
) -> Result<(), StayflowError> {
    let conversation_id = conversation_id.to_string();
    let phone = phone.to_string();
    let now = now_rfc3339();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO guest_contexts (conversation_id, guest_id, matched_at)
                 SELECT ?1, id, ?2 FROM guests WHERE phone = ?3
                 ON CONFLICT (conversation_id) DO NOTHING",
                params![conversation_id, now, phone],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Assemble the router-facing guest context for a conversation.
pub async fn context_for_conversation(
    db: &Database,
    conversation_id: &str,
) -> Result<Option<GuestContext>, StayflowError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT g.id, g.first_name, g.last_name, c.room_number, g.is_vip,
                        c.loyalty_tier, c.language
                 FROM guest_contexts c
                 JOIN guests g ON g.id = c.guest_id
                 WHERE c.conversation_id = ?1",
            )?;
            let result = stmt.query_row(params![conversation_id], |row| {
                Ok(GuestContext {
                    guest_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    room_number: row.get(3)?,
                    is_vip: row.get::<_, i64>(4)? != 0,
                    loyalty_tier: row.get(5)?,
                    language: row.get(6)?,
                })
            });
            match result {
                Ok(ctx) => Ok(Some(ctx)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Record stay details for a matched conversation. Fed by the PMS
/// integration; also used to seed demo and test fixtures.
pub async fn set_stay_details(
    db: &Database,
    conversation_id: &str,
    room_number: Option<&str>,
    loyalty_tier: Option<&str>,
    language: Option<&str>,
) -> Result<(), StayflowError> {
    let conversation_id = conversation_id.to_string();
    let room_number = room_number.map(|s| s.to_string());
    let loyalty_tier = loyalty_tier.map(|s| s.to_string());
    let language = language.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE guest_contexts
                 SET room_number = ?1, loyalty_tier = ?2, language = ?3
                 WHERE conversation_id = ?4",
                params![room_number, loyalty_tier, language, conversation_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
