// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval item CRUD operations.
//!
//! `action_data` is stored as serialized JSON and returned byte-for-byte:
//! the approval queue executes the snapshot verbatim, never a re-derivation.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::{ApprovalItem, ApprovalStatus, NewApprovalItem};

use crate::database::{Database, map_tr_err};
use crate::queries::{now_rfc3339, parse_col};

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApprovalItem> {
    let action_data: String = row.get(3)?;
    let action_data = serde_json::from_str(&action_data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ApprovalItem {
        id: row.get(0)?,
        kind: parse_col(1, row.get::<_, String>(1)?)?,
        action_type: row.get(2)?,
        action_data,
        conversation_id: row.get(4)?,
        guest_id: row.get(5)?,
        status: parse_col(6, row.get::<_, String>(6)?)?,
        decided_by: row.get(7)?,
        created_at: row.get(8)?,
        decided_at: row.get(9)?,
    })
}

const SELECT_COLS: &str = "id, kind, action_type, action_data, conversation_id, guest_id, \
                           status, decided_by, created_at, decided_at";

/// Insert a new pending approval item.
pub async fn insert(db: &Database, input: NewApprovalItem) -> Result<ApprovalItem, StayflowError> {
    let item = ApprovalItem {
        id: uuid::Uuid::new_v4().to_string(),
        kind: input.kind,
        action_type: input.action_type,
        action_data: input.action_data,
        conversation_id: input.conversation_id,
        guest_id: input.guest_id,
        status: ApprovalStatus::Pending,
        decided_by: None,
        created_at: now_rfc3339(),
        decided_at: None,
    };

    let stored = item.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO approvals
                 (id, kind, action_type, action_data, conversation_id, guest_id,
                  status, decided_by, created_at, decided_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    stored.id,
                    stored.kind.to_string(),
                    stored.action_type,
                    stored.action_data.to_string(),
                    stored.conversation_id,
                    stored.guest_id,
                    stored.status.to_string(),
                    stored.decided_by,
                    stored.created_at,
                    stored.decided_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(item)
}

/// Get an approval item by ID.
pub async fn get(db: &Database, id: &str) -> Result<Option<ApprovalItem>, StayflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SELECT_COLS} FROM approvals WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_item) {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a pending item as decided.
///
/// The guarded `WHERE status = 'pending'` makes the transition atomic: a
/// second decision observes zero changed rows and fails with `InvalidState`
/// instead of overwriting the first.
pub async fn mark_decided(
    db: &Database,
    id: &str,
    status: ApprovalStatus,
    decided_by: &str,
) -> Result<ApprovalItem, StayflowError> {
    let id_owned = id.to_string();
    let decided_by = decided_by.to_string();
    let status_str = status.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE approvals
                 SET status = ?1, decided_by = ?2,
                     decided_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3 AND status = 'pending'",
                params![status_str, decided_by, id_owned],
            )?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return match get(db, id).await? {
            Some(item) => Err(StayflowError::InvalidState(format!(
                "approval {id} already decided ({})",
                item.status
            ))),
            None => Err(StayflowError::NotFound {
                entity: "approval",
                id: id.to_string(),
            }),
        };
    }

    get(db, id).await?.ok_or_else(|| StayflowError::NotFound {
        entity: "approval",
        id: id.to_string(),
    })
}

/// Oldest pending items first.
pub async fn pending(db: &Database, limit: u32) -> Result<Vec<ApprovalItem>, StayflowError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLS} FROM approvals
                 WHERE status = 'pending'
                 ORDER BY created_at ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], row_to_item)?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}
