// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD and lifecycle operations.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::{NewTask, Task, TaskStatus};

use crate::database::{Database, map_tr_err};
use crate::queries::{now_rfc3339, parse_col};

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        message_id: row.get(2)?,
        task_type: parse_col(3, row.get::<_, String>(3)?)?,
        department: parse_col(4, row.get::<_, String>(4)?)?,
        room_number: row.get(5)?,
        description: row.get(6)?,
        priority: parse_col(7, row.get::<_, String>(7)?)?,
        status: parse_col(8, row.get::<_, String>(8)?)?,
        assigned_to: row.get(9)?,
        source: parse_col(10, row.get::<_, String>(10)?)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

const SELECT_COLS: &str = "id, conversation_id, message_id, task_type, department, room_number, \
                           description, priority, status, assigned_to, source, created_at, updated_at";

/// Insert a new task in `pending` status.
pub async fn insert(db: &Database, input: NewTask) -> Result<Task, StayflowError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = now_rfc3339();
    let task = Task {
        id: id.clone(),
        conversation_id: input.conversation_id,
        message_id: input.message_id,
        task_type: input.task_type,
        department: input.department,
        room_number: input.room_number,
        description: input.description,
        priority: input.priority,
        status: TaskStatus::Pending,
        assigned_to: None,
        source: input.source,
        created_at: now.clone(),
        updated_at: now,
    };

    let stored = task.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tasks
                 (id, conversation_id, message_id, task_type, department, room_number,
                  description, priority, status, assigned_to, source, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    stored.id,
                    stored.conversation_id,
                    stored.message_id,
                    stored.task_type.to_string(),
                    stored.department.to_string(),
                    stored.room_number,
                    stored.description,
                    stored.priority.to_string(),
                    stored.status.to_string(),
                    stored.assigned_to,
                    stored.source.to_string(),
                    stored.created_at,
                    stored.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(task)
}

/// Get a task by ID.
pub async fn get(db: &Database, id: &str) -> Result<Option<Task>, StayflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_task) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Transition a task's status, optionally assigning it.
///
/// Returns the updated task, or `NotFound` when the id is unknown.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: TaskStatus,
    assigned_to: Option<&str>,
) -> Result<Task, StayflowError> {
    let id_owned = id.to_string();
    let assigned_to = assigned_to.map(|s| s.to_string());
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = match &assigned_to {
                Some(staff) => conn.execute(
                    "UPDATE tasks SET status = ?1, assigned_to = ?2,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?3",
                    params![status.to_string(), staff, id_owned],
                )?,
                None => conn.execute(
                    "UPDATE tasks SET status = ?1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?2",
                    params![status.to_string(), id_owned],
                )?,
            };
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(StayflowError::NotFound {
            entity: "task",
            id: id.to_string(),
        });
    }

    get(db, id).await?.ok_or_else(|| StayflowError::NotFound {
        entity: "task",
        id: id.to_string(),
    })
}
