// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest identity CRUD operations.

use rusqlite::params;
use stayflow_core::error::StayflowError;
use stayflow_core::types::Guest;

use crate::database::{Database, map_tr_err};
use crate::queries::now_rfc3339;

fn row_to_guest(row: &rusqlite::Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        phone: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        is_vip: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}

const SELECT_COLS: &str = "id, phone, first_name, last_name, is_vip, created_at";

/// Find the guest with this phone number, creating a bare record if unknown.
///
/// The `UNIQUE` constraint on `phone` plus `ON CONFLICT DO NOTHING` keeps
/// concurrent identification of the same caller on one record.
pub async fn find_or_create_by_phone(db: &Database, phone: &str) -> Result<Guest, StayflowError> {
    let phone = phone.to_string();
    let new_id = uuid::Uuid::new_v4().to_string();
    let now = now_rfc3339();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO guests (id, phone, is_vip, created_at)
                 VALUES (?1, ?2, 0, ?3)
                 ON CONFLICT (phone) DO NOTHING",
                params![new_id, phone, now],
            )?;
            let guest = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLS} FROM guests WHERE phone = ?1"
                ))?;
                stmt.query_row(params![phone], row_to_guest)?
            };
            tx.commit()?;
            Ok(guest)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a guest by ID.
pub async fn get(db: &Database, id: &str) -> Result<Option<Guest>, StayflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SELECT_COLS} FROM guests WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_guest) {
                Ok(guest) => Ok(Some(guest)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Update a guest's profile fields. Used by seeding and admin surfaces.
pub async fn update_profile(
    db: &Database,
    id: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    is_vip: bool,
) -> Result<(), StayflowError> {
    let id = id.to_string();
    let first_name = first_name.map(|s| s.to_string());
    let last_name = last_name.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE guests SET first_name = ?1, last_name = ?2, is_vip = ?3 WHERE id = ?4",
                params![first_name, last_name, is_vip as i64, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
