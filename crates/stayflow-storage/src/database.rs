// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional `Connection` instances for writes.

use std::path::Path;

use stayflow_core::error::StayflowError;
use tokio_rusqlite::Connection;
use tracing::info;

use crate::migrations::run_migrations;

/// Handle to the SQLite database, shared by all stores.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, StayflowError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit WAL control (used by config-driven startup).
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, StayflowError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StayflowError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| StayflowError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            run_migrations(conn)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database, flushing pending writes.
    pub async fn close(self) -> Result<(), StayflowError> {
        self.conn
            .close()
            .await
            .map_err(|e| StayflowError::Storage {
                source: Box::new(e),
            })
    }
}

/// Map a tokio-rusqlite error into the platform error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> StayflowError {
    StayflowError::Storage {
        source: Box::new(e),
    }
}

/// A migration error wrapper so refinery failures can cross the
/// tokio-rusqlite closure boundary.
#[derive(Debug, thiserror::Error)]
#[error("migration failed: {0}")]
pub struct MigrationError(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        // All core tables exist after migration.
        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok(names)
            })
            .await
            .unwrap();

        for expected in ["conversations", "messages", "guests", "tasks", "approvals"] {
            assert!(
                tables.iter().any(|t| t == expected),
                "missing table {expected}, got {tables:?}"
            );
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();

        // Migrations are tracked; a second open must not fail.
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
        assert!(db_path.exists());
    }
}
