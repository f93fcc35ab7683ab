// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Stayflow guest-messaging platform.
//!
//! Provides the [`Database`] connection wrapper (WAL mode, single background
//! writer thread, embedded refinery migrations) and SQLite-backed
//! implementations of the service traits from `stayflow-core`.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod stores;

pub use database::Database;
pub use stores::{
    SqliteApprovalStore, SqliteConversationStore, SqliteGuestContextSource, SqliteGuestDirectory,
    SqliteTaskStore,
};

use stayflow_config::StorageConfig;
use stayflow_core::error::StayflowError;

/// Open the database described by the storage configuration.
pub async fn open_from_config(config: &StorageConfig) -> Result<Database, StayflowError> {
    Database::open_with_options(&config.database_path, config.wal_mode).await
}
