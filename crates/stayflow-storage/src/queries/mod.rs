// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules, one per entity.

pub mod approvals;
pub mod contexts;
pub mod conversations;
pub mod guests;
pub mod messages;
pub mod tasks;

use std::str::FromStr;

/// Parse a TEXT column into a strongly-typed enum inside a row mapper.
///
/// Conversion failures surface as `FromSqlConversionFailure` so they carry
/// the column index through rusqlite's error chain.
pub(crate) fn parse_col<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Current timestamp in the stored RFC 3339 format.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
