// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Stayflow guest-messaging platform.

use thiserror::Error;

/// The primary error type used across all Stayflow services and the
/// message-processing pipeline.
#[derive(Debug, Error)]
pub enum StayflowError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// AI responder errors (API failure, malformed output, token limits).
    #[error("responder error: {message}")]
    Responder {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Channel adapter errors (delivery failure, malformed payload, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The requested operation conflicts with the entity's current state
    /// (e.g. deciding an approval item that is already decided).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_readable() {
        let e = StayflowError::NotFound {
            entity: "conversation",
            id: "conv-42".into(),
        };
        assert_eq!(e.to_string(), "conversation not found: conv-42");

        let e = StayflowError::Config("bad toml".into());
        assert_eq!(e.to_string(), "configuration error: bad toml");
    }

    #[test]
    fn error_variants_construct() {
        let _storage = StayflowError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        let _responder = StayflowError::Responder {
            message: "model timeout".into(),
            source: None,
        };
        let _channel = StayflowError::Channel {
            message: "delivery failed".into(),
            source: None,
        };
        let _invalid = StayflowError::InvalidState("already decided".into());
        let _internal = StayflowError::Internal("unreachable".into());
    }
}
