// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Stayflow guest-messaging platform.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use stayflow_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("assistant name: {}", config.agent.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, AutonomyConfig, AutonomyLevel, EscalationConfig, RoutingConfig, StayflowConfig,
    StorageConfig,
};

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads config from TOML files and env vars via
/// Figment, then runs post-deserialization validation. Figment errors are
/// converted to diagnostics with typo suggestions.
pub fn load_and_validate() -> Result<StayflowConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<StayflowConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
