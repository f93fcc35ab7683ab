// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: threshold ranges, non-empty paths, and known action names.

use crate::diagnostic::ConfigError;
use crate::model::StayflowConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StayflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    check_unit_interval(
        &mut errors,
        "routing.min_confidence",
        config.routing.min_confidence,
    );
    check_unit_interval(
        &mut errors,
        "escalation.low_confidence_threshold",
        config.escalation.low_confidence_threshold,
    );
    check_unit_interval(
        &mut errors,
        "autonomy.approval_threshold",
        config.autonomy.approval_threshold,
    );
    check_unit_interval(
        &mut errors,
        "autonomy.urgent_threshold",
        config.autonomy.urgent_threshold,
    );

    if config.autonomy.urgent_threshold > config.autonomy.approval_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "autonomy.urgent_threshold ({}) must not exceed autonomy.approval_threshold ({})",
                config.autonomy.urgent_threshold, config.autonomy.approval_threshold
            ),
        });
    }

    if config.escalation.low_confidence_streak == 0 {
        errors.push(ConfigError::Validation {
            message: "escalation.low_confidence_streak must be at least 1".to_string(),
        });
    }

    if config.escalation.history_window == 0 {
        errors.push(ConfigError::Validation {
            message: "escalation.history_window must be at least 1".to_string(),
        });
    }

    for action in config.autonomy.action_levels.keys() {
        if action.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "autonomy.action_levels contains an empty action name".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_unit_interval(errors: &mut Vec<ConfigError>, key: &str, value: f32) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::Validation {
            message: format!("{key} must be within 0.0..=1.0, got {value}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&StayflowConfig::default()).is_ok());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut config = StayflowConfig::default();
        config.routing.min_confidence = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("routing.min_confidence"))
        );
    }

    #[test]
    fn urgent_above_approval_rejected() {
        let mut config = StayflowConfig::default();
        config.autonomy.approval_threshold = 0.5;
        config.autonomy.urgent_threshold = 0.9;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_streak_rejected() {
        let mut config = StayflowConfig::default();
        config.escalation.low_confidence_streak = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn collects_all_errors_without_failing_fast() {
        let mut config = StayflowConfig::default();
        config.storage.database_path = "  ".to_string();
        config.routing.min_confidence = -0.1;
        config.escalation.history_window = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
