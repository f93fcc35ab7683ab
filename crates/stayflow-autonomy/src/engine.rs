// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Autonomy policy gate.
//!
//! Every AI-initiated action (`respond_to_guest`, `create_housekeeping_task`,
//! ...) is gated by a per-action autonomy level plus global confidence
//! thresholds. The two checks are combined with logical AND by the caller: an
//! action executes unsupervised only if the action-level policy allows it
//! *and* confidence clears the approval threshold.
//!
//! Settings are loaded once and cached behind an `ArcSwap`; configuration
//! changes call [`AutonomyEngine::reload`] explicitly. The cache is consulted
//! on every message and is never re-read from its source per message.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use stayflow_config::{AutonomyConfig, AutonomyLevel};
use stayflow_core::error::StayflowError;
use stayflow_core::types::GuestContext;
use tracing::{debug, info};

/// Resolved autonomy settings, immutable once loaded.
#[derive(Debug, Clone)]
pub struct AutonomySettings {
    pub default_level: AutonomyLevel,
    pub action_levels: HashMap<String, AutonomyLevel>,
    pub approval_threshold: f32,
    pub urgent_threshold: f32,
    pub require_approval_for_vip: bool,
}

impl From<&AutonomyConfig> for AutonomySettings {
    fn from(config: &AutonomyConfig) -> Self {
        Self {
            default_level: config.default_level,
            action_levels: config.action_levels.clone(),
            approval_threshold: config.approval_threshold,
            urgent_threshold: config.urgent_threshold,
            require_approval_for_vip: config.require_approval_for_vip,
        }
    }
}

/// Source of autonomy settings (static config, database-backed admin
/// settings, ...).
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn load(&self) -> Result<AutonomySettings, StayflowError>;
}

/// Settings provider backed by the static configuration file.
pub struct ConfigSettingsProvider {
    config: AutonomyConfig,
}

impl ConfigSettingsProvider {
    pub fn new(config: AutonomyConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SettingsProvider for ConfigSettingsProvider {
    async fn load(&self) -> Result<AutonomySettings, StayflowError> {
        Ok(AutonomySettings::from(&self.config))
    }
}

/// Outcome of the confidence gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceGate {
    /// Confidence clears the approval threshold; the action may auto-execute.
    Auto,
    /// Confidence is below the threshold (or absent); staff approval is
    /// required regardless of the action-level setting.
    ApprovalRequired,
}

/// Gates AI-initiated actions against the cached autonomy policy.
pub struct AutonomyEngine {
    provider: Arc<dyn SettingsProvider>,
    cache: ArcSwapOption<AutonomySettings>,
}

impl AutonomyEngine {
    pub fn new(provider: Arc<dyn SettingsProvider>) -> Self {
        Self {
            provider,
            cache: ArcSwapOption::const_empty(),
        }
    }

    /// Convenience constructor over static configuration.
    pub fn from_config(config: AutonomyConfig) -> Self {
        Self::new(Arc::new(ConfigSettingsProvider::new(config)))
    }

    /// Load settings into the cache if not already loaded.
    pub async fn ensure_loaded(&self) -> Result<(), StayflowError> {
        if self.cache.load().is_none() {
            let settings = self.provider.load().await?;
            debug!(
                approval_threshold = settings.approval_threshold,
                actions = settings.action_levels.len(),
                "autonomy settings loaded"
            );
            self.cache.store(Some(Arc::new(settings)));
        }
        Ok(())
    }

    /// Re-read settings from the provider, replacing the cache.
    ///
    /// Called on configuration change; the cache is never polled.
    pub async fn reload(&self) -> Result<(), StayflowError> {
        let settings = self.provider.load().await?;
        info!("autonomy settings reloaded");
        self.cache.store(Some(Arc::new(settings)));
        Ok(())
    }

    /// Whether the action-level policy permits autonomous execution of
    /// `action_type` for this guest.
    ///
    /// `L1` actions never auto-execute. `L2` actions auto-execute unless the
    /// policy routes VIP guests through review.
    pub async fn can_auto_execute(
        &self,
        action_type: &str,
        guest: Option<&GuestContext>,
    ) -> Result<bool, StayflowError> {
        let settings = self.settings().await?;

        let level = settings
            .action_levels
            .get(action_type)
            .copied()
            .unwrap_or(settings.default_level);

        let allowed = match level {
            AutonomyLevel::L1 => false,
            AutonomyLevel::L2 => {
                !(settings.require_approval_for_vip && guest.is_some_and(|g| g.is_vip))
            }
        };

        debug!(action_type, ?level, allowed, "autonomy action check");
        Ok(allowed)
    }

    /// Compare classification confidence against the approval threshold.
    ///
    /// Unclassified replies (no confidence) never auto-send.
    pub async fn should_auto_execute_by_confidence(
        &self,
        confidence: Option<f32>,
    ) -> Result<ConfidenceGate, StayflowError> {
        let settings = self.settings().await?;
        let gate = match confidence {
            Some(c) if c >= settings.approval_threshold => ConfidenceGate::Auto,
            _ => ConfidenceGate::ApprovalRequired,
        };
        Ok(gate)
    }

    /// Whether a deferred action should be flagged for urgent staff review.
    pub async fn requires_urgent_review(
        &self,
        confidence: Option<f32>,
    ) -> Result<bool, StayflowError> {
        let settings = self.settings().await?;
        Ok(confidence.is_none_or(|c| c < settings.urgent_threshold))
    }

    async fn settings(&self) -> Result<Arc<AutonomySettings>, StayflowError> {
        self.ensure_loaded().await?;
        self.cache
            .load_full()
            .ok_or_else(|| StayflowError::Internal("autonomy settings cache empty".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn vip_guest() -> GuestContext {
        GuestContext {
            guest_id: "g1".into(),
            is_vip: true,
            ..GuestContext::default()
        }
    }

    fn config_with(action: &str, level: AutonomyLevel) -> AutonomyConfig {
        let mut config = AutonomyConfig::default();
        config.action_levels.insert(action.to_string(), level);
        config
    }

    #[tokio::test]
    async fn l1_action_never_auto_executes() {
        let engine =
            AutonomyEngine::from_config(config_with("respond_to_guest", AutonomyLevel::L1));
        assert!(!engine.can_auto_execute("respond_to_guest", None).await.unwrap());
    }

    #[tokio::test]
    async fn l2_action_auto_executes_by_default() {
        let engine = AutonomyEngine::from_config(AutonomyConfig::default());
        assert!(
            engine
                .can_auto_execute("create_housekeeping_task", None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn per_action_override_beats_default() {
        let mut config = config_with("create_maintenance_task", AutonomyLevel::L1);
        config.default_level = AutonomyLevel::L2;
        let engine = AutonomyEngine::from_config(config);

        assert!(!engine
            .can_auto_execute("create_maintenance_task", None)
            .await
            .unwrap());
        assert!(engine.can_auto_execute("respond_to_guest", None).await.unwrap());
    }

    #[tokio::test]
    async fn vip_review_policy_blocks_l2() {
        let mut config = AutonomyConfig::default();
        config.require_approval_for_vip = true;
        let engine = AutonomyEngine::from_config(config);

        assert!(!engine
            .can_auto_execute("respond_to_guest", Some(&vip_guest()))
            .await
            .unwrap());
        // Non-VIP unaffected.
        assert!(engine.can_auto_execute("respond_to_guest", None).await.unwrap());
    }

    #[tokio::test]
    async fn confidence_gate_at_threshold() {
        let engine = AutonomyEngine::from_config(AutonomyConfig::default());
        assert_eq!(
            engine
                .should_auto_execute_by_confidence(Some(0.7))
                .await
                .unwrap(),
            ConfidenceGate::Auto
        );
        assert_eq!(
            engine
                .should_auto_execute_by_confidence(Some(0.69))
                .await
                .unwrap(),
            ConfidenceGate::ApprovalRequired
        );
    }

    #[tokio::test]
    async fn missing_confidence_requires_approval() {
        let engine = AutonomyEngine::from_config(AutonomyConfig::default());
        assert_eq!(
            engine.should_auto_execute_by_confidence(None).await.unwrap(),
            ConfidenceGate::ApprovalRequired
        );
    }

    #[tokio::test]
    async fn urgent_review_flag() {
        let engine = AutonomyEngine::from_config(AutonomyConfig::default());
        assert!(engine.requires_urgent_review(Some(0.2)).await.unwrap());
        assert!(!engine.requires_urgent_review(Some(0.5)).await.unwrap());
        assert!(engine.requires_urgent_review(None).await.unwrap());
    }

    #[tokio::test]
    async fn settings_load_once_and_reload_explicitly() {
        struct CountingProvider {
            loads: AtomicU32,
        }

        #[async_trait]
        impl SettingsProvider for CountingProvider {
            async fn load(&self) -> Result<AutonomySettings, StayflowError> {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Ok(AutonomySettings::from(&AutonomyConfig::default()))
            }
        }

        let provider = Arc::new(CountingProvider {
            loads: AtomicU32::new(0),
        });
        let engine = AutonomyEngine::new(provider.clone());

        // Consulted many times, loaded once.
        for _ in 0..5 {
            engine.can_auto_execute("respond_to_guest", None).await.unwrap();
        }
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);

        engine.reload().await.unwrap();
        assert_eq!(provider.loads.load(Ordering::SeqCst), 2);
    }
}
