//! Scheduler configuration
//!
//! Loaded from the `[scheduler]` table of the widget config, or built directly.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// What happens to a request that is replaced before its pass starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupersedePolicy {
    /// Reject it with [`RenderError::Superseded`](crate::RenderError::Superseded)
    #[default]
    Reject,
    /// Settle it together with the request that replaced it
    Coalesce,
}

/// Render scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay before the first pass after the pending slot was empty
    pub initial_delay_ms: u64,
    /// Delay before a follow-up pass when data changed mid-render,
    /// giving the host a chance to paint between passes
    pub repaint_delay_ms: u64,
    pub supersede_policy: SupersedePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 0,
            repaint_delay_ms: 1,
            supersede_policy: SupersedePolicy::Reject,
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse scheduler config")
    }

    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub const fn repaint_delay(&self) -> Duration {
        Duration::from_millis(self.repaint_delay_ms)
    }

    #[must_use]
    pub fn with_supersede_policy(mut self, policy: SupersedePolicy) -> Self {
        self.supersede_policy = policy;
        self
    }

    #[must_use]
    pub fn with_repaint_delay(mut self, delay: Duration) -> Self {
        self.repaint_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.initial_delay(), Duration::ZERO);
        assert_eq!(config.repaint_delay(), Duration::from_millis(1));
        assert_eq!(config.supersede_policy, SupersedePolicy::Reject);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SchedulerConfig::from_toml_str(
            r#"
repaint_delay_ms = 16
supersede_policy = "coalesce"
"#,
        )
        .unwrap();
        assert_eq!(config.initial_delay_ms, 0);
        assert_eq!(config.repaint_delay(), Duration::from_millis(16));
        assert_eq!(config.supersede_policy, SupersedePolicy::Coalesce);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(SchedulerConfig::from_toml_str(r#"supersede_policy = "drop""#).is_err());
    }
}
