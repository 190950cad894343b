//! Retrain reconciliation timing.
//!
//! The backend exposes no completion signal for a retrain, so the client
//! re-reads the corpus after a delay. These values only tune that polling;
//! none of them guarantees the server has finished.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

const fn default_reconcile_delay_ms() -> u64 {
    3_000
}

const fn default_max_attempts() -> u32 {
    1
}

const fn default_backoff_factor() -> f64 {
    2.0
}

const fn default_max_delay_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrainConfig {
    /// Wait before the first reconciliation read.
    #[serde(default = "default_reconcile_delay_ms")]
    pub reconcile_delay_ms: u64,

    /// Number of reconciliation reads before giving up on untrained entries.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Multiplier applied to the delay after each attempt.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for a single delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            reconcile_delay_ms: default_reconcile_delay_ms(),
            max_attempts: default_max_attempts(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetrainConfig {
    #[must_use]
    pub const fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `max_attempts` is zero,
    /// `backoff_factor` is below 1 or not finite, or the first delay exceeds
    /// the delay cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrain.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retrain.backoff_factor".into(),
                reason: format!("must be a finite number >= 1.0, got {}", self.backoff_factor),
            });
        }
        if self.reconcile_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "retrain.reconcile_delay_ms".into(),
                reason: format!(
                    "must not exceed retrain.max_delay_ms ({}), got {}",
                    self.max_delay_ms, self.reconcile_delay_ms
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_single_delayed_read() {
        let config = RetrainConfig::default();
        assert_eq!(config.reconcile_delay(), Duration::from_secs(3));
        assert_eq!(config.max_attempts, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = RetrainConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retrain.max_attempts"));
    }

    #[test]
    fn shrinking_backoff_rejected() {
        let config = RetrainConfig {
            backoff_factor: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn first_delay_above_cap_rejected() {
        let config = RetrainConfig {
            reconcile_delay_ms: 90_000,
            max_delay_ms: 60_000,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retrain.reconcile_delay_ms"));
    }

    #[test]
    fn first_delay_equal_to_cap_accepted() {
        let config = RetrainConfig {
            reconcile_delay_ms: 60_000,
            max_delay_ms: 60_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
