//! Ledger configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What `login` does when a session is already active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginPolicy {
    /// Fail with `AlreadyAuthenticated`
    #[default]
    Reject,
    /// Drop the active session and start the new one
    Replace,
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Points awarded when a referral completes
    pub referral_reward_points: u64,
    /// Smallest allowed withdrawal
    pub min_withdrawal: u64,
    /// Quantum the withdrawal ceiling is rounded down to
    pub withdrawal_step: u64,
    /// Preset withdrawal amounts offered to the user
    pub quick_amounts: Vec<u64>,
    /// Double-login handling
    pub login_policy: LoginPolicy,
    /// Append an `earned` entry when a referral completes
    pub record_earned_transactions: bool,
    /// How many referrals `recent_referrals` returns
    pub recent_referrals_limit: usize,
}

impl LedgerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.referral_reward_points == 0 {
            return Err(ConfigError::Invalid {
                field: "referral_reward_points",
                reason: "must be positive",
            });
        }
        if self.min_withdrawal == 0 {
            return Err(ConfigError::Invalid {
                field: "min_withdrawal",
                reason: "must be positive",
            });
        }
        if self.withdrawal_step == 0 {
            return Err(ConfigError::Invalid {
                field: "withdrawal_step",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// With login policy
    #[inline]
    #[must_use]
    pub fn with_login_policy(mut self, policy: LoginPolicy) -> Self {
        self.login_policy = policy;
        self
    }

    /// With reward per completed referral
    #[inline]
    #[must_use]
    pub fn with_reward_points(mut self, points: u64) -> Self {
        self.referral_reward_points = points;
        self
    }

    /// With earned-transaction recording toggled
    #[inline]
    #[must_use]
    pub fn with_earned_transactions(mut self, record: bool) -> Self {
        self.record_earned_transactions = record;
        self
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            referral_reward_points: 100,
            min_withdrawal: 500,
            withdrawal_step: 100,
            quick_amounts: vec![500, 1000, 2000, 5000],
            login_policy: LoginPolicy::Reject,
            record_earned_transactions: true,
            recent_referrals_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reward_rules() {
        let config = LedgerConfig::new();
        assert_eq!(config.referral_reward_points, 100);
        assert_eq!(config.min_withdrawal, 500);
        assert_eq!(config.withdrawal_step, 100);
        assert_eq!(config.login_policy, LoginPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = LedgerConfig::from_toml_str(
            r#"
            login_policy = "replace"
            min_withdrawal = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.login_policy, LoginPolicy::Replace);
        assert_eq!(config.min_withdrawal, 1000);
        assert_eq!(config.withdrawal_step, 100);
        assert_eq!(config.quick_amounts, vec![500, 1000, 2000, 5000]);
    }

    #[test]
    fn rejects_zero_step() {
        let err = LedgerConfig::from_toml_str("withdrawal_step = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "withdrawal_step",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            LedgerConfig::from_toml_str("min_withdrawal = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
