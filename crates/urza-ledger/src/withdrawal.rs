//! Withdrawal eligibility
//!
//! Pure checks, no state. Rules are applied in order: floor, ceiling, then
//! payout destination.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::types::{Transaction, TransactionId, TransactionKind, TransactionStatus};
use chrono::NaiveDate;

/// Description stamped on every withdrawal entry
pub const WITHDRAWAL_DESCRIPTION: &str = "UPI Withdrawal";

/// Bounds derived from a balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalLimits {
    /// Balance the limits were computed from
    pub balance: u64,
    /// Configured floor
    pub minimum: u64,
    /// `floor(balance / step) * step`
    pub maximum: u64,
    presets: Vec<u64>,
}

impl WithdrawalLimits {
    /// Limits for `balance` under `config`
    #[must_use]
    pub fn for_balance(balance: u64, config: &LedgerConfig) -> Self {
        let step = config.withdrawal_step.max(1);
        Self {
            balance,
            minimum: config.min_withdrawal,
            maximum: (balance / step) * step,
            presets: config.quick_amounts.clone(),
        }
    }

    /// Whether any amount is withdrawable
    #[inline]
    #[must_use]
    pub fn can_withdraw(&self) -> bool {
        self.maximum >= self.minimum
    }

    /// Points still needed before the first withdrawal unlocks
    #[inline]
    #[must_use]
    pub fn points_to_unlock(&self) -> u64 {
        self.minimum.saturating_sub(self.balance)
    }

    /// Preset amounts that fit under the ceiling
    #[must_use]
    pub fn quick_amounts(&self) -> Vec<u64> {
        self.presets
            .iter()
            .copied()
            .filter(|amount| *amount <= self.maximum)
            .collect()
    }

    /// Check `amount` and `upi_id` against these limits
    pub fn check(&self, amount: u64, upi_id: &str) -> LedgerResult<()> {
        if amount < self.minimum {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: self.minimum,
            });
        }
        if amount > self.maximum {
            return Err(LedgerError::InsufficientBalance {
                amount,
                maximum: self.maximum,
            });
        }
        if upi_id.trim().is_empty() {
            return Err(LedgerError::validation("upiId", "must not be empty"));
        }
        Ok(())
    }
}

/// Validate a request and produce the pending withdrawal entry to record.
pub fn draft_withdrawal(
    amount: u64,
    upi_id: &str,
    total_points: u64,
    config: &LedgerConfig,
    date: NaiveDate,
) -> LedgerResult<Transaction> {
    WithdrawalLimits::for_balance(total_points, config).check(amount, upi_id)?;

    Ok(Transaction {
        id: TransactionId::generate(),
        kind: TransactionKind::Withdrawal,
        amount,
        points: amount,
        description: WITHDRAWAL_DESCRIPTION.to_string(),
        status: TransactionStatus::Pending,
        date,
        upi_id: Some(upi_id.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn draft(amount: u64, upi: &str, balance: u64) -> LedgerResult<Transaction> {
        draft_withdrawal(amount, upi, balance, &LedgerConfig::default(), today())
    }

    #[test]
    fn below_minimum() {
        assert_eq!(
            draft(499, "user@upi", 1000).unwrap_err(),
            LedgerError::BelowMinimum { amount: 499, minimum: 500 }
        );
    }

    #[test]
    fn above_quantized_balance() {
        assert_eq!(
            draft(1000, "user@upi", 999).unwrap_err(),
            LedgerError::InsufficientBalance { amount: 1000, maximum: 900 }
        );
    }

    #[test]
    fn missing_upi_checked_last() {
        assert!(matches!(
            draft(500, "   ", 1000).unwrap_err(),
            LedgerError::Validation { field: "upiId", .. }
        ));
        // Amount errors win over the missing destination
        assert!(matches!(
            draft(100, "", 1000).unwrap_err(),
            LedgerError::BelowMinimum { .. }
        ));
    }

    #[test]
    fn success_is_pending_with_matching_points() {
        let txn = draft(500, "user@upi", 1000).unwrap();
        assert_eq!(txn.kind, TransactionKind::Withdrawal);
        assert_eq!(txn.status, TransactionStatus::Pending);
        assert_eq!(txn.amount, 500);
        assert_eq!(txn.points, 500);
        assert_eq!(txn.upi_id.as_deref(), Some("user@upi"));
        assert_eq!(txn.description, WITHDRAWAL_DESCRIPTION);
        assert_eq!(txn.date, today());
    }

    #[test]
    fn limits_helpers() {
        let config = LedgerConfig::default();

        let low = WithdrawalLimits::for_balance(320, &config);
        assert!(!low.can_withdraw());
        assert_eq!(low.points_to_unlock(), 180);
        assert!(low.quick_amounts().is_empty());

        let rich = WithdrawalLimits::for_balance(1250, &config);
        assert_eq!(rich.maximum, 1200);
        assert!(rich.can_withdraw());
        assert_eq!(rich.points_to_unlock(), 0);
        assert_eq!(rich.quick_amounts(), vec![500, 1000]);
    }

    proptest! {
        #[test]
        fn prop_accepted_amounts_within_bounds(amount in 0u64..20_000, balance in 0u64..20_000) {
            let res = draft(amount, "user@upi", balance);
            let max = balance / 100 * 100;
            prop_assert_eq!(res.is_ok(), amount >= 500 && amount <= max);
        }
    }
}
