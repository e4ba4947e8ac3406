//! Derived views over the ledger collections
//!
//! Always recomputed from the current collections; nothing here is cached.

use crate::types::{Referral, ReferralStatus, Transaction, TransactionKind, TransactionStatus};
use serde::{Deserialize, Serialize};

/// Referral counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Every referral
    pub all: usize,
    /// Awaiting review
    pub pending: usize,
    /// Under review
    pub in_process: usize,
    /// Rewarded
    pub completed: usize,
}

impl StatusCounts {
    /// Count for one status
    #[must_use]
    pub fn of(&self, status: ReferralStatus) -> usize {
        match status {
            ReferralStatus::Pending => self.pending,
            ReferralStatus::InProcess => self.in_process,
            ReferralStatus::Completed => self.completed,
        }
    }
}

/// Dashboard aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub referrals: StatusCounts,
    /// Sum of completed `earned` amounts
    pub total_earned: u64,
    /// Sum of completed `withdrawal` amounts
    pub total_withdrawn: u64,
    /// Sum of not-yet-settled withdrawal amounts
    pub pending_withdrawals: u64,
}

/// Single pass over both collections.
#[must_use]
pub fn derive_stats(referrals: &[Referral], transactions: &[Transaction]) -> DerivedStats {
    let mut stats = DerivedStats::default();

    for referral in referrals {
        stats.referrals.all += 1;
        match referral.status {
            ReferralStatus::Pending => stats.referrals.pending += 1,
            ReferralStatus::InProcess => stats.referrals.in_process += 1,
            ReferralStatus::Completed => stats.referrals.completed += 1,
        }
    }

    for txn in transactions {
        match (txn.kind, txn.is_settled()) {
            (TransactionKind::Earned, true) => {
                stats.total_earned = stats.total_earned.saturating_add(txn.amount);
            }
            (TransactionKind::Withdrawal, true) => {
                stats.total_withdrawn = stats.total_withdrawn.saturating_add(txn.amount);
            }
            (TransactionKind::Withdrawal, false) if txn.status == TransactionStatus::Pending => {
                stats.pending_withdrawals = stats.pending_withdrawals.saturating_add(txn.amount);
            }
            _ => {}
        }
    }

    stats
}

/// Status part of a referral search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReferralStatus),
}

/// Referral search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralFilter {
    /// Matched against name and location (case-insensitive) and phone
    pub search: String,
    pub status: StatusFilter,
}

impl ReferralFilter {
    /// Filter by search text
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            status: StatusFilter::All,
        }
    }

    /// Restrict to one status
    #[must_use]
    pub fn with_status(mut self, status: ReferralStatus) -> Self {
        self.status = StatusFilter::Only(status);
        self
    }

    /// Whether `referral` passes both criteria
    #[must_use]
    pub fn matches(&self, referral: &Referral) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => referral.status == status,
        };
        if !status_ok {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        referral.customer_name.to_lowercase().contains(&needle)
            || referral.customer_phone.contains(&self.search)
            || referral.location.to_lowercase().contains(&needle)
    }
}

/// Transaction list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFilter {
    #[default]
    All,
    Earned,
    Withdrawal,
}

impl TransactionFilter {
    /// Whether `txn` passes
    #[must_use]
    pub fn matches(self, txn: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Earned => txn.kind == TransactionKind::Earned,
            TransactionFilter::Withdrawal => txn.kind == TransactionKind::Withdrawal,
        }
    }
}
