//! Core ledger types
//!
//! Defines the entities owned by the ledger:
//! - [`User`] profile and point balance
//! - [`Referral`] and its [`ReferralStatus`] lifecycle
//! - [`Transaction`] ledger entries
//! - [`SessionSeed`] for materializing a session

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh, time-sortable identifier
            #[inline]
            #[must_use]
            pub fn generate() -> Self {
                Self(Ulid::new().to_string())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Opaque user identifier
    UserId
);
string_id!(
    /// Unique referral identifier
    ReferralId
);
string_id!(
    /// Unique transaction identifier
    TransactionId
);

/// Authenticated user with a mutable point balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub referral_code: String,
    pub total_points: u64,
    pub joined_date: NaiveDate,
    #[serde(rename = "isKYCVerified")]
    pub is_kyc_verified: bool,
}

impl User {
    /// Whole days between joining and `today`, clamped at zero
    #[must_use]
    pub fn days_since_joined(&self, today: NaiveDate) -> u64 {
        u64::try_from((today - self.joined_date).num_days()).unwrap_or(0)
    }
}

/// Referral lifecycle status
///
/// Ordered by rank: `Pending < InProcess < Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// Submitted, not yet picked up
    Pending,
    /// Being worked on
    InProcess,
    /// Terminal; points have been awarded
    Completed,
}

impl ReferralStatus {
    /// All statuses in rank order
    pub const ALL: [ReferralStatus; 3] = [Self::Pending, Self::InProcess, Self::Completed];

    /// Numeric rank used by the transition rules
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            ReferralStatus::Pending => 0,
            ReferralStatus::InProcess => 1,
            ReferralStatus::Completed => 2,
        }
    }

    /// Whether no further transitions are possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ReferralStatus::Completed)
    }

    /// Wire name (`pending`, `in_process`, `completed`)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::InProcess => "in_process",
            ReferralStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted customer lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: ReferralId,
    pub customer_name: String,
    pub customer_phone: String,
    pub location: String,
    pub status: ReferralStatus,
    pub points: u64,
    pub submitted_date: NaiveDate,
    pub updated_date: NaiveDate,
}

/// Form input for a new referral
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub location: String,
}

impl ReferralInput {
    /// Build input from its three fields
    pub fn new(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            location: location.into(),
        }
    }
}

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points credited for a completed referral
    Earned,
    /// Cash-out request to a UPI id
    Withdrawal,
}

/// Processing status of a transaction, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting settlement
    Pending,
    /// Settled
    Completed,
    /// Rejected by the payout side
    Failed,
}

/// Immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Currency units, 1:1 with `points`
    pub amount: u64,
    pub points: u64,
    pub description: String,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}

impl Transaction {
    /// Completed credit for a referral
    #[must_use]
    pub fn earned_for(referral: &Referral, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::generate(),
            kind: TransactionKind::Earned,
            amount: referral.points,
            points: referral.points,
            description: format!("Referral: {}", referral.customer_name),
            status: TransactionStatus::Completed,
            date,
            upi_id: None,
        }
    }

    /// Whether this entry counts toward the derived totals
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Partial profile edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub profile_picture: Option<String>,
    #[serde(rename = "isKYCVerified")]
    pub is_kyc_verified: Option<bool>,
}

impl ProfileUpdate {
    /// Empty update
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set state and district together
    #[must_use]
    pub fn with_locale(mut self, state: impl Into<String>, district: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self.district = Some(district.into());
        self
    }

    /// Set KYC flag
    #[must_use]
    pub fn with_kyc_verified(mut self, verified: bool) -> Self {
        self.is_kyc_verified = Some(verified);
        self
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    pub user: User,
    /// Most-recent-first
    pub referrals: Vec<Referral>,
    /// Most-recent-first
    pub transactions: Vec<Transaction>,
}

impl SessionSeed {
    /// Seed with no history
    #[must_use]
    pub fn fresh(user: User) -> Self {
        Self {
            user,
            referrals: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_rank_is_monotonic() {
        let ranks: Vec<u8> = ReferralStatus::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert!(ReferralStatus::Pending < ReferralStatus::Completed);
        assert!(ReferralStatus::Completed.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ReferralStatus::InProcess).unwrap();
        assert_eq!(json, "\"in_process\"");
        assert_eq!(ReferralStatus::InProcess.to_string(), "in_process");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ReferralId::generate(), ReferralId::generate());
    }

    #[test]
    fn transaction_uses_type_key() {
        let txn = Transaction {
            id: TransactionId::from("9"),
            kind: TransactionKind::Withdrawal,
            amount: 500,
            points: 500,
            description: "UPI Withdrawal".into(),
            status: TransactionStatus::Pending,
            date: date(2024, 2, 1),
            upi_id: Some("user@upi".into()),
        };
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "withdrawal");
        assert_eq!(value["upiId"], "user@upi");
    }

    #[test]
    fn days_since_joined_clamps() {
        let user = User {
            id: UserId::from("1"),
            name: "A".into(),
            email: "a@example.com".into(),
            phone: "+91 9876543210".into(),
            state: "Karnataka".into(),
            district: "Bangalore".into(),
            profile_picture: None,
            referral_code: "URZA-A".into(),
            total_points: 0,
            joined_date: date(2024, 1, 15),
            is_kyc_verified: false,
        };
        assert_eq!(user.days_since_joined(date(2024, 1, 25)), 10);
        assert_eq!(user.days_since_joined(date(2023, 12, 1)), 0);
    }
}
