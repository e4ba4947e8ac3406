//! Identity/fixture collaborator
//!
//! Supplies the user and their history once a login succeeds. The demo
//! provider returns the canned account the client ships with; a real
//! deployment would fetch the same [`SessionSeed`] from a backend.

use crate::types::{
    Referral, ReferralId, ReferralStatus, SessionSeed, Transaction, TransactionId,
    TransactionKind, TransactionStatus, User, UserId,
};
use chrono::NaiveDate;

/// Source of session data for a verified phone number
pub trait FixtureProvider: Send + Sync {
    /// Build the seed for `phone` (10 local digits)
    fn seed_for(&self, phone: &str) -> SessionSeed;
}

impl<F> FixtureProvider for F
where
    F: Fn(&str) -> SessionSeed + Send + Sync,
{
    fn seed_for(&self, phone: &str) -> SessionSeed {
        self(phone)
    }
}

/// The demo account: 1250 points, three referrals, two transactions
///
/// Referral phones are stored as the 10 local digits, the same shape
/// [`LedgerStore::add_referral`](crate::LedgerStore::add_referral) stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoFixtures;

impl DemoFixtures {
    /// Demo user bound to `phone`
    #[must_use]
    pub fn user(phone: &str) -> User {
        User {
            id: UserId::from("1"),
            name: "Rajesh Kumar".into(),
            email: "rajesh@example.com".into(),
            phone: format!("+91 {phone}"),
            state: "Karnataka".into(),
            district: "Bangalore".into(),
            profile_picture: Some(
                "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&dpr=2"
                    .into(),
            ),
            referral_code: "URZA-RK-2024".into(),
            total_points: 1250,
            joined_date: ymd(2024, 1, 15),
            is_kyc_verified: true,
        }
    }

    /// Demo referral history, most recent first
    #[must_use]
    pub fn referrals() -> Vec<Referral> {
        vec![
            referral(
                "1",
                "Priya Sharma",
                "9876543211",
                "Mumbai, Maharashtra",
                ReferralStatus::Completed,
                ymd(2024, 1, 20),
                ymd(2024, 1, 25),
            ),
            referral(
                "2",
                "Amit Singh",
                "9876543212",
                "Delhi, NCR",
                ReferralStatus::InProcess,
                ymd(2024, 1, 22),
                ymd(2024, 1, 24),
            ),
            referral(
                "3",
                "Sunita Patel",
                "9876543213",
                "Ahmedabad, Gujarat",
                ReferralStatus::Pending,
                ymd(2024, 1, 25),
                ymd(2024, 1, 25),
            ),
        ]
    }

    /// Demo transaction history, most recent first
    #[must_use]
    pub fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: TransactionId::from("1"),
                kind: TransactionKind::Earned,
                amount: 100,
                points: 100,
                description: "Referral: Priya Sharma".into(),
                status: TransactionStatus::Completed,
                date: ymd(2024, 1, 25),
                upi_id: None,
            },
            Transaction {
                id: TransactionId::from("2"),
                kind: TransactionKind::Withdrawal,
                amount: 500,
                points: 500,
                description: "UPI Withdrawal".into(),
                status: TransactionStatus::Completed,
                date: ymd(2024, 1, 20),
                upi_id: Some("rajesh@paytm".into()),
            },
        ]
    }
}

impl FixtureProvider for DemoFixtures {
    fn seed_for(&self, phone: &str) -> SessionSeed {
        SessionSeed {
            user: Self::user(phone),
            referrals: Self::referrals(),
            transactions: Self::transactions(),
        }
    }
}

fn referral(
    id: &str,
    name: &str,
    phone: &str,
    location: &str,
    status: ReferralStatus,
    submitted: NaiveDate,
    updated: NaiveDate,
) -> Referral {
    Referral {
        id: ReferralId::from(id),
        customer_name: name.into(),
        customer_phone: phone.into(),
        location: location.into(),
        status,
        points: 100,
        submitted_date: submitted,
        updated_date: updated,
    }
}

// Only called with literal calendar dates above.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
