//! URZA Ledger - referral & points ledger
//!
//! The authoritative in-memory model behind the rewards client:
//! - [`LedgerStore`] owns the user balance, referrals and transaction history
//!   and applies each command atomically
//! - [`lifecycle`] enforces the `pending -> in_process -> completed` machine
//! - [`withdrawal`] checks cash-out eligibility
//! - [`SessionGateway`] runs the mocked phone/code sign-in
//!
//! The model is single-writer and synchronous. Latency (OTP delivery,
//! submission acknowledgement, payout processing) belongs to the caller,
//! which applies one command once its delay completes.
//!
//! # Example
//!
//! ```rust
//! use urza_ledger::{DemoFixtures, LedgerStore, ReferralInput, ReferralStatus, SessionGateway};
//!
//! # fn main() -> Result<(), urza_ledger::LedgerError> {
//! let mut store = LedgerStore::with_defaults();
//! let mut gateway = SessionGateway::new(DemoFixtures);
//!
//! gateway.request_code("9876543210")?;
//! gateway.verify_code("123456", &mut store)?;
//!
//! let referral = store.add_referral(ReferralInput::new("Priya Sharma", "9876543211", "Pune"))?;
//! store.advance_referral_status(&referral.id, ReferralStatus::Completed)?;
//! assert_eq!(store.user().map(|u| u.total_points), Some(1350));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod lifecycle;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;
pub mod withdrawal;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LedgerConfig, LoginPolicy};
pub use error::{ConfigError, EntityKind, LedgerError, LedgerResult};
pub use fixtures::{DemoFixtures, FixtureProvider};
pub use lifecycle::{allowed_transitions, validate_transition, Transition};
pub use session::{LoginPhase, SessionGateway};
pub use stats::{DerivedStats, ReferralFilter, StatusCounts, StatusFilter, TransactionFilter};
pub use store::{LedgerStore, Session, StatusChange};
pub use types::{
    ProfileUpdate, Referral, ReferralId, ReferralInput, ReferralStatus, SessionSeed, Transaction,
    TransactionId, TransactionKind, TransactionStatus, User, UserId,
};
pub use withdrawal::{draft_withdrawal, WithdrawalLimits, WITHDRAWAL_DESCRIPTION};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::{
        DemoFixtures, LedgerConfig, LedgerError, LedgerStore, ReferralInput, ReferralStatus,
        SessionGateway, TransactionFilter,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
