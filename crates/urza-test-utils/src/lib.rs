//! Testing utilities for URZA workspace
//!
//! Shared fixtures, pinned clocks and seeded stores.

#![allow(missing_docs)]

use chrono::NaiveDate;
use urza_ledger::{
    DemoFixtures, FixedClock, FixtureProvider, LedgerConfig, LedgerStore, ReferralInput,
    SessionSeed,
};

/// Phone number the demo account signs in with
pub const DEMO_PHONE: &str = "9876543210";

/// Any well-formed one-time code
pub const DEMO_CODE: &str = "123456";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Clock pinned a week after the demo history
pub fn demo_clock() -> FixedClock {
    FixedClock::new(date(2024, 2, 1))
}

pub fn demo_seed() -> SessionSeed {
    DemoFixtures.seed_for(DEMO_PHONE)
}

/// Signed-out store on the demo clock
pub fn empty_store(config: LedgerConfig) -> (LedgerStore, FixedClock) {
    let clock = demo_clock();
    (LedgerStore::new(config, clock.clone()), clock)
}

/// Store signed in as the demo account (1250 points, 3 referrals)
pub fn demo_store() -> (LedgerStore, FixedClock) {
    demo_store_with(LedgerConfig::default())
}

pub fn demo_store_with(config: LedgerConfig) -> (LedgerStore, FixedClock) {
    let clock = demo_clock();
    (LedgerStore::from_seed(config, clock.clone(), demo_seed()), clock)
}

/// Demo account with its balance replaced
pub fn store_with_balance(points: u64) -> (LedgerStore, FixedClock) {
    let mut seed = demo_seed();
    seed.user.total_points = points;
    let clock = demo_clock();
    (
        LedgerStore::from_seed(LedgerConfig::default(), clock.clone(), seed),
        clock,
    )
}

pub fn referral_input(name: &str) -> ReferralInput {
    ReferralInput::new(name, "9876543219", "Pune, Maharashtra")
}
