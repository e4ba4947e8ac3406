//! Date source for ledger stamps

use chrono::{Days, NaiveDate, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Supplies "today" for submitted/updated/transaction dates
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current calendar date
    fn today(&self) -> NaiveDate;
}

/// Wall clock (UTC date)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Settable clock for deterministic sessions
///
/// Clones share the same date, so a test can keep a handle after moving
/// one into the store.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Arc<Mutex<NaiveDate>>,
}

impl FixedClock {
    /// Clock pinned at `date`
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Arc::new(Mutex::new(date)),
        }
    }

    /// Move to `date`
    pub fn set(&self, date: NaiveDate) {
        *self.date.lock() = date;
    }

    /// Move forward by `days`
    pub fn advance_days(&self, days: u64) {
        let mut guard = self.date.lock();
        if let Some(next) = guard.checked_add_days(Days::new(days)) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_shared_between_clones() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
        let clock = FixedClock::new(start);
        let handle = clock.clone();

        handle.advance_days(3);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());

        handle.set(start);
        assert_eq!(clock.today(), start);
    }
}
