//! Async edge of the ledger
//!
//! The ledger itself is synchronous. Anything that would wait on a network
//! (OTP delivery, referral acknowledgement, payout processing) waits here,
//! then applies exactly one store command under the lock. The lock is never
//! held across an await.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use urza_ledger::{LedgerResult, LedgerStore};

/// Store shared between the driver and in-flight commands
pub(crate) type SharedStore = Arc<Mutex<LedgerStore>>;

/// Simulated round-trip delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Latency {
    pub(crate) otp: Duration,
    pub(crate) submit: Duration,
    pub(crate) withdraw: Duration,
}

impl Latency {
    /// Same delay everywhere
    pub(crate) fn uniform(delay: Duration) -> Self {
        Self {
            otp: delay,
            submit: delay,
            withdraw: delay,
        }
    }
}

impl Default for Latency {
    // Delays the client shows while "talking to the server"
    fn default() -> Self {
        Self {
            otp: Duration::from_millis(1500),
            submit: Duration::from_millis(1500),
            withdraw: Duration::from_millis(2000),
        }
    }
}

// Saturates instead of truncating
fn millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Delayed command runner
#[derive(Debug, Clone)]
pub(crate) struct Boundary {
    store: SharedStore,
    latency: Latency,
}

impl Boundary {
    pub(crate) fn new(store: LedgerStore, latency: Latency) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            latency,
        }
    }

    pub(crate) fn latency(&self) -> Latency {
        self.latency
    }

    /// Wait `delay`, then apply `command` atomically.
    pub(crate) async fn apply<T>(
        &self,
        delay: Duration,
        label: &'static str,
        command: impl FnOnce(&mut LedgerStore) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        tracing::debug!(command = label, delay_ms = millis(delay), "in flight");
        tokio::time::sleep(delay).await;

        let result = {
            let mut store = self.store.lock();
            command(&mut store)
        };
        match &result {
            Ok(_) => tracing::debug!(command = label, "applied"),
            Err(e) => tracing::warn!(command = label, error = %e, "failed"),
        }
        result
    }

    /// Read the store without a delay
    pub(crate) fn read<T>(&self, query: impl FnOnce(&LedgerStore) -> T) -> T {
        query(&self.store.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use urza_ledger::{LedgerError, ReferralStatus};
    use urza_test_utils::{demo_store, referral_input};

    fn boundary() -> Boundary {
        let (store, _) = demo_store();
        Boundary::new(store, Latency::uniform(Duration::ZERO))
    }

    #[tokio::test]
    async fn concurrent_submissions_serialize() {
        let boundary = boundary();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let b = boundary.clone();
                tokio::spawn(async move {
                    b.apply(Duration::from_millis(i), "add_referral", move |s| {
                        s.add_referral(referral_input(&format!("Lead {i}")))
                    })
                    .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let counts = boundary.read(|s| s.derived_stats().referrals);
        assert_eq!(counts.all, 11);
        assert_eq!(counts.pending, 9);
    }

    #[tokio::test]
    async fn concurrent_completion_credits_once() {
        let boundary = boundary();
        let id = boundary
            .apply(Duration::ZERO, "add_referral", |s| {
                s.add_referral(referral_input("Race"))
            })
            .await
            .unwrap()
            .id;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let b = boundary.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    b.apply(Duration::ZERO, "complete", move |s| {
                        s.advance_referral_status(&id, ReferralStatus::Completed)
                    })
                    .await
                })
            })
            .collect();

        let mut credited = 0;
        for handle in handles {
            credited += handle.await.unwrap().unwrap().credited;
        }

        assert_eq!(credited, 100);
        assert_eq!(boundary.read(|s| s.user().map(|u| u.total_points)), Some(1350));
    }

    #[test]
    fn delay_logging_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn failed_command_reports_error() {
        let boundary = boundary();
        let err = boundary
            .apply(Duration::ZERO, "withdraw", |s| s.request_withdrawal(100, "x@upi"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BelowMinimum { .. }));
    }
}
