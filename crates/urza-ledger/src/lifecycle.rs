//! Referral status state machine
//!
//! `pending -> in_process -> completed`, with direct `pending -> completed`
//! allowed. Re-asserting the current status is a no-op. Anything that lowers
//! the rank is rejected.
//!
//! Point crediting hangs off [`Transition::credits_points`]: it is true only
//! for an actual move into `completed`, so the status itself is the record of
//! whether a referral has already paid out.

use crate::error::{LedgerError, LedgerResult};
use crate::types::ReferralStatus;

/// Outcome of a permitted status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested status equals the current one
    NoOp(ReferralStatus),
    /// Strictly forward move
    Advance {
        /// Status before the move
        from: ReferralStatus,
        /// Status after the move
        to: ReferralStatus,
    },
}

impl Transition {
    /// Whether applying this transition awards the referral's points
    #[inline]
    #[must_use]
    pub fn credits_points(self) -> bool {
        matches!(
            self,
            Transition::Advance {
                to: ReferralStatus::Completed,
                ..
            }
        )
    }

    /// Status after the transition
    #[inline]
    #[must_use]
    pub fn target(self) -> ReferralStatus {
        match self {
            Transition::NoOp(status) => status,
            Transition::Advance { to, .. } => to,
        }
    }
}

/// Validates a status request and classifies it.
pub fn validate_transition(from: ReferralStatus, to: ReferralStatus) -> LedgerResult<Transition> {
    if from == to {
        return Ok(Transition::NoOp(from));
    }
    if allowed(from, to) {
        Ok(Transition::Advance { from, to })
    } else {
        Err(LedgerError::InvalidTransition { from, to })
    }
}

/// Forward moves out of `from` (excluding the no-op).
pub fn allowed_transitions(from: ReferralStatus) -> Vec<ReferralStatus> {
    use ReferralStatus::*;
    match from {
        Pending => vec![InProcess, Completed],
        InProcess => vec![Completed],
        Completed => vec![],
    }
}

fn allowed(from: ReferralStatus, to: ReferralStatus) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
