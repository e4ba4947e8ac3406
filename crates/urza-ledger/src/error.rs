//! Error types for the ledger
//!
//! Every failed command leaves the store untouched, so callers may retry
//! after fixing the input. Nothing here is retried automatically.

use crate::types::ReferralStatus;

/// Main ledger error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Malformed input (phone length, empty required field, ...)
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// Referral status moving backward
    #[error("invalid referral transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: ReferralStatus,
        /// Requested status
        to: ReferralStatus,
    },

    /// Withdrawal under the fixed floor
    #[error("withdrawal of {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        /// Requested amount
        amount: u64,
        /// Configured floor
        minimum: u64,
    },

    /// Withdrawal above the quantized balance
    #[error("withdrawal of {amount} exceeds the available maximum of {maximum}")]
    InsufficientBalance {
        /// Requested amount
        amount: u64,
        /// Largest withdrawable amount
        maximum: u64,
    },

    /// Unknown referral or transaction id
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record looked up
        entity: EntityKind,
        /// Id that was not found
        id: String,
    },

    /// Login while a session is active
    #[error("a session is already active; log out first")]
    AlreadyAuthenticated,

    /// Command requires an active session
    #[error("no active session")]
    NotAuthenticated,

    /// Entry id already present in the ledger
    #[error("duplicate {entity} id: {id}")]
    DuplicateId {
        /// Kind of record
        entity: EntityKind,
        /// Clashing id
        id: String,
    },

    /// Crediting would overflow the balance
    #[error("point balance overflow")]
    PointsOverflow,
}

impl LedgerError {
    /// Build a validation error
    #[inline]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Build a not-found error for a referral
    #[inline]
    pub fn referral_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Referral,
            id: id.into(),
        }
    }

    /// Check if the user can fix this by editing their input
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::BelowMinimum { .. } | Self::InsufficientBalance { .. }
        )
    }

    /// Check if the error stems from session state rather than input
    #[inline]
    #[must_use]
    pub fn is_session_error(&self) -> bool {
        matches!(self, Self::AlreadyAuthenticated | Self::NotAuthenticated)
    }
}

/// Entity named in [`LedgerError::NotFound`] and [`LedgerError::DuplicateId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Referral,
    Transaction,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Referral => f.write_str("referral"),
            EntityKind::Transaction => f.write_str("transaction"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed values break an invariant
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Result alias for ledger commands
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = LedgerError::InvalidTransition {
            from: ReferralStatus::Completed,
            to: ReferralStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "invalid referral transition: completed -> pending"
        );

        let err = LedgerError::referral_not_found("42");
        assert_eq!(err.to_string(), "referral not found: 42");
    }

    #[test]
    fn classification() {
        assert!(LedgerError::validation("customerPhone", "bad").is_validation());
        assert!(LedgerError::BelowMinimum {
            amount: 1,
            minimum: 500
        }
        .is_validation());
        assert!(!LedgerError::PointsOverflow.is_validation());
        assert!(LedgerError::NotAuthenticated.is_session_error());
        assert!(!LedgerError::referral_not_found("1").is_session_error());
    }
}
