//! Input gating shared by the ledger commands and the session gateway
//!
//! These are the same checks the client forms apply before submitting,
//! so the presentation layer can call them to enable/disable a button and
//! the core re-applies them on every command.

use crate::error::{LedgerError, LedgerResult};
use crate::types::ReferralInput;

/// Digits in a local phone number
pub const PHONE_DIGITS: usize = 10;

/// Digits in a one-time login code
pub const CODE_DIGITS: usize = 6;

/// `true` when `value` is exactly `len` ASCII digits
#[inline]
#[must_use]
pub fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// `true` for a 10-digit local phone number
#[inline]
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    is_digits(value, PHONE_DIGITS)
}

/// `true` for a 6-digit one-time code
#[inline]
#[must_use]
pub fn is_valid_code(value: &str) -> bool {
    is_digits(value, CODE_DIGITS)
}

/// Keep only digits, truncated to `max`, the way the input fields sanitize
/// keystrokes
#[must_use]
pub fn sanitize_digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_phone(field: &'static str, value: &str) -> LedgerResult<()> {
    if !is_valid_phone(value) {
        return Err(LedgerError::validation(
            field,
            format!("must be exactly {PHONE_DIGITS} digits"),
        ));
    }
    Ok(())
}

/// Validate a referral form
pub fn validate_referral_input(input: &ReferralInput) -> LedgerResult<()> {
    require_non_empty("customerName", &input.customer_name)?;
    require_phone("customerPhone", &input.customer_phone)?;
    require_non_empty("location", &input.location)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phone_rules() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("98765-3210"));
        assert!(!is_valid_phone("+919876543"));
    }

    #[test]
    fn code_rules() {
        assert!(is_valid_code("123456"));
        assert!(!is_valid_code("12345"));
        assert!(!is_valid_code("12345a"));
    }

    #[test]
    fn sanitize_strips_and_truncates() {
        assert_eq!(sanitize_digits("+91 98765-43210", 10), "9198765432");
        assert_eq!(sanitize_digits("12 34 56 78", 6), "123456");
    }

    #[test]
    fn referral_input_reports_first_bad_field() {
        let err = validate_referral_input(&ReferralInput::new("  ", "9876543210", "Pune"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "customerName", .. }));

        let err = validate_referral_input(&ReferralInput::new("Priya", "98765", "Pune"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "customerPhone", .. }));

        let err = validate_referral_input(&ReferralInput::new("Priya", "9876543210", ""))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "location", .. }));

        assert!(validate_referral_input(&ReferralInput::new("Priya", "9876543210", "Pune")).is_ok());
    }

    proptest! {
        #[test]
        fn prop_sanitized_phone_is_digits(raw in ".{0,24}") {
            let cleaned = sanitize_digits(&raw, PHONE_DIGITS);
            prop_assert!(cleaned.len() <= PHONE_DIGITS);
            prop_assert!(cleaned.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(is_valid_phone(&cleaned), cleaned.len() == PHONE_DIGITS);
        }
    }
}
