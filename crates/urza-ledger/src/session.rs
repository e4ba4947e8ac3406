//! Session gateway
//!
//! Two-phase mock sign-in: a 10-digit phone number "issues" a code, then any
//! well-formed 6-digit code signs the user in. No code is actually sent or
//! checked; the gateway only enforces shape and phase, then asks the
//! [`FixtureProvider`] for the session data and hands it to
//! [`LedgerStore::login`].

use crate::error::{LedgerError, LedgerResult};
use crate::fixtures::FixtureProvider;
use crate::store::{LedgerStore, Session};
use crate::validation::{is_valid_code, is_valid_phone, CODE_DIGITS, PHONE_DIGITS};
use tracing::{info, warn};

/// Where the sign-in flow currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginPhase {
    /// Waiting for a phone number
    #[default]
    AwaitingPhone,
    /// Code "sent" to `phone`
    AwaitingCode { phone: String },
}

/// Mock authentication front door
#[derive(Debug)]
pub struct SessionGateway<F> {
    fixtures: F,
    phase: LoginPhase,
}

impl<F: FixtureProvider> SessionGateway<F> {
    /// Gateway backed by `fixtures`
    pub fn new(fixtures: F) -> Self {
        Self {
            fixtures,
            phase: LoginPhase::AwaitingPhone,
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> &LoginPhase {
        &self.phase
    }

    /// Phase 1: accept a phone number and simulate issuing a code.
    ///
    /// Allowed from either phase; a second request simply retargets the
    /// pending code.
    pub fn request_code(&mut self, phone: &str) -> LedgerResult<()> {
        if !is_valid_phone(phone) {
            warn!("code request rejected: malformed phone");
            return Err(LedgerError::validation(
                "phone",
                format!("must be exactly {PHONE_DIGITS} digits"),
            ));
        }
        info!(phone_suffix = &phone[PHONE_DIGITS - 4..], "one-time code issued");
        self.phase = LoginPhase::AwaitingCode {
            phone: phone.to_string(),
        };
        Ok(())
    }

    /// Go back to phone entry, dropping the pending code
    pub fn change_number(&mut self) {
        self.phase = LoginPhase::AwaitingPhone;
    }

    /// Phase 2: accept the code and sign in.
    ///
    /// On success the gateway returns to [`LoginPhase::AwaitingPhone`]. On
    /// any failure (malformed code, wrong phase, store refusing the login)
    /// the phase is kept so the user can retry.
    pub fn verify_code<'s>(
        &mut self,
        code: &str,
        store: &'s mut LedgerStore,
    ) -> LedgerResult<&'s Session> {
        let LoginPhase::AwaitingCode { phone } = &self.phase else {
            return Err(LedgerError::validation("phase", "no code has been requested"));
        };
        if !is_valid_code(code) {
            warn!("code rejected: malformed");
            return Err(LedgerError::validation(
                "code",
                format!("must be exactly {CODE_DIGITS} digits"),
            ));
        }

        let seed = self.fixtures.seed_for(phone);
        let session = store.login(seed)?;
        self.phase = LoginPhase::AwaitingPhone;
        Ok(session)
    }
}
