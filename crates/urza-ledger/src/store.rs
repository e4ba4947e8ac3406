//! Ledger store
//!
//! Single owner of the session state: the user and their balance, the
//! referral collection and the transaction history. Every command checks all
//! of its preconditions before touching anything, so a failed command leaves
//! the store exactly as it was.
//!
//! Balance accounting is incremental. Completing a referral credits
//! `total_points` once, in the same command that moves the status. Recording a
//! withdrawal does not debit `total_points`; withdrawals are settled against
//! the cash side and only show up in [`DerivedStats::total_withdrawn`] once
//! their entry is `completed`.

use crate::clock::{Clock, SystemClock};
use crate::config::{LedgerConfig, LoginPolicy};
use crate::error::{EntityKind, LedgerError, LedgerResult};
use crate::lifecycle::{validate_transition, Transition};
use crate::stats::{derive_stats, DerivedStats, ReferralFilter, TransactionFilter};
use crate::types::{
    ProfileUpdate, Referral, ReferralId, ReferralInput, ReferralStatus, SessionSeed, Transaction,
    TransactionKind, User,
};
use crate::validation::{require_non_empty, validate_referral_input};
use crate::withdrawal::{draft_withdrawal, WithdrawalLimits};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Authenticated session state
///
/// Read-only outside the store; all mutation goes through [`LedgerStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
    referrals: Vec<Referral>,
    transactions: Vec<Transaction>,
}

impl Session {
    fn from_seed(seed: SessionSeed) -> Self {
        Self {
            user: seed.user,
            referrals: seed.referrals,
            transactions: seed.transactions,
        }
    }

    /// Signed-in user
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Referrals, most recent first
    #[must_use]
    pub fn referrals(&self) -> &[Referral] {
        &self.referrals
    }

    /// Transactions, most recent first
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn referral_index(&self, id: &ReferralId) -> Option<usize> {
        self.referrals.iter().position(|r| &r.id == id)
    }
}

/// Result of [`LedgerStore::advance_referral_status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Referral after the command
    pub referral: Referral,
    /// Move that was applied, or the no-op
    pub transition: Transition,
    /// Points added to the balance by this command
    pub credited: u64,
    /// `earned` entry appended by this command, if any
    pub earned: Option<Transaction>,
}

/// The ledger store
#[derive(Debug)]
pub struct LedgerStore {
    config: LedgerConfig,
    clock: Box<dyn Clock>,
    session: Option<Session>,
}

impl LedgerStore {
    /// Unauthenticated store with the given configuration and clock
    pub fn new(config: LedgerConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            clock: Box::new(clock),
            session: None,
        }
    }

    /// Unauthenticated store with default configuration and the wall clock
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LedgerConfig::default(), SystemClock)
    }

    /// Store that starts already signed in with `seed`
    pub fn from_seed(config: LedgerConfig, clock: impl Clock + 'static, seed: SessionSeed) -> Self {
        let mut store = Self::new(config, clock);
        store.session = Some(Session::from_seed(seed));
        store
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Today's date per the injected clock
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Start a session seeded with `seed`.
    ///
    /// With [`LoginPolicy::Reject`] an active session makes this fail with
    /// [`LedgerError::AlreadyAuthenticated`]; with [`LoginPolicy::Replace`]
    /// the old session is discarded first.
    pub fn login(&mut self, seed: SessionSeed) -> LedgerResult<&Session> {
        if let Some(active) = &self.session {
            match self.config.login_policy {
                LoginPolicy::Reject => {
                    warn!(user_id = %active.user.id, "login rejected: session already active");
                    return Err(LedgerError::AlreadyAuthenticated);
                }
                LoginPolicy::Replace => {
                    info!(user_id = %active.user.id, "replacing active session");
                }
            }
        }

        info!(
            user_id = %seed.user.id,
            referrals = seed.referrals.len(),
            transactions = seed.transactions.len(),
            "session started"
        );
        Ok(&*self.session.insert(Session::from_seed(seed)))
    }

    /// Clear all state back to the unauthenticated baseline.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user.id, "session ended");
        }
    }

    /// Merge the provided profile fields into the user.
    ///
    /// Id, referral code, joined date and balance are not reachable from
    /// here.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> LedgerResult<&User> {
        let session = self.session.as_mut().ok_or(LedgerError::NotAuthenticated)?;

        if let Some(name) = &update.name {
            require_non_empty("name", name)?;
        }
        if let Some(email) = &update.email {
            require_non_empty("email", email)?;
        }

        let user = &mut session.user;
        let ProfileUpdate {
            name,
            email,
            phone,
            state,
            district,
            profile_picture,
            is_kyc_verified,
        } = update;

        if let Some(v) = name {
            user.name = v;
        }
        if let Some(v) = email {
            user.email = v;
        }
        if let Some(v) = phone {
            user.phone = v;
        }
        if let Some(v) = state {
            user.state = v;
        }
        if let Some(v) = district {
            user.district = v;
        }
        if let Some(v) = profile_picture {
            user.profile_picture = Some(v);
        }
        if let Some(v) = is_kyc_verified {
            user.is_kyc_verified = v;
        }

        info!(user_id = %user.id, "profile updated");
        Ok(&*user)
    }

    /// Submit a new referral; it lands at the head of the collection as
    /// `pending`.
    pub fn add_referral(&mut self, input: ReferralInput) -> LedgerResult<Referral> {
        let today = self.clock.today();
        let points = self.config.referral_reward_points;
        let session = self.session.as_mut().ok_or(LedgerError::NotAuthenticated)?;

        if let Err(e) = validate_referral_input(&input) {
            warn!(error = %e, "referral rejected");
            return Err(e);
        }

        let referral = Referral {
            id: ReferralId::generate(),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            location: input.location,
            status: ReferralStatus::Pending,
            points,
            submitted_date: today,
            updated_date: today,
        };

        session.referrals.insert(0, referral.clone());
        info!(referral_id = %referral.id, points, "referral added");
        Ok(referral)
    }

    /// Move a referral to `status`.
    ///
    /// Moving into `completed` credits the referral's points (and, when
    /// configured, appends a completed `earned` entry) in the same command.
    /// Re-asserting the current status changes nothing.
    pub fn advance_referral_status(
        &mut self,
        id: &ReferralId,
        status: ReferralStatus,
    ) -> LedgerResult<StatusChange> {
        let today = self.clock.today();
        let record_earned = self.config.record_earned_transactions;
        let session = self.session.as_mut().ok_or(LedgerError::NotAuthenticated)?;

        let index = session
            .referral_index(id)
            .ok_or_else(|| LedgerError::referral_not_found(id.as_str()))?;
        let current = &session.referrals[index];

        let transition = match validate_transition(current.status, status) {
            Ok(t) => t,
            Err(e) => {
                warn!(referral_id = %id, from = %current.status, to = %status, "transition rejected");
                return Err(e);
            }
        };

        if let Transition::NoOp(_) = transition {
            debug!(referral_id = %id, status = %status, "status unchanged");
            return Ok(StatusChange {
                referral: current.clone(),
                transition,
                credited: 0,
                earned: None,
            });
        }

        let credited = if transition.credits_points() {
            current.points
        } else {
            0
        };
        let balance = session
            .user
            .total_points
            .checked_add(credited)
            .ok_or(LedgerError::PointsOverflow)?;

        // Commit
        let referral = &mut session.referrals[index];
        referral.status = status;
        referral.updated_date = today.max(referral.submitted_date);
        let referral = referral.clone();

        session.user.total_points = balance;

        let earned = (credited > 0 && record_earned).then(|| {
            let txn = Transaction::earned_for(&referral, today);
            session.transactions.insert(0, txn.clone());
            txn
        });

        info!(
            referral_id = %referral.id,
            to = %status,
            credited,
            balance,
            "referral status advanced"
        );

        Ok(StatusChange {
            referral,
            transition,
            credited,
            earned,
        })
    }

    /// Append a withdrawal entry at the head of the history.
    ///
    /// The entry must pass the withdrawal checks against the current
    /// balance, carry `amount == points` and a non-empty UPI id, and use an
    /// id not already in the ledger. `earned` entries are refused here; they
    /// are only written by completing a referral. Does not touch the balance.
    pub fn record_transaction(&mut self, txn: Transaction) -> LedgerResult<&Transaction> {
        let session = self.session.as_mut().ok_or(LedgerError::NotAuthenticated)?;

        if txn.amount != txn.points {
            return Err(LedgerError::validation("points", "must equal amount"));
        }
        if txn.kind == TransactionKind::Earned {
            warn!(transaction_id = %txn.id, "direct earned entry refused");
            return Err(LedgerError::validation(
                "type",
                "earned entries are only created by completing a referral",
            ));
        }
        let Some(upi) = txn.upi_id.as_deref() else {
            return Err(LedgerError::validation("upiId", "required for withdrawals"));
        };
        WithdrawalLimits::for_balance(session.user.total_points, &self.config)
            .check(txn.amount, upi)?;
        if session.transactions.iter().any(|t| t.id == txn.id) {
            return Err(LedgerError::DuplicateId {
                entity: EntityKind::Transaction,
                id: txn.id.0,
            });
        }

        info!(
            transaction_id = %txn.id,
            kind = ?txn.kind,
            amount = txn.amount,
            status = ?txn.status,
            "transaction recorded"
        );
        session.transactions.insert(0, txn);
        Ok(&session.transactions[0])
    }

    /// Validate a withdrawal against the current balance and record it as
    /// `pending`.
    pub fn request_withdrawal(&mut self, amount: u64, upi_id: &str) -> LedgerResult<Transaction> {
        let session = self.session.as_ref().ok_or(LedgerError::NotAuthenticated)?;
        let draft = match draft_withdrawal(
            amount,
            upi_id,
            session.user.total_points,
            &self.config,
            self.clock.today(),
        ) {
            Ok(txn) => txn,
            Err(e) => {
                warn!(amount, error = %e, "withdrawal rejected");
                return Err(e);
            }
        };
        self.record_transaction(draft).cloned()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether a session is active
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Active session, if any
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Signed-in user, if any
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    /// Referrals, most recent first (empty when signed out)
    #[must_use]
    pub fn referrals(&self) -> &[Referral] {
        match &self.session {
            Some(session) => &session.referrals,
            None => &[],
        }
    }

    /// Transactions, most recent first (empty when signed out)
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        match &self.session {
            Some(session) => &session.transactions,
            None => &[],
        }
    }

    /// Look up one referral
    pub fn referral(&self, id: &ReferralId) -> LedgerResult<&Referral> {
        self.referrals()
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| LedgerError::referral_not_found(id.as_str()))
    }

    /// Newest referrals, up to the configured limit
    #[must_use]
    pub fn recent_referrals(&self) -> &[Referral] {
        let referrals = self.referrals();
        &referrals[..referrals.len().min(self.config.recent_referrals_limit)]
    }

    /// Referrals passing `filter`, in collection order
    #[must_use]
    pub fn search_referrals(&self, filter: &ReferralFilter) -> Vec<&Referral> {
        self.referrals().iter().filter(|r| filter.matches(r)).collect()
    }

    /// Transactions passing `filter`, in collection order
    #[must_use]
    pub fn transactions_of(&self, filter: TransactionFilter) -> Vec<&Transaction> {
        self.transactions()
            .iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    /// Counts and totals over the current collections
    #[must_use]
    pub fn derived_stats(&self) -> DerivedStats {
        let stats = derive_stats(self.referrals(), self.transactions());
        debug!(?stats, "derived stats");
        stats
    }

    /// Withdrawal bounds for the current balance
    pub fn withdrawal_limits(&self) -> LedgerResult<WithdrawalLimits> {
        let user = self.user().ok_or(LedgerError::NotAuthenticated)?;
        Ok(WithdrawalLimits::for_balance(user.total_points, &self.config))
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
