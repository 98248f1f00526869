//! # Lock Record
//!
//! Client-side view of one HTLC lock and its protocol state.
//!
//! ```text
//! Initiated ──lock ok──▶ Locked ──claim──▶ Claimed
//!     │                     │
//!     └──rejected──▶ Failed └──reclaim──▶ Reclaimed
//! ```

use super::agreement::ExchangeAgreement;
use super::commitment::Commitment;
use super::errors::ProtocolStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque lock identifier assigned by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockId(String);

impl LockId {
    /// Wrap a ledger-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTLC protocol state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// Built locally, not yet submitted.
    #[default]
    Initiated,
    /// Ledger holds the asset against the published digest.
    Locked,
    /// Recipient revealed the preimage before expiry.
    Claimed,
    /// Owner recovered the asset after expiry.
    Reclaimed,
    /// Lock submission rejected; no asset was ever held.
    Failed,
}

impl LockState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: LockState) -> bool {
        matches!(
            (self, next),
            (Self::Initiated, Self::Locked)
                | (Self::Initiated, Self::Failed)
                | (Self::Locked, Self::Claimed)
                | (Self::Locked, Self::Reclaimed)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Reclaimed | Self::Failed)
    }
}

/// One lock attempt, owned by the party that initiated it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    lock_id: Option<LockId>,
    commitment: Commitment,
    expiry: u64,
    agreement: ExchangeAgreement,
    locker: String,
    state: LockState,
}

impl LockRecord {
    /// New lock attempt in `Initiated`.
    ///
    /// Only the public half of `commitment` is kept; the preimage stays
    /// with the caller.
    pub fn new(
        agreement: ExchangeAgreement,
        commitment: &Commitment,
        expiry: u64,
        locker: impl Into<String>,
    ) -> Self {
        Self {
            lock_id: None,
            commitment: commitment.redacted(),
            expiry,
            agreement,
            locker: locker.into(),
            state: LockState::Initiated,
        }
    }

    /// Counterparty's view of a lock already confirmed on the ledger.
    pub fn observed(
        lock_id: LockId,
        commitment: &Commitment,
        expiry: u64,
        agreement: ExchangeAgreement,
        locker: impl Into<String>,
    ) -> Self {
        Self {
            lock_id: Some(lock_id),
            commitment: commitment.redacted(),
            expiry,
            agreement,
            locker: locker.into(),
            state: LockState::Locked,
        }
    }

    /// Ledger id, once assigned.
    pub fn lock_id(&self) -> Option<&LockId> {
        self.lock_id.as_ref()
    }

    /// Ledger id, or `MissingLockId`.
    pub fn require_lock_id(&self) -> Result<&LockId, ProtocolStateError> {
        self.lock_id.as_ref().ok_or(ProtocolStateError::MissingLockId)
    }

    /// Public commitment.
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Expiry in epoch seconds.
    pub fn expiry(&self) -> u64 {
        self.expiry
    }

    /// Agreement being locked.
    pub fn agreement(&self) -> &ExchangeAgreement {
        &self.agreement
    }

    /// Identity that submitted (or will submit) the lock.
    pub fn locker(&self) -> &str {
        &self.locker
    }

    /// Current protocol state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Whether a claim sent at `now` still lands `margin_secs` before expiry.
    pub fn claim_window_open(&self, now: u64, margin_secs: u64) -> bool {
        now.saturating_add(margin_secs) < self.expiry
    }

    /// Reclaim becomes possible at expiry.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiry
    }

    /// Record the ledger id. Happens exactly once.
    pub fn assign_lock_id(&mut self, lock_id: LockId) -> Result<(), ProtocolStateError> {
        if let Some(existing) = &self.lock_id {
            return Err(ProtocolStateError::LockIdAlreadyAssigned(existing.clone()));
        }
        self.lock_id = Some(lock_id);
        Ok(())
    }

    /// Transition to new state.
    pub fn transition_to(&mut self, next: LockState) -> Result<(), ProtocolStateError> {
        if self.state.is_terminal() {
            return Err(ProtocolStateError::TerminalState(self.state));
        }
        if !self.state.can_transition_to(next) {
            return Err(ProtocolStateError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
