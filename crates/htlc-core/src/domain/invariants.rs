//! # Domain Invariants
//!
//! Preconditions the driver checks before any ledger interaction.

use super::agreement::ExchangeAgreement;
use super::commitment::Commitment;
use super::errors::{CommitmentError, ValidationError};

/// Invariant: a lock names someone who can claim it.
pub fn invariant_recipient_present(agreement: &ExchangeAgreement) -> Result<(), ValidationError> {
    if agreement.recipient().trim().is_empty() {
        return Err(ValidationError::MissingRecipient);
    }
    Ok(())
}

/// Invariant: expiry strictly after `now + min_duration_secs`.
pub fn invariant_expiry_in_future(
    expiry: u64,
    now: u64,
    min_duration_secs: u64,
) -> Result<(), ValidationError> {
    if expiry <= now.saturating_add(min_duration_secs) {
        return Err(ValidationError::ExpiryNotInFuture { expiry, now });
    }
    Ok(())
}

/// Invariant: an agreement that records a locker records the submitter.
pub fn invariant_locker_matches(
    agreement: &ExchangeAgreement,
    submitter: &str,
) -> Result<(), ValidationError> {
    match agreement.locker() {
        Some(locker) if locker != submitter => Err(ValidationError::LockerMismatch {
            agreement: locker.to_string(),
            submitter: submitter.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Invariant: only a ready digest is published.
pub fn invariant_digest_ready(commitment: &Commitment) -> Result<(), CommitmentError> {
    commitment.digest_bytes().map(|_| ())
}
