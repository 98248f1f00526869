//! # Domain Errors
//!
//! Error taxonomy for the HTLC client core.
//!
//! Every fallible operation returns a distinguishable kind so callers can
//! decide whether to retry (transient gateway failures), abort (validation
//! and state errors) or reconcile (query status, then proceed).

use super::lock_record::{LockId, LockState};
use super::mechanism::HashMechanism;
use thiserror::Error;

/// Bad local input. Always detected before any ledger interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Recipient identity missing.
    #[error("Recipient not supplied")]
    MissingRecipient,

    /// Expiry is not strictly in the future.
    #[error("Expiry {expiry} is not in the future (now={now})")]
    ExpiryNotInFuture {
        /// Requested expiry (epoch seconds).
        expiry: u64,
        /// Local clock at validation time (epoch seconds).
        now: u64,
    },

    /// Agreement fields do not fit the active shape.
    #[error("Malformed agreement: {0}")]
    MalformedAgreement(String),

    /// Agreement names a different locker than the submitting party.
    #[error("Locker mismatch: agreement names {agreement}, submitted by {submitter}")]
    LockerMismatch {
        /// Locker recorded in the agreement.
        agreement: String,
        /// Identity submitting the lock.
        submitter: String,
    },

    /// Commitment built under a different mechanism than the lock.
    #[error("Hash mechanism mismatch: lock uses {expected}, got {got}")]
    MechanismMismatch {
        /// Mechanism recorded for the lock.
        expected: HashMechanism,
        /// Mechanism of the supplied commitment.
        got: HashMechanism,
    },
}

/// Commitment misuse. Fatal to the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// Preimage length must be in `1..=MAX_PREIMAGE_LEN`.
    #[error("Invalid preimage length: {0}")]
    InvalidLength(usize),

    /// Digest requested before a preimage was set.
    #[error("Digest not ready: preimage has not been set")]
    DigestNotReady,

    /// Preimage requested on a digest-only commitment.
    #[error("Preimage missing: commitment holds only a digest")]
    PreimageMissing,

    /// Preimage already set; commitments are immutable once sealed.
    #[error("Commitment already sealed")]
    AlreadySealed,

    /// Supplied digest has the wrong size for its mechanism.
    #[error("Digest length mismatch for {mechanism}: expected {expected}, got {got}")]
    DigestLengthMismatch {
        /// Mechanism the digest claims to be.
        mechanism: HashMechanism,
        /// Expected digest length in bytes.
        expected: usize,
        /// Actual digest length in bytes.
        got: usize,
    },
}

/// Failure reported by, or while talking to, the ledger gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Ledger endpoint not reachable. Transient.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// Transport failure with the underlying cause attached.
    #[error("Transport failure: {context}")]
    Transport {
        /// What the gateway was doing.
        context: String,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Ledger or contract rejected the submission.
    #[error("Ledger rejected submission: {0}")]
    Rejected(String),

    /// No lock with this id on the ledger.
    #[error("Lock not found: {0}")]
    LockNotFound(LockId),

    /// Lock already claimed by the recipient.
    #[error("Lock {0} already claimed")]
    AlreadyClaimed(LockId),

    /// Lock already reclaimed by its owner.
    #[error("Lock {0} already reclaimed")]
    AlreadyReclaimed(LockId),

    /// Claim arrived after the lock expired.
    #[error("Lock {0} has expired")]
    Expired(LockId),

    /// Reclaim arrived before the lock expired.
    #[error("Lock {0} has not expired yet")]
    NotExpired(LockId),

    /// Revealed preimage does not hash to the stored digest.
    #[error("Preimage does not match digest of lock {0}")]
    PreimageMismatch(LockId),

    /// Caller is not the party allowed to perform this operation.
    #[error("Caller {caller} not authorized for lock {lock_id}")]
    Unauthorized {
        /// Lock the caller tried to act on.
        lock_id: LockId,
        /// Identity of the caller.
        caller: String,
    },
}

impl GatewayError {
    /// Whether the failure is worth retrying as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Transport { .. })
    }

    /// Whether the lock already reached a terminal state on the ledger.
    ///
    /// A reclaim rejected because the lock was claimed is an expected
    /// outcome of the claim/reclaim race, not a fault.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::AlreadyClaimed(_) | Self::AlreadyReclaimed(_))
    }
}

/// Protocol transition attempted from the wrong state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolStateError {
    /// Claim refused locally: the lock's expiry has passed.
    #[error("Claim window expired for lock {lock_id}: expiry={expiry}, now={now}")]
    ClaimWindowExpired {
        /// Lock id.
        lock_id: LockId,
        /// Lock expiry (epoch seconds).
        expiry: u64,
        /// Local clock (epoch seconds).
        now: u64,
    },

    /// Reclaim refused locally: the lock has not expired yet.
    #[error("Reclaim before expiry for lock {lock_id}: expiry={expiry}, now={now}")]
    ReclaimBeforeExpiry {
        /// Lock id.
        lock_id: LockId,
        /// Lock expiry (epoch seconds).
        expiry: u64,
        /// Local clock (epoch seconds).
        now: u64,
    },

    /// No transition leaves a terminal state.
    #[error("Lock is in terminal state {0:?}")]
    TerminalState(LockState),

    /// Transition not allowed by the state machine.
    #[error("Invalid lock transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current state.
        from: LockState,
        /// Attempted state.
        to: LockState,
    },

    /// Ledger id is assigned exactly once.
    #[error("Lock id already assigned: {0}")]
    LockIdAlreadyAssigned(LockId),

    /// Record has no ledger id yet.
    #[error("Lock id not assigned")]
    MissingLockId,
}

/// Payload encoding/decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Envelope version outside the supported range.
    #[error("Unsupported payload version {version} (supported: {min}-{max})")]
    UnsupportedVersion {
        /// Version found in the envelope.
        version: u8,
        /// Oldest supported version.
        min: u8,
        /// Newest supported version.
        max: u8,
    },

    /// Envelope carries a different payload kind.
    #[error("Unexpected payload kind: expected {expected}, got {actual}")]
    UnexpectedKind {
        /// Kind the caller asked for.
        expected: String,
        /// Kind found in the envelope.
        actual: String,
    },

    /// Unknown hash mechanism tag.
    #[error("Unknown hash mechanism tag: {0}")]
    UnknownMechanism(u8),

    /// Unknown time-spec tag.
    #[error("Unknown time spec tag: {0}")]
    UnknownTimeSpec(u8),

    /// Unknown lock-mechanism tag.
    #[error("Unknown lock mechanism tag: {0}")]
    UnknownLockMechanism(u8),

    /// Digest length disagrees with the mechanism tag.
    #[error("Digest length {got} does not match {mechanism} ({expected} bytes)")]
    DigestLength {
        /// Mechanism named in the payload.
        mechanism: HashMechanism,
        /// Expected digest length.
        expected: usize,
        /// Length found.
        got: usize,
    },

    /// Agreement body fields disagree with its shape tag.
    #[error("Agreement shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Low-level (de)serialization failure.
    #[error("Serialization failure: {0}")]
    Serialization(String),
}

/// Top-level error for every core operation.
#[derive(Debug, Error)]
pub enum HtlcError {
    /// Local input rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Commitment used incorrectly.
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    /// Ledger gateway failure, cause preserved.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Transition not allowed from the current state.
    #[error(transparent)]
    ProtocolState(#[from] ProtocolStateError),

    /// Payload could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl HtlcError {
    /// Whether the error was raised locally, without reaching the ledger.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Gateway(_))
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_transient())
    }

    /// Gateway error, if this is one.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(e) => Some(e),
            _ => None,
        }
    }
}
