//! # Lock and Claim Metadata
//!
//! Lock metadata publishes the digest; claim metadata reveals the
//! preimage. Both name the hash mechanism so the ledger recomputes with
//! the right algorithm.

use super::envelope::{open, seal, PayloadKind};
use crate::domain::{
    CodecError, Commitment, HashMechanism, HtlcError, SecurePreimage,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// How the expiry is expressed. Only absolute epoch seconds are emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeSpec {
    /// Absolute Unix time in seconds.
    Epoch,
}

impl TimeSpec {
    /// Tag used on the wire.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Epoch => 0,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Epoch),
            other => Err(CodecError::UnknownTimeSpec(other)),
        }
    }
}

/// Lock mechanism a claim is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockMechanism {
    /// Hashed time-lock.
    Htlc,
}

impl LockMechanism {
    /// Tag used on the wire.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Htlc => 0,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Htlc),
            other => Err(CodecError::UnknownLockMechanism(other)),
        }
    }
}

/// Decoded lock metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockMetadata {
    /// Mechanism the digest was computed with.
    pub mechanism: HashMechanism,
    /// Published digest.
    pub digest: Vec<u8>,
    /// Expiry in epoch seconds.
    pub expiry_epoch_secs: u64,
    /// Time basis of `expiry_epoch_secs`.
    pub time_spec: TimeSpec,
}

impl LockMetadata {
    /// Digest-only commitment for verifying a later claim.
    pub fn commitment(&self) -> Result<Commitment, HtlcError> {
        Ok(Commitment::from_digest(self.mechanism, self.digest.clone())?)
    }
}

/// Decoded claim metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimMetadata {
    /// Lock mechanism addressed.
    pub lock_mechanism: LockMechanism,
    /// Mechanism the verifier must apply.
    pub mechanism: HashMechanism,
    /// Revealed preimage.
    pub preimage: SecurePreimage,
}

#[derive(Serialize, Deserialize)]
struct LockInfoWire {
    mechanism: u8,
    digest: Vec<u8>,
    expiry_epoch_secs: u64,
    time_spec: u8,
}

#[derive(Serialize, Deserialize)]
struct ClaimInfoWire {
    lock_mechanism: u8,
    mechanism: u8,
    preimage: Vec<u8>,
}

fn mechanism_from_tag(tag: u8) -> Result<HashMechanism, CodecError> {
    HashMechanism::from_wire_tag(tag).ok_or(CodecError::UnknownMechanism(tag))
}

/// Encode lock metadata: mechanism, digest, expiry and time basis.
pub fn encode_lock_metadata(commitment: &Commitment, expiry: u64) -> Result<Vec<u8>, HtlcError> {
    let wire = LockInfoWire {
        mechanism: commitment.mechanism_id().wire_tag(),
        digest: commitment.digest_bytes()?.to_vec(),
        expiry_epoch_secs: expiry,
        time_spec: TimeSpec::Epoch.tag(),
    };
    Ok(seal(PayloadKind::LockInfo, &wire)?)
}

/// Encode claim metadata: mechanism and the preimage itself.
pub fn encode_claim_metadata(commitment: &Commitment) -> Result<Vec<u8>, HtlcError> {
    let mut wire = ClaimInfoWire {
        lock_mechanism: LockMechanism::Htlc.tag(),
        mechanism: commitment.mechanism_id().wire_tag(),
        preimage: commitment.preimage_bytes()?.to_vec(),
    };
    let sealed = seal(PayloadKind::ClaimInfo, &wire);
    wire.preimage.zeroize();
    Ok(sealed?)
}

/// Decode a lock metadata payload.
pub fn decode_lock_metadata(bytes: &[u8]) -> Result<LockMetadata, HtlcError> {
    let wire: LockInfoWire = open(PayloadKind::LockInfo, bytes)?;
    let mechanism = mechanism_from_tag(wire.mechanism)?;
    if wire.digest.len() != mechanism.digest_len() {
        return Err(CodecError::DigestLength {
            mechanism,
            expected: mechanism.digest_len(),
            got: wire.digest.len(),
        }
        .into());
    }
    Ok(LockMetadata {
        mechanism,
        digest: wire.digest,
        expiry_epoch_secs: wire.expiry_epoch_secs,
        time_spec: TimeSpec::from_tag(wire.time_spec)?,
    })
}

/// Decode a claim metadata payload.
pub fn decode_claim_metadata(bytes: &[u8]) -> Result<ClaimMetadata, HtlcError> {
    let wire: ClaimInfoWire = open(PayloadKind::ClaimInfo, bytes)?;
    Ok(ClaimMetadata {
        lock_mechanism: LockMechanism::from_tag(wire.lock_mechanism)?,
        mechanism: mechanism_from_tag(wire.mechanism)?,
        preimage: SecurePreimage::new(wire.preimage),
    })
}
