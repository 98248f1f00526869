//! # Hash Commitment
//!
//! A commitment binds a hash mechanism, a secret preimage and its public
//! digest.
//!
//! The locker generates the commitment, publishes only the digest with the
//! lock, and reveals the preimage at claim time. Other parties rebuild a
//! commitment either from a revealed preimage or digest-only from ledger
//! data.
//!
//! ## Invariants
//!
//! - `digest == mechanism.compute(preimage)` whenever both are present
//! - no digest is ever produced before a preimage has been set
//! - the mechanism is bound at construction and never reassigned
//! - the preimage is never serialized

use super::errors::CommitmentError;
use super::mechanism::HashMechanism;
use super::secure_preimage::SecurePreimage;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Longest preimage accepted, in bytes. Keeps every claim payload decodable.
pub const MAX_PREIMAGE_LEN: usize = 1024;

/// Key material held by a commitment.
#[derive(Clone, PartialEq, Eq)]
enum Material {
    /// Mechanism chosen, preimage not set yet.
    Pending,
    /// Preimage known, digest derived from it.
    Sealed {
        preimage: SecurePreimage,
        digest: Vec<u8>,
    },
    /// Only the public digest is known.
    DigestOnly { digest: Vec<u8> },
}

/// HTLC hash commitment.
#[derive(Clone, PartialEq, Eq)]
pub struct Commitment {
    mechanism: HashMechanism,
    material: Material,
}

impl Commitment {
    /// Pending commitment: mechanism bound, nothing to publish yet.
    pub fn new(mechanism: HashMechanism) -> Self {
        Self {
            mechanism,
            material: Material::Pending,
        }
    }

    /// Fresh commitment over `length` bytes from the OS CSPRNG.
    pub fn generate(mechanism: HashMechanism, length: usize) -> Result<Self, CommitmentError> {
        if length == 0 || length > MAX_PREIMAGE_LEN {
            return Err(CommitmentError::InvalidLength(length));
        }
        let mut bytes = vec![0u8; length];
        OsRng.fill_bytes(&mut bytes);
        Self::from_preimage(mechanism, SecurePreimage::new(bytes))
    }

    /// Commitment over a known preimage. The digest is computed immediately.
    pub fn from_preimage(
        mechanism: HashMechanism,
        preimage: impl Into<SecurePreimage>,
    ) -> Result<Self, CommitmentError> {
        let mut commitment = Self::new(mechanism);
        commitment.set_preimage(preimage)?;
        Ok(commitment)
    }

    /// Digest-only commitment rebuilt from ledger data.
    pub fn from_digest(
        mechanism: HashMechanism,
        digest: Vec<u8>,
    ) -> Result<Self, CommitmentError> {
        if digest.len() != mechanism.digest_len() {
            return Err(CommitmentError::DigestLengthMismatch {
                mechanism,
                expected: mechanism.digest_len(),
                got: digest.len(),
            });
        }
        Ok(Self {
            mechanism,
            material: Material::DigestOnly { digest },
        })
    }

    /// Seal a pending commitment with its preimage.
    pub fn set_preimage(
        &mut self,
        preimage: impl Into<SecurePreimage>,
    ) -> Result<(), CommitmentError> {
        if self.material != Material::Pending {
            return Err(CommitmentError::AlreadySealed);
        }
        let preimage = preimage.into();
        if preimage.is_empty() || preimage.len() > MAX_PREIMAGE_LEN {
            return Err(CommitmentError::InvalidLength(preimage.len()));
        }
        let digest = self.mechanism.compute(preimage.as_bytes());
        self.material = Material::Sealed { preimage, digest };
        Ok(())
    }

    /// Mechanism tag the verifier must apply.
    pub fn mechanism_id(&self) -> HashMechanism {
        self.mechanism
    }

    /// Public digest.
    pub fn digest_bytes(&self) -> Result<&[u8], CommitmentError> {
        match &self.material {
            Material::Pending => Err(CommitmentError::DigestNotReady),
            Material::Sealed { digest, .. } | Material::DigestOnly { digest } => {
                Ok(digest.as_slice())
            }
        }
    }

    /// Secret preimage, for transmission at claim time only.
    pub fn preimage_bytes(&self) -> Result<&[u8], CommitmentError> {
        match &self.material {
            Material::Sealed { preimage, .. } => Ok(preimage.as_bytes()),
            Material::Pending | Material::DigestOnly { .. } => {
                Err(CommitmentError::PreimageMissing)
            }
        }
    }

    /// Whether a digest can be published.
    pub fn is_ready(&self) -> bool {
        !matches!(self.material, Material::Pending)
    }

    /// Whether this party holds the secret.
    pub fn has_preimage(&self) -> bool {
        matches!(self.material, Material::Sealed { .. })
    }

    /// Check a candidate preimage against the digest.
    pub fn verify(&self, preimage: &[u8]) -> Result<bool, CommitmentError> {
        let digest = self.digest_bytes()?;
        Ok(self.mechanism.compute(preimage) == digest)
    }

    /// Copy without the preimage.
    pub fn redacted(&self) -> Self {
        let material = match &self.material {
            Material::Sealed { digest, .. } => Material::DigestOnly {
                digest: digest.clone(),
            },
            other => other.clone(),
        };
        Self {
            mechanism: self.mechanism,
            material,
        }
    }

    /// Short hex prefix of the digest for log lines.
    pub fn short_digest(&self) -> String {
        match self.digest_bytes() {
            Ok(d) => hex::encode(&d[..d.len().min(4)]),
            Err(_) => "pending".to_string(),
        }
    }
}

impl std::fmt::Debug for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.material {
            Material::Pending => "pending",
            Material::Sealed { .. } => "sealed",
            Material::DigestOnly { .. } => "digest-only",
        };
        f.debug_struct("Commitment")
            .field("mechanism", &self.mechanism)
            .field("state", &state)
            .field("digest", &self.short_digest())
            .finish()
    }
}

/// Public face of a commitment; the only form that is ever serialized.
#[derive(Serialize, Deserialize)]
struct PublicCommitment {
    mechanism: HashMechanism,
    digest: Option<Vec<u8>>,
}

impl Serialize for Commitment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        PublicCommitment {
            mechanism: self.mechanism,
            digest: self.digest_bytes().ok().map(<[u8]>::to_vec),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let public = PublicCommitment::deserialize(deserializer)?;
        match public.digest {
            Some(digest) => {
                Commitment::from_digest(public.mechanism, digest).map_err(serde::de::Error::custom)
            }
            None => Ok(Commitment::new(public.mechanism)),
        }
    }
}
