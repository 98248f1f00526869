//! # Hash Mechanisms
//!
//! The audited set of digest algorithms an HTLC commitment can use.
//!
//! Each variant carries a stable wire tag so the verifier on the ledger
//! applies the matching algorithm. Adding a mechanism means adding a
//! variant here; the codec and the driver only ever see `wire_tag()` and
//! digest bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// Digest algorithm bound to a commitment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMechanism {
    /// SHA-256, 32-byte digest.
    #[default]
    Sha256,
    /// SHA-512, 64-byte digest.
    Sha512,
}

impl HashMechanism {
    /// Every supported mechanism.
    pub const ALL: [HashMechanism; 2] = [HashMechanism::Sha256, HashMechanism::Sha512];

    /// Tag used on the wire. Matches the ledger's mechanism enumeration.
    pub const fn wire_tag(self) -> u8 {
        match self {
            Self::Sha256 => 0,
            Self::Sha512 => 1,
        }
    }

    /// Resolve a wire tag.
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.wire_tag() == tag)
    }

    /// Digest size in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Compute the digest of `preimage`.
    pub fn compute(self, preimage: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => digest_with::<Sha256>(preimage),
            Self::Sha512 => digest_with::<Sha512>(preimage),
        }
    }

    /// Lowercase name, as used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

fn digest_with<D: Digest>(preimage: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(preimage);
    hasher.finalize().to_vec()
}

impl fmt::Display for HashMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashMechanism {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(format!("unknown hash mechanism: {other}")),
        }
    }
}
