//! # Secure Preimage
//!
//! Owned HTLC preimage that zeroizes its memory on drop.
//!
//! The preimage is the claim credential: whoever learns it before expiry
//! can take the locked asset. It must not linger in memory, in logs, or in
//! debug output.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A preimage that zeroizes on drop and never prints its bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecurePreimage {
    inner: Vec<u8>,
}

impl SecurePreimage {
    /// Take ownership of preimage bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { inner: bytes }
    }

    /// Copy preimage bytes from a slice.
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            inner: slice.to_vec(),
        }
    }

    /// Raw preimage bytes. Use immediately and let go.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the preimage is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<Vec<u8>> for SecurePreimage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for SecurePreimage {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl std::fmt::Debug for SecurePreimage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecurePreimage({} bytes, ***)", self.inner.len())
    }
}

// Hex on the wire of any serde format, never raw bytes in logs
impl Serialize for SecurePreimage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.inner))
    }
}

impl<'de> Deserialize<'de> for SecurePreimage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom);
        s.zeroize();
        bytes.map(Self::new)
    }
}
