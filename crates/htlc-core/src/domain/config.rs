//! # Driver Configuration
//!
//! Defaults for commitment generation and the local time guards.

use super::commitment::MAX_PREIMAGE_LEN;
use super::errors::CommitmentError;
use super::mechanism::HashMechanism;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// HTLC driver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtlcConfig {
    /// Mechanism for freshly generated commitments.
    pub default_mechanism: HashMechanism,
    /// Preimage length in bytes for generated commitments.
    pub preimage_len: usize,
    /// Shortest accepted lock lifetime; expiry must exceed `now + this`.
    pub min_lock_duration_secs: u64,
    /// Claims are refused locally once `now + this >= expiry`.
    pub claim_safety_margin_secs: u64,
}

impl Default for HtlcConfig {
    fn default() -> Self {
        Self {
            default_mechanism: HashMechanism::Sha256,
            preimage_len: 32,
            min_lock_duration_secs: 0,
            claim_safety_margin_secs: 0,
        }
    }
}

impl HtlcConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HTLC_HASH_MECHANISM`: `sha256` or `sha512` (default: sha256)
    /// - `HTLC_PREIMAGE_LEN`: preimage length in bytes (default: 32)
    /// - `HTLC_MIN_LOCK_SECS`: minimum lock lifetime (default: 0)
    /// - `HTLC_CLAIM_MARGIN_SECS`: claim safety margin (default: 0)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_mechanism: env_or("HTLC_HASH_MECHANISM", defaults.default_mechanism),
            preimage_len: env_or("HTLC_PREIMAGE_LEN", defaults.preimage_len),
            min_lock_duration_secs: env_or("HTLC_MIN_LOCK_SECS", defaults.min_lock_duration_secs),
            claim_safety_margin_secs: env_or(
                "HTLC_CLAIM_MARGIN_SECS",
                defaults.claim_safety_margin_secs,
            ),
        }
    }

    /// Reject configurations that could never produce a commitment.
    pub fn validate(&self) -> Result<(), CommitmentError> {
        if self.preimage_len == 0 || self.preimage_len > MAX_PREIMAGE_LEN {
            return Err(CommitmentError::InvalidLength(self.preimage_len));
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    raw.trim().parse().unwrap_or_else(|_| {
        warn!("[htlc] Ignoring invalid {}={:?}, using {:?}", key, raw, default);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HtlcConfig::default();
        assert_eq!(config.default_mechanism, HashMechanism::Sha256);
        assert_eq!(config.preimage_len, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_preimage_len_invalid() {
        let config = HtlcConfig {
            preimage_len: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(CommitmentError::InvalidLength(0)));
    }

    #[test]
    fn test_oversized_preimage_len_invalid() {
        let config = HtlcConfig {
            preimage_len: MAX_PREIMAGE_LEN + 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(CommitmentError::InvalidLength(MAX_PREIMAGE_LEN + 1))
        );
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("K", "64", 32usize), 64);
        assert_eq!(parse_or("K", "many", 32usize), 32);
        assert_eq!(
            parse_or("K", "sha512", HashMechanism::Sha256),
            HashMechanism::Sha512
        );
        assert_eq!(
            parse_or("K", "crc32", HashMechanism::Sha256),
            HashMechanism::Sha256
        );
    }
}
