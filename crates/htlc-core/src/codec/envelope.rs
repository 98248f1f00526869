//! # Payload Envelope
//!
//! Every payload handed to the ledger is wrapped in a versioned, kind-tagged
//! envelope so a mismatched verifier fails loudly instead of misreading the
//! body.
//!
//! Layout (bincode, fixed-width little-endian integers):
//!
//! ```text
//! version: u8 | kind: u32 | body_len: u64 | body: [u8; body_len]
//! ```

use crate::domain::CodecError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload format version written by this crate.
pub const PAYLOAD_VERSION: u8 = 1;
/// Oldest payload version this crate reads.
pub const MIN_SUPPORTED_VERSION: u8 = 1;
/// Newest payload version this crate reads.
pub const MAX_SUPPORTED_VERSION: u8 = 1;

/// Upper bound on any decoded payload. Encoding is not capped; the domain
/// limits on preimage and opaque data keep valid payloads well below it.
pub const MAX_PAYLOAD_BYTES: u64 = 64 * 1024;

/// What the envelope body contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    /// Asset exchange agreement.
    ExchangeAgreement,
    /// Lock metadata (mechanism, digest, expiry).
    LockInfo,
    /// Claim metadata (mechanism, preimage).
    ClaimInfo,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExchangeAgreement => "exchange-agreement",
            Self::LockInfo => "lock-info",
            Self::ClaimInfo => "claim-info",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u8,
    kind: PayloadKind,
    body: Vec<u8>,
}

fn encode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_no_limit()
}

fn decode_options() -> impl Options {
    encode_options()
        .with_limit(MAX_PAYLOAD_BYTES)
        .reject_trailing_bytes()
}

fn serialization_error(e: bincode::Error) -> CodecError {
    CodecError::Serialization(e.to_string())
}

/// Serialize `body` and wrap it in an envelope of `kind`.
pub(crate) fn seal<T: Serialize>(kind: PayloadKind, body: &T) -> Result<Vec<u8>, CodecError> {
    let body = encode_options().serialize(body).map_err(serialization_error)?;
    let envelope = Envelope {
        version: PAYLOAD_VERSION,
        kind,
        body,
    };
    encode_options()
        .serialize(&envelope)
        .map_err(serialization_error)
}

/// Unwrap an envelope, checking version and kind, and decode its body.
pub(crate) fn open<T: DeserializeOwned>(
    expected: PayloadKind,
    bytes: &[u8],
) -> Result<T, CodecError> {
    let envelope: Envelope = decode_options()
        .deserialize(bytes)
        .map_err(serialization_error)?;

    if !(MIN_SUPPORTED_VERSION..=MAX_SUPPORTED_VERSION).contains(&envelope.version) {
        return Err(CodecError::UnsupportedVersion {
            version: envelope.version,
            min: MIN_SUPPORTED_VERSION,
            max: MAX_SUPPORTED_VERSION,
        });
    }
    if envelope.kind != expected {
        return Err(CodecError::UnexpectedKind {
            expected: expected.to_string(),
            actual: envelope.kind.to_string(),
        });
    }

    decode_options()
        .deserialize(&envelope.body)
        .map_err(serialization_error)
}

/// Kind of an encoded payload, without decoding its body.
pub fn peek_kind(bytes: &[u8]) -> Result<PayloadKind, CodecError> {
    let envelope: Envelope = decode_options()
        .deserialize(bytes)
        .map_err(serialization_error)?;
    Ok(envelope.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open() {
        let bytes = seal(PayloadKind::LockInfo, &(7u8, 42u64)).unwrap();
        assert_eq!(bytes[0], PAYLOAD_VERSION);
        assert_eq!(peek_kind(&bytes).unwrap(), PayloadKind::LockInfo);

        let body: (u8, u64) = open(PayloadKind::LockInfo, &bytes).unwrap();
        assert_eq!(body, (7, 42));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let bytes = seal(PayloadKind::ClaimInfo, &1u8).unwrap();
        let result: Result<u8, _> = open(PayloadKind::LockInfo, &bytes);
        assert!(matches!(result, Err(CodecError::UnexpectedKind { .. })));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut bytes = seal(PayloadKind::ClaimInfo, &1u8).unwrap();
        bytes[0] = MAX_SUPPORTED_VERSION + 1;
        let result: Result<u8, _> = open(PayloadKind::ClaimInfo, &bytes);
        assert_eq!(
            result,
            Err(CodecError::UnsupportedVersion {
                version: MAX_SUPPORTED_VERSION + 1,
                min: MIN_SUPPORTED_VERSION,
                max: MAX_SUPPORTED_VERSION,
            })
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = seal(PayloadKind::ClaimInfo, &1u8).unwrap();
        bytes.push(0);
        let result: Result<u8, _> = open(PayloadKind::ClaimInfo, &bytes);
        assert!(matches!(result, Err(CodecError::Serialization(_))));
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = seal(PayloadKind::ClaimInfo, &1u64).unwrap();
        let result: Result<u64, _> = open(PayloadKind::ClaimInfo, &bytes[..bytes.len() - 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_body_encodes_but_is_refused_on_decode() {
        let body = vec![7u8; MAX_PAYLOAD_BYTES as usize + 1];
        let bytes = seal(PayloadKind::ExchangeAgreement, &body).unwrap();
        assert!(bytes.len() > MAX_PAYLOAD_BYTES as usize);

        let result: Result<Vec<u8>, _> = open(PayloadKind::ExchangeAgreement, &bytes);
        assert!(matches!(result, Err(CodecError::Serialization(_))));
    }

    #[test]
    fn test_body_just_under_limit_decodes() {
        // header: version (1) + kind (4) + two length prefixes (8 each)
        let body = vec![7u8; MAX_PAYLOAD_BYTES as usize - 21];
        let bytes = seal(PayloadKind::ExchangeAgreement, &body).unwrap();
        assert_eq!(bytes.len(), MAX_PAYLOAD_BYTES as usize);

        let decoded: Vec<u8> = open(PayloadKind::ExchangeAgreement, &bytes).unwrap();
        assert_eq!(decoded.len(), body.len());
    }

    #[test]
    fn test_deterministic() {
        let a = seal(PayloadKind::ExchangeAgreement, &("x", 1u64)).unwrap();
        let b = seal(PayloadKind::ExchangeAgreement, &("x", 1u64)).unwrap();
        assert_eq!(a, b);
    }
}
