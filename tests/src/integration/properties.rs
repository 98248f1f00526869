//! # Payload and Commitment Properties
//!
//! Properties every ledger relies on: encoders are deterministic, decoders
//! invert them, generated secrets are independent, and nothing is published
//! before the digest exists.

#[cfg(test)]
mod tests {
    use htlc_core::{
        decode_agreement, decode_claim_metadata, decode_lock_metadata, encode_agreement,
        encode_claim_metadata, encode_fungible_asset, encode_hybrid_asset, encode_lock_metadata,
        encode_unique_asset, peek_kind, CodecError, Commitment, CommitmentError,
        ExchangeAgreement, HashMechanism, HtlcError, LockMechanism, PayloadKind, TimeSpec,
    };

    #[test]
    fn test_agreement_encoding_is_deterministic() {
        let a = encode_unique_asset("bond", "b-1", "bob", "alice").unwrap();
        let b = encode_unique_asset("bond", "b-1", "bob", "alice").unwrap();
        assert_eq!(a, b);

        let c = encode_unique_asset("bond", "b-2", "bob", "alice").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_all_shapes_decode_to_their_agreement() {
        let cases = [
            (
                encode_unique_asset("bond", "b-1", "bob", "alice").unwrap(),
                ExchangeAgreement::unique("bond", "b-1", "bob", "alice"),
            ),
            (
                encode_fungible_asset("TOKEN", 1_000, "alice", "bob").unwrap(),
                ExchangeAgreement::fungible("TOKEN", 1_000, "alice", "bob"),
            ),
            (
                encode_hybrid_asset("bond", "b-9", &[0xca, 0xfe], 7, "bob").unwrap(),
                ExchangeAgreement::hybrid("bond", "b-9", vec![0xca, 0xfe], 7, "bob"),
            ),
        ];

        for (bytes, expected) in cases {
            assert_eq!(peek_kind(&bytes).unwrap(), PayloadKind::ExchangeAgreement);
            assert_eq!(decode_agreement(&bytes).unwrap(), expected);
            assert_eq!(encode_agreement(&expected).unwrap(), bytes);
        }
    }

    #[test]
    fn test_generated_preimages_are_independent() {
        let a = Commitment::generate(HashMechanism::Sha256, 32).unwrap();
        let b = Commitment::generate(HashMechanism::Sha256, 32).unwrap();
        assert_ne!(a.preimage_bytes().unwrap(), b.preimage_bytes().unwrap());
        assert_ne!(a.digest_bytes().unwrap(), b.digest_bytes().unwrap());
    }

    #[test]
    fn test_digest_is_deterministic_per_mechanism() {
        for mechanism in HashMechanism::ALL {
            let a = Commitment::from_preimage(mechanism, b"shared secret".to_vec()).unwrap();
            let b = Commitment::from_preimage(mechanism, b"shared secret".to_vec()).unwrap();
            assert_eq!(a.digest_bytes().unwrap(), b.digest_bytes().unwrap());
            assert_eq!(a.digest_bytes().unwrap().len(), mechanism.digest_len());
            assert!(a.verify(b"shared secret").unwrap());
        }
    }

    #[test]
    fn test_pending_commitment_publishes_nothing() {
        let pending = Commitment::new(HashMechanism::Sha256);
        assert_eq!(pending.digest_bytes(), Err(CommitmentError::DigestNotReady));

        let err = encode_lock_metadata(&pending, 1_700_000_030).unwrap_err();
        assert!(matches!(
            err,
            HtlcError::Commitment(CommitmentError::DigestNotReady)
        ));
    }

    #[test]
    fn test_lock_metadata_carries_digest_not_preimage() {
        let secret = Commitment::generate(HashMechanism::Sha512, 32).unwrap();
        let bytes = encode_lock_metadata(&secret, 1_700_000_030).unwrap();
        let meta = decode_lock_metadata(&bytes).unwrap();

        assert_eq!(meta.mechanism, HashMechanism::Sha512);
        assert_eq!(meta.digest, secret.digest_bytes().unwrap());
        assert_eq!(meta.expiry_epoch_secs, 1_700_000_030);
        assert_eq!(meta.time_spec, TimeSpec::Epoch);

        let preimage = secret.preimage_bytes().unwrap();
        assert!(!bytes.windows(preimage.len()).any(|w| w == preimage));
    }

    #[test]
    fn test_claim_metadata_recovers_preimage() {
        let secret = Commitment::generate(HashMechanism::Sha256, 32).unwrap();
        let bytes = encode_claim_metadata(&secret).unwrap();
        let claim = decode_claim_metadata(&bytes).unwrap();

        assert_eq!(claim.lock_mechanism, LockMechanism::Htlc);
        assert_eq!(claim.mechanism, HashMechanism::Sha256);
        assert_eq!(claim.preimage.as_bytes(), secret.preimage_bytes().unwrap());
    }

    #[test]
    fn test_payload_kinds_are_not_interchangeable() {
        let secret = Commitment::generate(HashMechanism::Sha256, 32).unwrap();
        let lock = encode_lock_metadata(&secret, 1_700_000_030).unwrap();

        let err = decode_claim_metadata(&lock).unwrap_err();
        assert!(matches!(
            err,
            HtlcError::Codec(CodecError::UnexpectedKind { .. })
        ));
        assert!(decode_agreement(&lock).is_err());
    }
}
