//! # Codec Module
//!
//! Pure, deterministic encoders (and matching decoders) for every payload
//! handed to the ledger gateway. Same inputs always give byte-identical
//! output; the ledger recomputes digests from these exact bytes.

pub mod agreement;
pub mod envelope;
pub mod metadata;

pub use agreement::{
    decode_agreement, encode_agreement, encode_fungible_asset, encode_hybrid_asset,
    encode_unique_asset,
};
pub use envelope::{peek_kind, PayloadKind, MAX_PAYLOAD_BYTES, PAYLOAD_VERSION};
pub use metadata::{
    decode_claim_metadata, decode_lock_metadata, encode_claim_metadata, encode_lock_metadata,
    ClaimMetadata, LockMechanism, LockMetadata, TimeSpec,
};
