//! # HTLC Core
//!
//! Client-side core for hash time-locked asset exchange.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Lets a participant take part in an HTLC exchange against any ledger
//! reachable through a `LedgerGateway`:
//! - Generate a secret preimage and publish only its digest
//! - Encode the exchange agreement and lock/claim metadata deterministically
//! - Drive a lock through lock → claim or lock → reclaim
//!
//! ## Security Properties
//!
//! | Property | Enforcement |
//! |----------|-------------|
//! | Preimage secrecy | `SecurePreimage` zeroizes on drop, never serialized or logged |
//! | Digest-only publication | Lock metadata carries the digest; records keep a redacted commitment |
//! | No wasted submissions | Expiry, recipient and digest checks run before the gateway |
//! | Ledger is arbiter | Claim/reclaim races resolved by the ledger, record synced afterwards |
//!
//! ## Module Structure
//!
//! ```text
//! htlc-core/
//! ├── domain/      # Commitment, HashMechanism, ExchangeAgreement, LockRecord, errors, config
//! ├── codec/       # Versioned envelope, agreement and metadata encoders
//! ├── algorithms/  # HtlcDriver: lock / claim / reclaim / status
//! ├── ports/       # LedgerGateway, TimeSource
//! └── adapters/    # InMemoryLedgerGateway, ManualTimeSource
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod codec;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{InMemoryLedgerGateway, ManualTimeSource};
pub use algorithms::HtlcDriver;
pub use codec::{
    decode_agreement, decode_claim_metadata, decode_lock_metadata, encode_agreement,
    encode_claim_metadata, encode_fungible_asset, encode_hybrid_asset, encode_lock_metadata,
    encode_unique_asset, peek_kind, ClaimMetadata, LockMechanism, LockMetadata, PayloadKind,
    TimeSpec,
};
pub use domain::{
    hex_opaque_data, AssetShape, CodecError, Commitment, CommitmentError, ExchangeAgreement,
    GatewayError, HashMechanism, HtlcConfig, HtlcError, LockId, LockRecord, LockState,
    ProtocolStateError, SecurePreimage, ValidationError, MAX_OPAQUE_DATA_LEN, MAX_PREIMAGE_LEN,
};
pub use ports::{LedgerGateway, SystemTimeSource, TimeSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
