//! # Domain Module
//!
//! Core domain types: hash mechanisms, commitments, agreements and lock
//! records.

pub mod agreement;
pub mod commitment;
pub mod config;
pub mod errors;
pub mod invariants;
pub mod lock_record;
pub mod mechanism;
pub mod secure_preimage;

pub use agreement::{hex_opaque_data, AssetShape, ExchangeAgreement, MAX_OPAQUE_DATA_LEN};
pub use commitment::{Commitment, MAX_PREIMAGE_LEN};
pub use config::HtlcConfig;
pub use errors::*;
pub use invariants::*;
pub use lock_record::{LockId, LockRecord, LockState};
pub use mechanism::HashMechanism;
pub use secure_preimage::SecurePreimage;
