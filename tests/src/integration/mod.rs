//! Cross-module scenarios run against the in-memory ledger.

pub mod flows;
pub mod properties;
