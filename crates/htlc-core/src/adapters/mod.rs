//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for local use: an in-memory ledger and
//! a manual clock.

mod in_memory_gateway;
mod manual_time;

pub use in_memory_gateway::InMemoryLedgerGateway;
pub use manual_time::ManualTimeSource;
