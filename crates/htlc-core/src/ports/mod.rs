//! # Ports Module
//!
//! Hexagonal architecture ports (outbound dependencies of the driver).

pub mod outbound;

pub use outbound::*;
