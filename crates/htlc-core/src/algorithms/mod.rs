//! # Algorithms Module
//!
//! Lock lifecycle orchestration on top of the domain and codec layers.

pub mod driver;

pub use driver::HtlcDriver;
