//! # HTLC Test Suite
//!
//! Unified test crate for end-to-end behaviour of `htlc-core`.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs       # Two-party lock / claim / reclaim scenarios
//!     └── properties.rs  # Commitment and payload encoding properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p htlc-tests
//! cargo test -p htlc-tests integration::flows::
//! ```

pub mod integration;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a debug-level subscriber once per test binary.
///
/// Later calls are no-ops, so every test may call it.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = htlc_telemetry::init_logging(&htlc_telemetry::TelemetryConfig::for_tests());
    });
}
