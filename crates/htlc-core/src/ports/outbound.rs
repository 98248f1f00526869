//! # Outbound Ports
//!
//! What the driver needs from the outside world: a ledger to submit
//! payloads to, and a clock.

use crate::domain::{GatewayError, LockId, LockState};
use async_trait::async_trait;

/// Ledger gateway - outbound port.
///
/// Accepts encoded payloads and reports ledger state. The ledger is the
/// source of truth for claim/reclaim races; implementations must not
/// cache `query_lock_status`.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Lock an asset. Returns the ledger-assigned lock id.
    async fn submit_lock(
        &self,
        agreement: &[u8],
        lock_metadata: &[u8],
        locker: &str,
    ) -> Result<LockId, GatewayError>;

    /// Claim a lock by revealing the preimage.
    async fn submit_claim(
        &self,
        lock_id: &LockId,
        claim_metadata: &[u8],
        claimant: &str,
    ) -> Result<(), GatewayError>;

    /// Return an expired, unclaimed lock to its owner.
    async fn submit_reclaim(&self, lock_id: &LockId, owner: &str) -> Result<(), GatewayError>;

    /// Current ledger state of a lock.
    async fn query_lock_status(&self, lock_id: &LockId) -> Result<LockState, GatewayError>;
}

/// Time source for expiry checks.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
