//! In-Memory Ledger Gateway Adapter
//!
//! Implements `LedgerGateway` against an in-process lock table.
//!
//! It plays the ledger's part faithfully enough to exercise the driver:
//! payloads are decoded with this crate's decoders, claims recompute the
//! digest under the lock's mechanism, and claim/reclaim are arbitrated by
//! lock state and expiry exactly once. It is a test double, not a ledger.

use crate::codec::{decode_agreement, decode_claim_metadata, decode_lock_metadata};
use crate::domain::{Commitment, ExchangeAgreement, GatewayError, LockId, LockRecord, LockState};
use crate::ports::outbound::{LedgerGateway, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Lock as held by the in-memory ledger.
#[derive(Clone, Debug)]
struct LedgerLock {
    agreement: ExchangeAgreement,
    commitment: Commitment,
    expiry: u64,
    locker: String,
    state: LockState,
}

/// In-memory ledger for tests and local simulations.
pub struct InMemoryLedgerGateway {
    locks: RwLock<HashMap<LockId, LedgerLock>>,
    time: Arc<dyn TimeSource>,
    offline: AtomicBool,
    submissions: AtomicUsize,
    queries: AtomicUsize,
}

impl InMemoryLedgerGateway {
    /// Ledger reading time from `time`.
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
            time,
            offline: AtomicBool::new(false),
            submissions: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Simulate the ledger becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Lock, claim and reclaim submissions received so far.
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Status queries received so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of locks ever created.
    pub fn lock_count(&self) -> usize {
        self.locks.read().len()
    }

    /// Counterparty view of a lock, built from ledger data only.
    pub fn observe(&self, lock_id: &LockId) -> Result<LockRecord, GatewayError> {
        let locks = self.locks.read();
        let lock = locks
            .get(lock_id)
            .ok_or_else(|| GatewayError::LockNotFound(lock_id.clone()))?;
        Ok(LockRecord::observed(
            lock_id.clone(),
            &lock.commitment,
            lock.expiry,
            lock.agreement.clone(),
            lock.locker.clone(),
        ))
    }

    fn enter(&self) -> Result<(), GatewayError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()
    }

    fn ensure_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("in-memory ledger offline".to_string()));
        }
        Ok(())
    }
}

fn settled_error(lock_id: &LockId, state: LockState) -> Option<GatewayError> {
    match state {
        LockState::Claimed => Some(GatewayError::AlreadyClaimed(lock_id.clone())),
        LockState::Reclaimed => Some(GatewayError::AlreadyReclaimed(lock_id.clone())),
        _ => None,
    }
}

#[async_trait]
impl LedgerGateway for InMemoryLedgerGateway {
    async fn submit_lock(
        &self,
        agreement: &[u8],
        lock_metadata: &[u8],
        locker: &str,
    ) -> Result<LockId, GatewayError> {
        self.enter()?;

        let agreement =
            decode_agreement(agreement).map_err(|e| GatewayError::Rejected(e.to_string()))?;
        let metadata =
            decode_lock_metadata(lock_metadata).map_err(|e| GatewayError::Rejected(e.to_string()))?;
        let commitment = metadata
            .commitment()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        let now = self.time.now();
        if metadata.expiry_epoch_secs <= now {
            return Err(GatewayError::Rejected(format!(
                "expiry {} is not in the future (now={})",
                metadata.expiry_epoch_secs, now
            )));
        }
        if let Some(named) = agreement.locker() {
            if named != locker {
                return Err(GatewayError::Rejected(format!(
                    "agreement locker {named} does not match sender {locker}"
                )));
            }
        }

        let lock_id = LockId::new(uuid::Uuid::new_v4().simple().to_string());
        info!(
            "[htlc] Ledger locked {} ({} digest {}) until {}",
            lock_id,
            agreement.shape(),
            commitment.short_digest(),
            metadata.expiry_epoch_secs
        );

        self.locks.write().insert(
            lock_id.clone(),
            LedgerLock {
                agreement,
                commitment,
                expiry: metadata.expiry_epoch_secs,
                locker: locker.to_string(),
                state: LockState::Locked,
            },
        );
        Ok(lock_id)
    }

    async fn submit_claim(
        &self,
        lock_id: &LockId,
        claim_metadata: &[u8],
        claimant: &str,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        debug!("[htlc] Ledger claim on {} by {}", lock_id, claimant);

        let mut locks = self.locks.write();
        let lock = locks
            .get_mut(lock_id)
            .ok_or_else(|| GatewayError::LockNotFound(lock_id.clone()))?;

        if let Some(err) = settled_error(lock_id, lock.state) {
            return Err(err);
        }
        if lock.agreement.recipient() != claimant {
            return Err(GatewayError::Unauthorized {
                lock_id: lock_id.clone(),
                caller: claimant.to_string(),
            });
        }
        if self.time.now() >= lock.expiry {
            return Err(GatewayError::Expired(lock_id.clone()));
        }

        let claim =
            decode_claim_metadata(claim_metadata).map_err(|e| GatewayError::Rejected(e.to_string()))?;
        if claim.mechanism != lock.commitment.mechanism_id() {
            return Err(GatewayError::Rejected(format!(
                "claim uses {}, lock uses {}",
                claim.mechanism,
                lock.commitment.mechanism_id()
            )));
        }
        let matches = lock
            .commitment
            .verify(claim.preimage.as_bytes())
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        if !matches {
            return Err(GatewayError::PreimageMismatch(lock_id.clone()));
        }

        lock.state = LockState::Claimed;
        Ok(())
    }

    async fn submit_reclaim(&self, lock_id: &LockId, owner: &str) -> Result<(), GatewayError> {
        self.enter()?;
        debug!("[htlc] Ledger reclaim on {} by {}", lock_id, owner);

        let mut locks = self.locks.write();
        let lock = locks
            .get_mut(lock_id)
            .ok_or_else(|| GatewayError::LockNotFound(lock_id.clone()))?;

        if let Some(err) = settled_error(lock_id, lock.state) {
            return Err(err);
        }
        if lock.locker != owner {
            return Err(GatewayError::Unauthorized {
                lock_id: lock_id.clone(),
                caller: owner.to_string(),
            });
        }
        if self.time.now() < lock.expiry {
            return Err(GatewayError::NotExpired(lock_id.clone()));
        }

        lock.state = LockState::Reclaimed;
        Ok(())
    }

    async fn query_lock_status(&self, lock_id: &LockId) -> Result<LockState, GatewayError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;

        self.locks
            .read()
            .get(lock_id)
            .map(|lock| lock.state)
            .ok_or_else(|| GatewayError::LockNotFound(lock_id.clone()))
    }
}
