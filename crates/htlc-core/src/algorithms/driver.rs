//! # HTLC Protocol Driver
//!
//! Runs one lock through its lifecycle against a `LedgerGateway`:
//!
//! ```text
//! Initiated ──lock──► Locked ──claim───► Claimed
//!     │                  └─────reclaim──► Reclaimed
//!     └──(any failure)──► Failed
//! ```
//!
//! All local preconditions are checked before the gateway is touched. The
//! ledger stays the arbiter of claim/reclaim races; when it reports that a
//! lock is already settled, the record is synced to the ledger's state and
//! the gateway error is handed back unchanged.

use crate::codec::{encode_agreement, encode_claim_metadata, encode_lock_metadata};
use crate::domain::{
    invariant_digest_ready, invariant_expiry_in_future, invariant_locker_matches,
    invariant_recipient_present, Commitment, GatewayError, HtlcConfig, HtlcError, LockId,
    LockRecord, LockState, ProtocolStateError, ValidationError,
};
use crate::ports::outbound::{LedgerGateway, SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives lock records through lock / claim / reclaim.
///
/// Holds no per-lock state; the gateway is passed to every call.
pub struct HtlcDriver {
    time: Arc<dyn TimeSource>,
    config: HtlcConfig,
}

impl HtlcDriver {
    /// Driver on the system clock.
    pub fn new(config: HtlcConfig) -> Result<Self, HtlcError> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Driver on a caller-supplied clock. Refuses an invalid `config`.
    pub fn with_time_source(
        config: HtlcConfig,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, HtlcError> {
        config.validate()?;
        Ok(Self { time, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &HtlcConfig {
        &self.config
    }

    /// Current time from the driver's clock.
    pub fn now(&self) -> u64 {
        self.time.now()
    }

    /// Fresh secret using the configured mechanism and preimage length.
    pub fn new_commitment(&self) -> Result<Commitment, HtlcError> {
        Ok(Commitment::generate(
            self.config.default_mechanism,
            self.config.preimage_len,
        )?)
    }

    /// Expiry `secs` from now.
    pub fn expiry_after(&self, secs: u64) -> u64 {
        self.now().saturating_add(secs)
    }

    /// Submit a lock for an `Initiated` record.
    ///
    /// On success the record holds the ledger's lock id and is `Locked`.
    /// Any failure, local or remote, leaves it `Failed`.
    pub async fn lock(
        &self,
        gateway: &dyn LedgerGateway,
        record: &mut LockRecord,
    ) -> Result<LockId, HtlcError> {
        require_state(record, LockState::Initiated, LockState::Locked)?;

        let (agreement, lock_info) = match self.prepare_lock(record) {
            Ok(payloads) => payloads,
            Err(e) => {
                warn!("[htlc] Lock rejected locally: {}", e);
                record.transition_to(LockState::Failed)?;
                return Err(e);
            }
        };

        let submitted = gateway
            .submit_lock(&agreement, &lock_info, record.locker())
            .await;
        match submitted {
            Ok(lock_id) => {
                record.assign_lock_id(lock_id.clone())?;
                record.transition_to(LockState::Locked)?;
                info!(
                    "[htlc] Locked {} (digest {}, expiry {})",
                    lock_id,
                    record.commitment().short_digest(),
                    record.expiry()
                );
                Ok(lock_id)
            }
            Err(e) => {
                warn!("[htlc] Lock submission failed: {}", e);
                record.transition_to(LockState::Failed)?;
                Err(e.into())
            }
        }
    }

    fn prepare_lock(&self, record: &LockRecord) -> Result<(Vec<u8>, Vec<u8>), HtlcError> {
        let agreement = record.agreement();
        invariant_recipient_present(agreement)?;
        agreement.validate()?;
        invariant_locker_matches(agreement, record.locker())?;
        invariant_expiry_in_future(
            record.expiry(),
            self.now(),
            self.config.min_lock_duration_secs,
        )?;
        invariant_digest_ready(record.commitment())?;

        Ok((
            encode_agreement(agreement)?,
            encode_lock_metadata(record.commitment(), record.expiry())?,
        ))
    }

    /// Claim a `Locked` record by revealing `secret`'s preimage.
    ///
    /// Refused locally once `now + claim_safety_margin_secs` reaches the
    /// expiry. Whether the preimage matches is for the ledger to decide.
    pub async fn claim(
        &self,
        gateway: &dyn LedgerGateway,
        record: &mut LockRecord,
        secret: &Commitment,
        claimant: &str,
    ) -> Result<(), HtlcError> {
        require_state(record, LockState::Locked, LockState::Claimed)?;
        let lock_id = record.require_lock_id()?.clone();

        let now = self.now();
        if !record.claim_window_open(now, self.config.claim_safety_margin_secs) {
            warn!(
                "[htlc] Claim window closed for {} (now {}, expiry {})",
                lock_id,
                now,
                record.expiry()
            );
            return Err(ProtocolStateError::ClaimWindowExpired {
                lock_id,
                expiry: record.expiry(),
                now,
            }
            .into());
        }

        let expected = record.commitment().mechanism_id();
        if secret.mechanism_id() != expected {
            return Err(ValidationError::MechanismMismatch {
                expected,
                got: secret.mechanism_id(),
            }
            .into());
        }

        let claim_info = encode_claim_metadata(secret)?;
        match gateway.submit_claim(&lock_id, &claim_info, claimant).await {
            Ok(()) => {
                record.transition_to(LockState::Claimed)?;
                info!("[htlc] Claimed {} as {}", lock_id, claimant);
                Ok(())
            }
            Err(e) => {
                warn!("[htlc] Claim on {} failed: {}", lock_id, e);
                sync_settled(record, &e)?;
                Err(e.into())
            }
        }
    }

    /// Return an expired `Locked` record to `owner`.
    ///
    /// Expiry is checked locally first. The ledger is then queried right
    /// before submitting; a lock it already reports as claimed yields
    /// `GatewayError::AlreadyClaimed` without a reclaim submission.
    pub async fn reclaim(
        &self,
        gateway: &dyn LedgerGateway,
        record: &mut LockRecord,
        owner: &str,
    ) -> Result<(), HtlcError> {
        require_state(record, LockState::Locked, LockState::Reclaimed)?;
        let lock_id = record.require_lock_id()?.clone();

        let now = self.now();
        if !record.is_expired(now) {
            warn!(
                "[htlc] Reclaim of {} before expiry (now {}, expiry {})",
                lock_id,
                now,
                record.expiry()
            );
            return Err(ProtocolStateError::ReclaimBeforeExpiry {
                lock_id,
                expiry: record.expiry(),
                now,
            }
            .into());
        }

        match gateway.query_lock_status(&lock_id).await? {
            LockState::Locked => {}
            LockState::Claimed => {
                info!("[htlc] {} already claimed by counterparty; nothing to reclaim", lock_id);
                record.transition_to(LockState::Claimed)?;
                return Err(GatewayError::AlreadyClaimed(lock_id).into());
            }
            LockState::Reclaimed => {
                info!("[htlc] {} already reclaimed", lock_id);
                record.transition_to(LockState::Reclaimed)?;
                return Err(GatewayError::AlreadyReclaimed(lock_id).into());
            }
            other => {
                return Err(GatewayError::Rejected(format!(
                    "ledger reports {lock_id} as {other:?}"
                ))
                .into());
            }
        }

        match gateway.submit_reclaim(&lock_id, owner).await {
            Ok(()) => {
                record.transition_to(LockState::Reclaimed)?;
                info!("[htlc] Reclaimed {} for {}", lock_id, owner);
                Ok(())
            }
            Err(e) => {
                warn!("[htlc] Reclaim of {} failed: {}", lock_id, e);
                sync_settled(record, &e)?;
                Err(e.into())
            }
        }
    }

    /// Ledger state of `lock_id`. Never cached.
    pub async fn status(
        &self,
        gateway: &dyn LedgerGateway,
        lock_id: &LockId,
    ) -> Result<LockState, HtlcError> {
        let state = gateway.query_lock_status(lock_id).await?;
        debug!("[htlc] Status of {}: {:?}", lock_id, state);
        Ok(state)
    }

    /// Whether the ledger still holds `lock_id` as `Locked`.
    pub async fn is_locked(
        &self,
        gateway: &dyn LedgerGateway,
        lock_id: &LockId,
    ) -> Result<bool, HtlcError> {
        Ok(self.status(gateway, lock_id).await? == LockState::Locked)
    }

    /// Bring a record in line with the ledger and return its new state.
    ///
    /// Terminal records are returned as they are.
    pub async fn refresh(
        &self,
        gateway: &dyn LedgerGateway,
        record: &mut LockRecord,
    ) -> Result<LockState, HtlcError> {
        if record.state().is_terminal() {
            return Ok(record.state());
        }
        let lock_id = record.require_lock_id()?.clone();
        let ledger = self.status(gateway, &lock_id).await?;
        if ledger != record.state() {
            record.transition_to(ledger)?;
            debug!("[htlc] Record {} refreshed to {:?}", lock_id, ledger);
        }
        Ok(record.state())
    }
}

fn require_state(
    record: &LockRecord,
    required: LockState,
    target: LockState,
) -> Result<(), ProtocolStateError> {
    let current = record.state();
    if current == required {
        return Ok(());
    }
    if current.is_terminal() {
        return Err(ProtocolStateError::TerminalState(current));
    }
    Err(ProtocolStateError::InvalidTransition {
        from: current,
        to: target,
    })
}

fn sync_settled(record: &mut LockRecord, err: &GatewayError) -> Result<(), ProtocolStateError> {
    match err {
        GatewayError::AlreadyClaimed(_) => record.transition_to(LockState::Claimed),
        GatewayError::AlreadyReclaimed(_) => record.transition_to(LockState::Reclaimed),
        _ => Ok(()),
    }
}
