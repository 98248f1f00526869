//! # Integration Test Flows
//!
//! Two parties exchanging an asset through one in-memory ledger:
//!
//! 1. **Happy path**: Alice locks, Bob claims with the revealed preimage,
//!    Alice's reclaim after expiry reports the lock as already claimed.
//! 2. **Timeout path**: Alice locks with a short expiry, nobody claims,
//!    Alice reclaims; a late claim is refused.
//! 3. **Local rejection**: bad expiry and early reclaim never reach the ledger.
//! 4. **Transient failure**: an offline ledger yields a retryable error.

#[cfg(test)]
mod tests {
    use crate::init_test_tracing;
    use htlc_core::{
        encode_claim_metadata, ExchangeAgreement, GatewayError, HashMechanism, HtlcConfig,
        HtlcDriver, HtlcError, InMemoryLedgerGateway, LedgerGateway, LockRecord, LockState,
        ManualTimeSource, ProtocolStateError, ValidationError,
    };
    use std::sync::Arc;
    use tokio_test::assert_ok;

    const START: u64 = 1_700_000_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// One ledger, one clock, one driver per party.
    struct Exchange {
        clock: Arc<ManualTimeSource>,
        ledger: InMemoryLedgerGateway,
        alice: HtlcDriver,
        bob: HtlcDriver,
    }

    impl Exchange {
        fn new() -> Self {
            init_test_tracing();
            let clock = Arc::new(ManualTimeSource::new(START));
            Self {
                ledger: InMemoryLedgerGateway::new(clock.clone()),
                alice: HtlcDriver::with_time_source(HtlcConfig::default(), clock.clone()).unwrap(),
                bob: HtlcDriver::with_time_source(HtlcConfig::default(), clock.clone()).unwrap(),
                clock,
            }
        }
    }

    fn bond_agreement() -> ExchangeAgreement {
        ExchangeAgreement::unique("bond", "b-0042", "bob", "alice")
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_claim_then_reclaim_reports_already_claimed() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let expiry = ex.alice.expiry_after(30);
        let mut alice_record = LockRecord::new(bond_agreement(), &secret, expiry, "alice");
        let lock_id = ex.alice.lock(&ex.ledger, &mut alice_record).await?;
        assert_eq!(alice_record.state(), LockState::Locked);

        // Bob only sees ledger data; Alice hands him the preimage off-band.
        let mut bob_record = ex.ledger.observe(&lock_id)?;
        assert!(ex.bob.is_locked(&ex.ledger, &lock_id).await?);
        ex.bob
            .claim(&ex.ledger, &mut bob_record, &secret, "bob")
            .await?;
        assert_eq!(bob_record.state(), LockState::Claimed);
        assert_eq!(ex.bob.status(&ex.ledger, &lock_id).await?, LockState::Claimed);

        ex.clock.advance(30);
        let submissions = ex.ledger.submission_count();
        let err = ex
            .alice
            .reclaim(&ex.ledger, &mut alice_record, "alice")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HtlcError::Gateway(GatewayError::AlreadyClaimed(_))
        ));
        assert!(err.as_gateway().is_some_and(GatewayError::is_settled));
        assert_eq!(alice_record.state(), LockState::Claimed);
        // Status check short-circuits the reclaim submission.
        assert_eq!(ex.ledger.submission_count(), submissions);
        Ok(())
    }

    #[tokio::test]
    async fn test_expire_then_reclaim() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let expiry = ex.alice.expiry_after(2);
        let mut alice_record = LockRecord::new(bond_agreement(), &secret, expiry, "alice");
        let lock_id = ex.alice.lock(&ex.ledger, &mut alice_record).await?;

        ex.clock.advance(3);
        ex.alice
            .reclaim(&ex.ledger, &mut alice_record, "alice")
            .await?;
        assert_eq!(alice_record.state(), LockState::Reclaimed);
        assert_eq!(ex.alice.status(&ex.ledger, &lock_id).await?, LockState::Reclaimed);

        // Driver refuses locally: the claim window is closed.
        let mut bob_record = ex.ledger.observe(&lock_id)?;
        let err = ex
            .bob
            .claim(&ex.ledger, &mut bob_record, &secret, "bob")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HtlcError::ProtocolState(ProtocolStateError::ClaimWindowExpired { .. })
        ));

        // Ledger refuses too.
        let claim = encode_claim_metadata(&secret)?;
        let raw = ex.ledger.submit_claim(&lock_id, &claim, "bob").await;
        assert!(matches!(raw, Err(GatewayError::AlreadyReclaimed(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_past_expiry_rejected_without_submission() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let mut record = LockRecord::new(bond_agreement(), &secret, START - 10, "alice");
        let err = ex.alice.lock(&ex.ledger, &mut record).await.unwrap_err();

        assert!(matches!(
            err,
            HtlcError::Validation(ValidationError::ExpiryNotInFuture { .. })
        ));
        assert!(err.is_local());
        assert_eq!(record.state(), LockState::Failed);
        assert_eq!(ex.ledger.submission_count(), 0);
        assert_eq!(ex.ledger.lock_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_early_reclaim_rejected_without_touching_ledger() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let mut record =
            LockRecord::new(bond_agreement(), &secret, ex.alice.expiry_after(30), "alice");
        ex.alice.lock(&ex.ledger, &mut record).await?;

        // Offline ledger: only a local check can answer.
        ex.ledger.set_offline(true);
        let submissions = ex.ledger.submission_count();
        let err = ex
            .alice
            .reclaim(&ex.ledger, &mut record, "alice")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HtlcError::ProtocolState(ProtocolStateError::ReclaimBeforeExpiry { .. })
        ));
        assert!(err.is_local());
        assert!(!err.is_retryable());
        assert_eq!(record.state(), LockState::Locked);
        assert_eq!(ex.ledger.query_count(), 0);
        assert_eq!(ex.ledger.submission_count(), submissions);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_recipient_rejected_without_submission() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let agreement = ExchangeAgreement::fungible("TOKEN", 5, "alice", "");
        let mut record =
            LockRecord::new(agreement, &secret, ex.alice.expiry_after(30), "alice");
        let err = ex.alice.lock(&ex.ledger, &mut record).await.unwrap_err();

        assert!(matches!(
            err,
            HtlcError::Validation(ValidationError::MissingRecipient)
        ));
        assert_eq!(ex.ledger.submission_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_is_idempotent() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let mut record =
            LockRecord::new(bond_agreement(), &secret, ex.alice.expiry_after(30), "alice");
        let lock_id = ex.alice.lock(&ex.ledger, &mut record).await?;

        let submissions = ex.ledger.submission_count();
        for _ in 0..3 {
            assert_eq!(ex.alice.status(&ex.ledger, &lock_id).await?, LockState::Locked);
        }
        assert_eq!(ex.ledger.submission_count(), submissions);
        assert_eq!(ex.ledger.query_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_offline_ledger_is_retryable() -> anyhow::Result<()> {
        let ex = Exchange::new();
        ex.ledger.set_offline(true);

        let secret = ex.alice.new_commitment()?;
        let mut record =
            LockRecord::new(bond_agreement(), &secret, ex.alice.expiry_after(30), "alice");
        let err = ex.alice.lock(&ex.ledger, &mut record).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(!err.is_local());
        assert_eq!(record.state(), LockState::Failed);

        // A fresh attempt succeeds once the ledger is back.
        ex.ledger.set_offline(false);
        let mut retry =
            LockRecord::new(bond_agreement(), &secret, ex.alice.expiry_after(30), "alice");
        assert_ok!(ex.alice.lock(&ex.ledger, &mut retry).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_hybrid_lock_with_sha512() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = htlc_core::Commitment::generate(HashMechanism::Sha512, 48)?;
        let agreement = ExchangeAgreement::hybrid(
            "bond",
            "b-7",
            htlc_core::hex_opaque_data("0xdeadbeef")?,
            250,
            "bob",
        );
        let mut record =
            LockRecord::new(agreement, &secret, ex.alice.expiry_after(60), "alice");
        let lock_id = ex.alice.lock(&ex.ledger, &mut record).await?;

        let mut bob_record = ex.ledger.observe(&lock_id)?;
        assert_eq!(bob_record.commitment().mechanism_id(), HashMechanism::Sha512);
        ex.bob
            .claim(&ex.ledger, &mut bob_record, &secret, "bob")
            .await?;
        assert_eq!(bob_record.state(), LockState::Claimed);
        Ok(())
    }

    #[tokio::test]
    async fn test_stranger_cannot_claim() -> anyhow::Result<()> {
        let ex = Exchange::new();

        let secret = ex.alice.new_commitment()?;
        let mut record =
            LockRecord::new(bond_agreement(), &secret, ex.alice.expiry_after(30), "alice");
        let lock_id = ex.alice.lock(&ex.ledger, &mut record).await?;

        let mut view = ex.ledger.observe(&lock_id)?;
        let err = ex
            .bob
            .claim(&ex.ledger, &mut view, &secret, "mallory")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HtlcError::Gateway(GatewayError::Unauthorized { .. })
        ));
        assert_eq!(view.state(), LockState::Locked);
        Ok(())
    }
}
