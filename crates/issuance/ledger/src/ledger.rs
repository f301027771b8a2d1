use chrono::{DateTime, Utc};
use issuance_types::{Fingerprint, IssuanceKey, IssuanceRecord, ProviderTag};
use std::sync::Arc;

use crate::config::LedgerConfig;
use crate::error::{IssuanceError, LedgerResult};
use crate::observe::{IssuanceObserver, IssuanceOutcome, NoopObserver};
use crate::store::{IssuanceStore, PutOutcome};

/// The issuance ledger facade.
///
/// Wraps an [`IssuanceStore`] and classifies the outcome of one conditional
/// put per call. Stateless and lock-free; safe to share across tasks.
pub struct IssuanceLedger {
    store: Arc<dyn IssuanceStore>,
    config: LedgerConfig,
    observer: Arc<dyn IssuanceObserver>,
}

impl IssuanceLedger {
    /// Create a ledger over an explicit store adapter.
    pub fn new(store: Arc<dyn IssuanceStore>, config: LedgerConfig) -> Self {
        Self::with_observer(store, config, Arc::new(NoopObserver))
    }

    /// Create a ledger with an instrumentation observer.
    pub fn with_observer(
        store: Arc<dyn IssuanceStore>,
        config: LedgerConfig,
        observer: Arc<dyn IssuanceObserver>,
    ) -> Self {
        Self {
            store,
            config,
            observer,
        }
    }

    /// Access the underlying store adapter.
    pub fn store(&self) -> Arc<dyn IssuanceStore> {
        Arc::clone(&self.store)
    }

    /// Durably record that issuance happened for `(item_id, provider)` with
    /// this exact request.
    ///
    /// The first call for a slot wins. Replaying the identical request
    /// succeeds any number of times. A different request against a live
    /// slot fails with [`IssuanceError::Conflict`]; store failures
    /// propagate unretried as [`IssuanceError::Storage`].
    ///
    /// `now` is the instant used for expiry bookkeeping; the ledger never
    /// reads a wall clock.
    pub async fn record_issuance(
        &self,
        item_id: &str,
        provider: ProviderTag,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if item_id.is_empty() {
            return Err(IssuanceError::InvalidItem);
        }

        let key = IssuanceKey::derive(&self.config.seed, item_id, provider);
        let sealed = fingerprint.seal(&self.config.seed);
        let record = IssuanceRecord::new(key, sealed.clone(), now, self.config.retention);

        match self.store.put_if_absent(record).await? {
            PutOutcome::Inserted => {
                self.observer.on_outcome(provider, IssuanceOutcome::Recorded);
                Ok(())
            }
            PutOutcome::Exists(prior) if prior.fingerprint == sealed => {
                self.observer.on_outcome(provider, IssuanceOutcome::Replayed);
                Ok(())
            }
            PutOutcome::Exists(_) => {
                self.observer.on_outcome(provider, IssuanceOutcome::Conflict);
                Err(IssuanceError::Conflict { provider })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryIssuanceStore;
    use crate::StorageError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    const NOW_EPOCH_SECONDS: i64 = 1_500_000_000;

    fn ledger() -> IssuanceLedger {
        IssuanceLedger::new(
            Arc::new(InMemoryIssuanceStore::new()),
            LedgerConfig::with_default_retention([42u8; 32]),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW_EPOCH_SECONDS, 0).unwrap()
    }

    #[tokio::test]
    async fn empty_item_id_is_rejected() {
        let result = ledger()
            .record_issuance("", ProviderTag::Stripe, &Fingerprint::new(vec![1]), now())
            .await;
        assert!(matches!(result, Err(IssuanceError::InvalidItem)));
    }

    #[tokio::test]
    async fn raw_request_bytes_never_reach_the_store() {
        let store = Arc::new(InMemoryIssuanceStore::new());
        let config = LedgerConfig::with_default_retention([42u8; 32]);
        let ledger = IssuanceLedger::new(store.clone(), config);

        let fingerprint = Fingerprint::new(b"raw request payload".to_vec());
        ledger
            .record_issuance("item-1", ProviderTag::Stripe, &fingerprint, now())
            .await
            .unwrap();

        let key = IssuanceKey::derive(&config.seed, "item-1", ProviderTag::Stripe);
        let stored = store.get_if_present(&key, now()).await.unwrap().unwrap();
        assert_ne!(stored.fingerprint, fingerprint);
        assert_eq!(stored.fingerprint, fingerprint.seal(&config.seed));
    }

    #[derive(Default)]
    struct RecordingObserver {
        outcomes: Mutex<Vec<(ProviderTag, IssuanceOutcome)>>,
    }

    impl IssuanceObserver for RecordingObserver {
        fn on_outcome(&self, provider: ProviderTag, outcome: IssuanceOutcome) {
            self.outcomes.lock().unwrap().push((provider, outcome));
        }
    }

    #[tokio::test]
    async fn observer_sees_classified_outcomes() {
        let observer = Arc::new(RecordingObserver::default());
        let ledger = IssuanceLedger::with_observer(
            Arc::new(InMemoryIssuanceStore::new()),
            LedgerConfig::with_default_retention([42u8; 32]),
            observer.clone(),
        );

        let f1 = Fingerprint::new(vec![1; 20]);
        let f2 = Fingerprint::new(vec![2; 20]);
        ledger
            .record_issuance("item-1", ProviderTag::Stripe, &f1, now())
            .await
            .unwrap();
        ledger
            .record_issuance("item-1", ProviderTag::Stripe, &f1, now())
            .await
            .unwrap();
        let _ = ledger
            .record_issuance("item-1", ProviderTag::Stripe, &f2, now())
            .await;

        let outcomes = observer.outcomes.lock().unwrap().clone();
        assert_eq!(
            outcomes,
            vec![
                (ProviderTag::Stripe, IssuanceOutcome::Recorded),
                (ProviderTag::Stripe, IssuanceOutcome::Replayed),
                (ProviderTag::Stripe, IssuanceOutcome::Conflict),
            ]
        );
    }

    struct FailingStore;

    #[async_trait]
    impl IssuanceStore for FailingStore {
        async fn put_if_absent(&self, _record: IssuanceRecord) -> crate::StorageResult<PutOutcome> {
            Err(StorageError::Timeout)
        }

        async fn get_if_present(
            &self,
            _key: &IssuanceKey,
            _now: DateTime<Utc>,
        ) -> crate::StorageResult<Option<IssuanceRecord>> {
            Err(StorageError::Timeout)
        }
    }

    #[tokio::test]
    async fn store_failures_propagate_unretried() {
        let ledger = IssuanceLedger::new(
            Arc::new(FailingStore),
            LedgerConfig::with_default_retention([42u8; 32]),
        );
        let result = ledger
            .record_issuance("item-1", ProviderTag::Stripe, &Fingerprint::new(vec![1]), now())
            .await;
        assert!(matches!(
            result,
            Err(IssuanceError::Storage(StorageError::Timeout))
        ));
        assert!(result.unwrap_err().is_retryable());
    }
}
