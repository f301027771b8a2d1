use async_trait::async_trait;
use chrono::{DateTime, Utc};
use issuance_types::{IssuanceKey, IssuanceRecord};

use crate::StorageResult;

/// Outcome of a conditional put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The slot was absent and the record is now stored.
    Inserted,
    /// A live record already occupies the slot; carried back so the caller
    /// can reconcile in a single round trip.
    Exists(IssuanceRecord),
}

/// Storage interface for issuance slots.
///
/// The store is the only mutual-exclusion primitive in the system:
/// concurrent `put_if_absent` calls against the same key must serialize so
/// that exactly one inserts. An existing record whose `expires_at` is at or
/// before the observation instant counts as absent and may be replaced.
#[async_trait]
pub trait IssuanceStore: Send + Sync {
    /// Atomically insert `record` if its slot holds no live record.
    ///
    /// `record.created_at` is the observation instant used to judge expiry
    /// of any prior occupant.
    async fn put_if_absent(&self, record: IssuanceRecord) -> StorageResult<PutOutcome>;

    /// Read the live record for `key`, if any. Expired records read as
    /// absent. Retained for diagnostics and tests; the ledger's hot path
    /// reconciles through [`IssuanceStore::put_if_absent`] alone.
    async fn get_if_present(
        &self,
        key: &IssuanceKey,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<IssuanceRecord>>;
}
