//! In-memory reference implementation of the issuance store.
//!
//! This adapter is deterministic and test-friendly. Production deployments
//! should use a transactional backend (e.g. PostgreSQL) for source-of-truth
//! records; expiry here is lazy, judged against the caller-supplied instant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use issuance_types::{IssuanceKey, IssuanceRecord};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::store::{IssuanceStore, PutOutcome};
use crate::{StorageError, StorageResult};

/// In-memory issuance store adapter.
#[derive(Default)]
pub struct InMemoryIssuanceStore {
    records: RwLock<HashMap<IssuanceKey, IssuanceRecord>>,
}

impl InMemoryIssuanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, live or expired.
    pub fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IssuanceStore for InMemoryIssuanceStore {
    async fn put_if_absent(&self, record: IssuanceRecord) -> StorageResult<PutOutcome> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StorageError::Backend("records lock poisoned".to_string()))?;

        if let Some(existing) = guard.get(&record.key) {
            if !existing.is_expired(record.created_at) {
                return Ok(PutOutcome::Exists(existing.clone()));
            }
        }

        guard.insert(record.key, record);
        Ok(PutOutcome::Inserted)
    }

    async fn get_if_present(
        &self,
        key: &IssuanceKey,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<IssuanceRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StorageError::Backend("records lock poisoned".to_string()))?;
        Ok(guard
            .get(key)
            .filter(|record| !record.is_expired(now))
            .cloned())
    }
}
