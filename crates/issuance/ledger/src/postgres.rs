//! PostgreSQL adapter for the issuance store.
//!
//! Designed as the transactional source-of-truth backend. Expiry is lazy:
//! rows at or past `expires_at` are swept inside the same transaction that
//! attempts the conditional insert, and the read path filters them out, so
//! an expired slot behaves exactly like an absent one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use issuance_types::{Fingerprint, IssuanceKey, IssuanceRecord, KEY_LEN};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::store::{IssuanceStore, PutOutcome};
use crate::{StorageError, StorageResult};

/// PostgreSQL-backed issuance store adapter.
#[derive(Clone)]
pub struct PostgresIssuanceStore {
    pool: PgPool,
}

impl PostgresIssuanceStore {
    /// Connect to PostgreSQL and initialize the required schema.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        Self::connect_with_options(database_url, 10, 5).await
    }

    /// Connect with explicit pool parameters.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(map_sqlx)?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create adapter from an existing pool.
    pub async fn from_pool(pool: PgPool) -> StorageResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS issuance_records (
                key BYTEA PRIMARY KEY,
                fingerprint BYTEA NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                expires_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl IssuanceStore for PostgresIssuanceStore {
    async fn put_if_absent(&self, record: IssuanceRecord) -> StorageResult<PutOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        // Expired occupant counts as absent; sweep it before the insert so
        // the primary-key conflict only ever involves a live record.
        sqlx::query("DELETE FROM issuance_records WHERE key = $1 AND expires_at <= $2")
            .bind(record.key.as_bytes().as_slice())
            .bind(record.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO issuance_records (key, fingerprint, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(record.key.as_bytes().as_slice())
        .bind(record.fingerprint.as_bytes())
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        if inserted == 1 {
            tx.commit().await.map_err(map_sqlx)?;
            return Ok(PutOutcome::Inserted);
        }

        let row = sqlx::query(
            "SELECT fingerprint, created_at, expires_at FROM issuance_records WHERE key = $1",
        )
        .bind(record.key.as_bytes().as_slice())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        tx.commit().await.map_err(map_sqlx)?;

        Ok(PutOutcome::Exists(IssuanceRecord {
            key: record.key,
            fingerprint: Fingerprint::new(row.get::<Vec<u8>, _>("fingerprint")),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn get_if_present(
        &self,
        key: &IssuanceKey,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<IssuanceRecord>> {
        let row = sqlx::query(
            r#"
            SELECT key, fingerprint, created_at, expires_at
            FROM issuance_records
            WHERE key = $1 AND expires_at > $2
            "#,
        )
        .bind(key.as_bytes().as_slice())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(|row| {
            let key_bytes: Vec<u8> = row.get("key");
            let key_bytes: [u8; KEY_LEN] = key_bytes.try_into().map_err(|_| {
                StorageError::Serialization("stored key has wrong length".to_string())
            })?;
            Ok(IssuanceRecord {
                key: IssuanceKey::from(key_bytes),
                fingerprint: Fingerprint::new(row.get::<Vec<u8>, _>("fingerprint")),
                created_at: row.get("created_at"),
                expires_at: row.get("expires_at"),
            })
        })
        .transpose()
    }
}

fn map_sqlx(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout,
        other => StorageError::Backend(other.to_string()),
    }
}
