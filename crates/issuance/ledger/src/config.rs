use chrono::Duration;
use thiserror::Error;

/// Default record retention in days, matching the production issuance window.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Error for a non-positive retention duration.
#[derive(Debug, Error)]
#[error("retention must be positive, got {0}")]
pub struct InvalidRetention(pub Duration);

/// Ledger configuration.
///
/// The seed keys the opaque transform applied to item identifiers and
/// request fingerprints before storage. Losing or rotating it orphans
/// existing records; they then age out through expiry.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    pub retention: Duration,
    pub seed: [u8; 32],
}

impl LedgerConfig {
    pub fn new(retention: Duration, seed: [u8; 32]) -> Result<Self, InvalidRetention> {
        if retention <= Duration::zero() {
            return Err(InvalidRetention(retention));
        }
        Ok(Self { retention, seed })
    }

    /// Configuration with the default 90-day retention.
    pub fn with_default_retention(seed: [u8; 32]) -> Self {
        Self {
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
            seed,
        }
    }
}
