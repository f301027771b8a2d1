use issuance_types::ProviderTag;
use thiserror::Error;

/// Result type for store-layer operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, IssuanceError>;

/// Infrastructural store failures. The ledger never retries these;
/// the caller decides whether the operation is worth repeating.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store operation timed out")]
    Timeout,

    #[error("store throttled the request")]
    Throttled,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Ledger-level errors.
///
/// `Conflict` is semantic and expected; callers surface it as a
/// "duplicate request with different content" rejection. The HTTP
/// mapping (409 or otherwise) is the caller's concern.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("item id must be non-empty")]
    InvalidItem,

    #[error("issuance already recorded with a different request for provider {provider}")]
    Conflict { provider: ProviderTag },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IssuanceError {
    /// True for failures a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IssuanceError::Storage(StorageError::Timeout | StorageError::Throttled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_not_retryable() {
        let err = IssuanceError::Conflict {
            provider: ProviderTag::Stripe,
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn transient_storage_failures_are_retryable() {
        assert!(IssuanceError::Storage(StorageError::Timeout).is_retryable());
        assert!(IssuanceError::Storage(StorageError::Throttled).is_retryable());
        assert!(!IssuanceError::Storage(StorageError::Backend("down".into())).is_retryable());
    }
}
