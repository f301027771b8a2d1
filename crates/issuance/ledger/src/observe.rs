use issuance_types::ProviderTag;
use tracing::debug;

/// Classified result of one `record_issuance` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceOutcome {
    /// First issuance for the slot.
    Recorded,
    /// Identical request replayed; no mutation.
    Replayed,
    /// A different request already occupies the slot.
    Conflict,
}

/// Injectable instrumentation hook.
///
/// The ledger notifies the observer and makes no further logging or
/// metrics decisions; implementations must not block.
pub trait IssuanceObserver: Send + Sync {
    fn on_outcome(&self, provider: ProviderTag, outcome: IssuanceOutcome);
}

/// Observer that discards all events.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl IssuanceObserver for NoopObserver {
    fn on_outcome(&self, _provider: ProviderTag, _outcome: IssuanceOutcome) {}
}

/// Observer that emits `tracing` debug events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IssuanceObserver for TracingObserver {
    fn on_outcome(&self, provider: ProviderTag, outcome: IssuanceOutcome) {
        debug!(provider = provider.as_str(), ?outcome, "issuance outcome");
    }
}
