//! Idempotent issuance ledger.
//!
//! This crate records "issuance happened for this item+provider with this
//! exact request" exactly once per slot:
//! - the first write for a slot wins,
//! - replaying the identical request is a silent no-op,
//! - a different request for a live slot is a [`IssuanceError::Conflict`].
//!
//! Design stance:
//! - All mutual exclusion is delegated to the store's conditional put;
//!   the ledger holds no mutable state and performs no locking.
//! - No internal retries and no wall-clock reads; callers pass `now` and
//!   own the retry policy.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod config;
mod error;
mod ledger;
pub mod memory;
mod observe;
#[cfg(feature = "postgres")]
pub mod postgres;
mod store;

pub use config::{InvalidRetention, LedgerConfig, DEFAULT_RETENTION_DAYS};
pub use error::{IssuanceError, LedgerResult, StorageError, StorageResult};
pub use ledger::IssuanceLedger;
pub use observe::{IssuanceObserver, IssuanceOutcome, NoopObserver, TracingObserver};
pub use store::{IssuanceStore, PutOutcome};
