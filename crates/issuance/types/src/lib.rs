//! Core value types for the receipt-issuance ledger.
//!
//! A `Fingerprint` is opaque request content, an `IssuanceKey` is a derived
//! storage slot, an `IssuanceRecord` is what the backing store persists.
//! Nothing here touches a store or a clock.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod fingerprint;
mod provider;
mod record;

pub use fingerprint::Fingerprint;
pub use provider::{ProviderTag, UnknownProviderTag};
pub use record::{IssuanceKey, IssuanceRecord, KEY_LEN};
