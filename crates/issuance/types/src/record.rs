use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Fingerprint, ProviderTag};

/// Length of a derived issuance key in bytes.
pub const KEY_LEN: usize = 32;

/// Derived composite key identifying one issuance slot.
///
/// One key per `(item_id, provider_tag)` pair under a given seed. The seed
/// keeps raw item identifiers out of the store; it is an opaque transform,
/// not a security boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuanceKey([u8; KEY_LEN]);

impl IssuanceKey {
    /// Derive the storage key for `(item_id, provider)`.
    ///
    /// Domain-separated from [`Fingerprint::seal`] by the leading context
    /// byte, so a key can never collide with a sealed fingerprint.
    pub fn derive(seed: &[u8; 32], item_id: &str, provider: ProviderTag) -> Self {
        let mut input = Vec::with_capacity(2 + item_id.len());
        input.push(b'K');
        input.push(provider.wire_tag());
        input.extend_from_slice(item_id.as_bytes());
        Self(*blake3::keyed_hash(seed, &input).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for IssuanceKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for IssuanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(6).map(|b| format!("{b:02x}")).collect();
        write!(f, "IssuanceKey({prefix}..)")
    }
}

/// Persistent issuance record.
///
/// Immutable once written; the store removes it only through expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub key: IssuanceKey,
    pub fingerprint: Fingerprint,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuanceRecord {
    /// Build a record expiring `retention` after `created_at`.
    pub fn new(
        key: IssuanceKey,
        fingerprint: Fingerprint,
        created_at: DateTime<Utc>,
        retention: Duration,
    ) -> Self {
        Self {
            key,
            fingerprint,
            created_at,
            expires_at: created_at + retention,
        }
    }

    /// True once the record should read as absent.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record_at(created_at: DateTime<Utc>) -> IssuanceRecord {
        IssuanceRecord::new(
            IssuanceKey::derive(&[0u8; 32], "item-1", ProviderTag::Stripe),
            Fingerprint::new(vec![1, 2, 3]),
            created_at,
            Duration::days(90),
        )
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let created = Utc::now();
        let record = record_at(created);
        assert!(!record.is_expired(created));
        assert!(!record.is_expired(record.expires_at - Duration::seconds(1)));
        assert!(record.is_expired(record.expires_at));
        assert!(record.is_expired(record.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn derive_is_deterministic() {
        let seed = [3u8; 32];
        assert_eq!(
            IssuanceKey::derive(&seed, "item-1", ProviderTag::Stripe),
            IssuanceKey::derive(&seed, "item-1", ProviderTag::Stripe)
        );
    }

    #[test]
    fn derive_separates_providers() {
        let seed = [3u8; 32];
        assert_ne!(
            IssuanceKey::derive(&seed, "item-1", ProviderTag::Stripe),
            IssuanceKey::derive(&seed, "item-1", ProviderTag::Braintree)
        );
    }

    proptest! {
        #[test]
        fn distinct_slots_derive_distinct_keys(
            item_a in "[a-z0-9-]{1,24}",
            item_b in "[a-z0-9-]{1,24}",
            tag_a in 0usize..4,
            tag_b in 0usize..4,
        ) {
            let seed = [11u8; 32];
            let a = IssuanceKey::derive(&seed, &item_a, ProviderTag::ALL[tag_a]);
            let b = IssuanceKey::derive(&seed, &item_b, ProviderTag::ALL[tag_b]);
            if item_a == item_b && tag_a == tag_b {
                prop_assert_eq!(a, b);
            } else {
                prop_assert_ne!(a, b);
            }
        }
    }
}
