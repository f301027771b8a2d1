use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issuance context for a recorded receipt.
///
/// The tag participates in key derivation, so each variant carries a stable
/// one-byte wire tag that must never be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    Stripe,
    Braintree,
    GooglePlayBilling,
    AppleAppStore,
}

/// Error for an unrecognized provider wire tag.
#[derive(Debug, Error)]
#[error("unknown provider tag: {0}")]
pub struct UnknownProviderTag(pub u8);

impl ProviderTag {
    /// All providers, in wire-tag order.
    pub const ALL: [ProviderTag; 4] = [
        ProviderTag::Stripe,
        ProviderTag::Braintree,
        ProviderTag::GooglePlayBilling,
        ProviderTag::AppleAppStore,
    ];

    /// Stable one-byte tag used in key derivation and storage.
    pub fn wire_tag(self) -> u8 {
        match self {
            ProviderTag::Stripe => 1,
            ProviderTag::Braintree => 2,
            ProviderTag::GooglePlayBilling => 3,
            ProviderTag::AppleAppStore => 4,
        }
    }

    /// Inverse of [`ProviderTag::wire_tag`].
    pub fn from_wire_tag(tag: u8) -> Result<Self, UnknownProviderTag> {
        match tag {
            1 => Ok(ProviderTag::Stripe),
            2 => Ok(ProviderTag::Braintree),
            3 => Ok(ProviderTag::GooglePlayBilling),
            4 => Ok(ProviderTag::AppleAppStore),
            other => Err(UnknownProviderTag(other)),
        }
    }

    /// Lowercase label for logs and observer tags.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderTag::Stripe => "stripe",
            ProviderTag::Braintree => "braintree",
            ProviderTag::GooglePlayBilling => "google_play_billing",
            ProviderTag::AppleAppStore => "apple_app_store",
        }
    }
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_round_trip() {
        for provider in ProviderTag::ALL {
            assert_eq!(
                ProviderTag::from_wire_tag(provider.wire_tag()).unwrap(),
                provider
            );
        }
    }

    #[test]
    fn wire_tags_are_distinct() {
        let mut tags: Vec<u8> = ProviderTag::ALL.iter().map(|p| p.wire_tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ProviderTag::ALL.len());
    }

    #[test]
    fn unknown_wire_tag_is_rejected() {
        assert!(ProviderTag::from_wire_tag(0).is_err());
        assert!(ProviderTag::from_wire_tag(99).is_err());
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&ProviderTag::GooglePlayBilling).unwrap();
        assert_eq!(json, "\"google_play_billing\"");
        let back: ProviderTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProviderTag::GooglePlayBilling);
    }
}
