use serde::{Deserialize, Serialize};

/// Opaque request fingerprint.
///
/// The ledger never interprets the contents; it only compares fingerprints
/// for equality. Callers derive it from the serialized request payload.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Seeded keyed-hash transform applied before storage.
    ///
    /// Preserves equality while keeping raw request bytes out of the store.
    /// Domain-separated from key derivation by the leading context byte.
    pub fn seal(&self, seed: &[u8; 32]) -> Fingerprint {
        let mut input = Vec::with_capacity(1 + self.0.len());
        input.push(b'F');
        input.extend_from_slice(&self.0);
        Fingerprint(blake3::keyed_hash(seed, &input).as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Fingerprint {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Fingerprint {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

// Request payloads may carry caller data; Debug shows only a short prefix.
impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "Fingerprint({} bytes, {prefix}..)", self.0.len())
    }
}
