//! Content digests: file etags and table fingerprints.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash256(blake3::Hash);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    Hash256(blake3::hash(bytes))
}

/// Digest of the JSON encoding of `v`. Rows encode in field order, so two
/// rows with the same fields in a different order hash differently.
pub fn hash_serde<T: Serialize>(v: &T) -> crate::Result<Hash256> {
    let bytes = serde_json::to_vec(v)?;
    Ok(hash_bytes(&bytes))
}
