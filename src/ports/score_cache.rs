//! Score Cache Port - Memoization seam for derived qualification results.
//!
//! The engines never cache on their own. Callers that want memoization key
//! an implementation of this port by an `InputFingerprint` of the complete
//! input set (configuration plus answers), so any change to either produces
//! a different key.
//!
//! Implementations must be at-most-one-winner: two concurrent misses may both
//! compute, but only the first insert is kept and both callers see it.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Errors from fingerprinting cache inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreCacheError {
    #[error("Failed to serialize cache input: {0}")]
    Serialization(String),
}

/// Hex SHA-256 digest of a serialized input set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputFingerprint(String);

impl InputFingerprint {
    /// Fingerprints any serializable input.
    ///
    /// Use a tuple to cover several inputs at once, e.g. `(&config, &answers)`.
    pub fn of<T: Serialize + ?Sized>(input: &T) -> Result<Self, ScoreCacheError> {
        let bytes = serde_json::to_vec(input)
            .map_err(|e| ScoreCacheError::Serialization(e.to_string()))?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Fingerprints raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port for memoizing derived values by input fingerprint.
pub trait ScoreCache<V: Clone>: Send + Sync {
    /// Returns the cached value, if any.
    fn get(&self, key: &InputFingerprint) -> Option<V>;

    /// Inserts `value` unless the key is already present.
    ///
    /// # Returns
    /// The value now stored under `key`: `value` if this call won, otherwise
    /// the earlier winner.
    fn insert_if_absent(&self, key: InputFingerprint, value: V) -> V;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, e.g. after a configuration reload.
    fn clear(&self);
}

/// Returns the cached value for `key`, computing and inserting it on a miss.
pub fn get_or_compute<V, C, F>(cache: &C, key: InputFingerprint, compute: F) -> V
where
    V: Clone,
    C: ScoreCache<V> + ?Sized,
    F: FnOnce() -> V,
{
    if let Some(hit) = cache.get(&key) {
        tracing::trace!(key = %key, "Score cache hit");
        return hit;
    }
    tracing::trace!(key = %key, "Score cache miss");
    cache.insert_if_absent(key, compute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex_sha256() {
        let a = InputFingerprint::of(&("config", vec![1, 2, 3])).unwrap();
        let b = InputFingerprint::of(&("config", vec![1, 2, 3])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_changes_with_input() {
        let a = InputFingerprint::of(&("config", vec![1, 2, 3])).unwrap();
        let b = InputFingerprint::of(&("config", vec![1, 2, 4])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_of_empty_bytes_matches_known_digest() {
        assert_eq!(
            InputFingerprint::from_bytes(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
