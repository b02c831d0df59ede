//! In-Memory Score Cache Adapter
//!
//! Process-local memoization for scored assessments and analytics snapshots.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{InputFingerprint, ScoreCache};

/// In-memory, thread-safe score cache.
///
/// Clones share the same entries.
#[derive(Debug, Clone)]
pub struct InMemoryScoreCache<V> {
    entries: Arc<RwLock<HashMap<InputFingerprint, V>>>,
}

impl<V> InMemoryScoreCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V> Default for InMemoryScoreCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

// A panic while holding the lock cannot leave a half-written entry: every
// write is a single insert or clear, so poisoned guards are recovered.
impl<V: Clone + Send + Sync> ScoreCache<V> for InMemoryScoreCache<V> {
    fn get(&self, key: &InputFingerprint) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn insert_if_absent(&self, key: InputFingerprint, value: V) -> V {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(value).clone()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::get_or_compute;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn key(s: &str) -> InputFingerprint {
        InputFingerprint::from_bytes(s.as_bytes())
    }

    #[test]
    fn first_insert_wins() {
        let cache = InMemoryScoreCache::new();
        assert_eq!(cache.insert_if_absent(key("a"), 1), 1);
        assert_eq!(cache.insert_if_absent(key("a"), 2), 1);
        assert_eq!(cache.get(&key("a")), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_or_compute_computes_once() {
        let cache = InMemoryScoreCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = get_or_compute(&cache, key("a"), || {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            });
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = InMemoryScoreCache::new();
        cache.insert_if_absent(key("a"), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn clones_share_entries() {
        let cache = InMemoryScoreCache::new();
        let other = cache.clone();
        cache.insert_if_absent(key("a"), "x".to_string());
        assert_eq!(other.get(&key("a")).as_deref(), Some("x"));
    }

    #[test]
    fn concurrent_misses_agree_on_one_value() {
        let cache = InMemoryScoreCache::new();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    get_or_compute(&cache, key("shared"), || i)
                })
            })
            .collect();

        let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.get(&key("shared")), Some(results[0]));
    }
}
