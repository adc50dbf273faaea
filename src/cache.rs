//! Transposition cache shared between searches.
//!
//! The cache is an explicit object handed to strategies by reference (usually
//! behind an `Arc`), never ambient state, so tests can use isolated caches and
//! an iterative-deepening run can share one across depths.

use crate::error::Error;
use crate::game::{Game, Score, Transposable};
use crate::strategies::SearchResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// How a cached score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Bound {
    Exact,
    /// The true value is at least the stored score.
    Lower,
    /// The true value is at most the stored score.
    Upper,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<M> {
    pub result: SearchResult<M>,
    pub bound: Bound,
}

impl<M> CacheEntry<M> {
    pub fn exact(result: SearchResult<M>) -> Self {
        CacheEntry {
            result,
            bound: Bound::Exact,
        }
    }

    pub fn depth(&self) -> usize {
        self.result.depth
    }

    pub fn score(&self) -> Score {
        self.result.score
    }
}

/// What `store` did with an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stored {
    Inserted,
    Replaced,
    /// The stored entry was deeper or more precise and was left alone.
    Kept,
    /// The stored exact entry disagreed with an equally deep exact result.
    /// The fresh result replaced it.
    Corrected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

/// The cache type for positions of `G`.
pub type Cache<G> = TranspositionCache<<G as Transposable>::Key, <G as Game>::Move>;

pub struct TranspositionCache<K, M> {
    entries: RwLock<HashMap<K, CacheEntry<M>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl<K, M> Default for TranspositionCache<K, M>
where
    K: Hash + Eq + Clone + Debug,
    M: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, M> TranspositionCache<K, M>
where
    K: Hash + Eq + Clone + Debug,
    M: Copy,
{
    pub fn new() -> Self {
        TranspositionCache {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
        }
    }

    /// Returns the entry for `key` if it was searched at least
    /// `required_depth` plies deep.
    pub fn lookup(&self, key: &K, required_depth: usize) -> Option<CacheEntry<M>> {
        let found = self
            .entries
            .read()
            .get(key)
            .filter(|e| e.depth() >= required_depth)
            .cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Stores `entry` unless it would downgrade what is already there.
    ///
    /// Shallower entries never replace deeper ones, and at equal depth a
    /// bound never replaces an exact score. The whole read-modify-write runs
    /// under one write lock.
    pub fn store(&self, key: K, entry: CacheEntry<M>) -> Stored {
        self.stores.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write();
        let outcome = match entries.get(&key) {
            None => Stored::Inserted,
            Some(old) if entry.depth() < old.depth() => Stored::Kept,
            Some(old) if entry.depth() > old.depth() => Stored::Replaced,
            Some(old) => match (old.bound, entry.bound) {
                (Bound::Exact, Bound::Exact) if old.score() != entry.score() => {
                    let err = Error::CacheInconsistency {
                        key: format!("{:?}", key),
                        stored: old.score(),
                        fresh: entry.score(),
                    };
                    warn!(depth = entry.depth(), "{}", err);
                    Stored::Corrected
                }
                (Bound::Exact, _) => Stored::Kept,
                _ => Stored::Replaced,
            },
        };
        if outcome != Stored::Kept {
            entries.insert(key, entry);
        }
        outcome
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }
}

/// Where a search records and probes solved positions.
///
/// Implemented by [`TranspositionCache`] for games with position keys, and by
/// [`NoCache`] for everything else.
pub trait PositionCache<G: Game>: Send + Sync {
    fn probe(&self, game: &G, required_depth: usize) -> Option<CacheEntry<G::Move>>;
    fn record(&self, game: &G, entry: CacheEntry<G::Move>);
}

/// Disables caching.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl<G: Game> PositionCache<G> for NoCache {
    fn probe(&self, _: &G, _: usize) -> Option<CacheEntry<G::Move>> {
        None
    }

    fn record(&self, _: &G, _: CacheEntry<G::Move>) {}
}

impl<G: Transposable> PositionCache<G> for TranspositionCache<G::Key, G::Move> {
    fn probe(&self, game: &G, required_depth: usize) -> Option<CacheEntry<G::Move>> {
        self.lookup(&game.position_key(), required_depth)
    }

    fn record(&self, game: &G, entry: CacheEntry<G::Move>) {
        self.store(game.position_key(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn entry(score: Score, depth: usize, bound: Bound) -> CacheEntry<u8> {
        CacheEntry {
            result: SearchResult {
                score,
                best_move: Some(0),
                depth,
            },
            bound,
        }
    }

    #[test]
    fn lookup_requires_sufficient_depth() {
        let cache = TranspositionCache::new();
        cache.store(1u32, entry(5, 3, Bound::Exact));
        assert!(cache.lookup(&1, 3).is_some());
        assert!(cache.lookup(&1, 2).is_some());
        assert!(cache.lookup(&1, 4).is_none());
        assert!(cache.lookup(&2, 0).is_none());
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                stores: 1
            }
        );
    }

    #[test]
    fn shallower_entries_never_replace_deeper_ones() {
        let cache = TranspositionCache::new();
        assert_eq!(cache.store(1u32, entry(5, 4, Bound::Exact)), Stored::Inserted);
        assert_eq!(cache.store(1, entry(9, 2, Bound::Exact)), Stored::Kept);
        assert_eq!(cache.lookup(&1, 0).unwrap().score(), 5);
        assert_eq!(cache.store(1, entry(7, 6, Bound::Lower)), Stored::Replaced);
        assert_eq!(cache.lookup(&1, 0).unwrap(), entry(7, 6, Bound::Lower));
    }

    #[test]
    fn bounds_never_replace_exact_scores_at_equal_depth() {
        let cache = TranspositionCache::new();
        cache.store(1u32, entry(5, 4, Bound::Exact));
        assert_eq!(cache.store(1, entry(8, 4, Bound::Lower)), Stored::Kept);
        assert_eq!(cache.lookup(&1, 4).unwrap().bound, Bound::Exact);

        cache.store(2u32, entry(5, 4, Bound::Upper));
        assert_eq!(cache.store(2, entry(3, 4, Bound::Exact)), Stored::Replaced);
        assert_eq!(cache.lookup(&2, 4).unwrap(), entry(3, 4, Bound::Exact));
    }

    #[test]
    fn inconsistent_exact_scores_prefer_the_fresh_one() {
        let cache = TranspositionCache::new();
        cache.store(1u32, entry(5, 4, Bound::Exact));
        assert_eq!(cache.store(1, entry(-5, 4, Bound::Exact)), Stored::Corrected);
        assert_eq!(cache.lookup(&1, 4).unwrap().score(), -5);
        assert_eq!(cache.store(1, entry(-5, 4, Bound::Exact)), Stored::Kept);
    }

    #[test]
    fn concurrent_writers_leave_whole_entries() {
        let cache = Arc::new(TranspositionCache::<u32, u8>::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for d in 0..100 {
                        cache.store(d % 10, entry(t, d as usize, Bound::Lower));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
        for k in 0..10 {
            let e = cache.lookup(&k, 0).unwrap();
            assert!(e.depth() >= 90);
            assert_eq!(e.result.best_move, Some(0));
        }
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TranspositionCache::new();
        cache.store(1u32, entry(5, 4, Bound::Exact));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
