// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Description cache
//!
//! Bounded, content-addressed store of generated descriptions.
//!
//! Entries are keyed by a hash of (column name, context payload) and evicted
//! least-recently-used. Each entry is a [`OnceCell`], so concurrent misses
//! on one key wait for a single in-flight generation instead of issuing
//! their own.

use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tokio::sync::OnceCell;
use tracing::debug;

/// Cache key of a (column, payload) pair
pub fn cache_key(column: &str, payload: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    column.hash(&mut hasher);
    payload.hash(&mut hasher);
    hasher.finish()
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served without generating
    pub hits: u64,
    /// Lookups that ran the generator
    pub misses: u64,
    /// Resident entries
    pub len: usize,
}

type Slot = Arc<OnceCell<String>>;

/// LRU cache of descriptions with single-flight generation
#[derive(Debug)]
pub struct DescriptionCache {
    entries: Mutex<LruCache<u64, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DescriptionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<u64, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Slot for `key`, inserting an empty one when absent
    fn slot(&self, key: u64) -> Slot {
        let mut entries = self.entries();
        if let Some(slot) = entries.get(&key) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        entries.put(key, Arc::clone(&slot));
        slot
    }

    /// Cached value for `key`, or the result of `generate` stored under it
    ///
    /// `generate` runs at most once per resident key, whatever the number of
    /// concurrent callers.
    pub async fn get_or_generate<F, Fut>(&self, key: u64, generate: F) -> String
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = String>,
    {
        let slot = self.slot(key);
        let generated = AtomicBool::new(false);
        let value = slot
            .get_or_init(|| {
                generated.store(true, Ordering::Relaxed);
                generate()
            })
            .await;

        if generated.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Description cache hit");
        }
        value.clone()
    }

    /// Completed value for `key`, without touching recency
    pub fn peek(&self, key: u64) -> Option<String> {
        self.entries()
            .peek(&key)
            .and_then(|slot| slot.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
        }
    }
}
