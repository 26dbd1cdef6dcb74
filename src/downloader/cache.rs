//! TTL result cache
//!
//! Keyed on the full normalized request, so two requests differing in any
//! parameter never collide. Expiry is lazy: entries are checked against
//! their TTL on lookup, not swept by a background task. Each entry keeps
//! the TTL that was current when it was stored, so changing the cache TTL
//! affects future stores only.
//!
//! Time comes from an injectable [`Clock`] so tests can step through TTL
//! boundaries without sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::{FetchOutput, TrendsRequest};

/// Monotonic time source for expiry decisions.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by the system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache observability counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that went to the network
    pub misses: u64,
    /// Entries currently stored, expired or not
    pub entry_count: usize,
}

struct CacheEntry {
    value: FetchOutput,
    stored_at: Instant,
    ttl: Duration,
}

struct CacheInner {
    map: HashMap<TrendsRequest, CacheEntry>,
    ttl: Duration,
    hits: u64,
    misses: u64,
}

/// TTL cache over completed fetch results.
pub struct ResultCache {
    inner: Mutex<CacheInner>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    /// Cache with the given TTL and the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Cache with a caller-supplied clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                ttl,
                hits: 0,
                misses: 0,
            }),
            clock,
        }
    }

    /// Look up a previously stored result.
    ///
    /// An expired entry counts as a miss and is removed. A zero TTL at
    /// store time makes every lookup of that entry a miss.
    pub fn get(&self, request: &TrendsRequest) -> Option<FetchOutput> {
        let now = self.clock.now();
        let mut guard = self.lock();
        // reborrow so map and counter accesses are disjoint field borrows
        let inner = &mut *guard;

        let expired = match inner.map.get(request) {
            Some(entry) => {
                entry.ttl.is_zero() || now.duration_since(entry.stored_at) >= entry.ttl
            }
            None => {
                inner.misses += 1;
                metrics::counter!("trend_cache_misses_total").increment(1);
                return None;
            }
        };

        if expired {
            inner.map.remove(request);
            inner.misses += 1;
            metrics::counter!("trend_cache_misses_total").increment(1);
            debug!(request = %request, "cache entry expired");
            return None;
        }

        inner.hits += 1;
        metrics::counter!("trend_cache_hits_total").increment(1);
        debug!(request = %request, "cache hit");
        inner.map.get(request).map(|entry| entry.value.clone())
    }

    /// Store a result under its request.
    ///
    /// The entry is stamped with the cache's current TTL. Storing under a
    /// zero TTL still proceeds; such entries just never produce a hit.
    pub fn set(&self, request: TrendsRequest, value: FetchOutput) {
        let now = self.clock.now();
        let mut inner = self.lock();
        let ttl = inner.ttl;
        inner.map.insert(
            request,
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    /// Drop every entry and reset the hit/miss counters to zero.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    /// Change the TTL applied to future stores. Existing entries keep the
    /// TTL they were stored with.
    pub fn set_ttl(&self, ttl: Duration) {
        self.lock().ttl = ttl;
    }

    /// The TTL currently applied to stores.
    pub fn ttl(&self) -> Duration {
        self.lock().ttl
    }

    /// Current counters. `entry_count` includes entries that have expired
    /// but not yet been looked up.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entry_count: inner.map.len(),
        }
    }

    // A poisoned lock means a panic mid-operation elsewhere; the map is
    // still structurally sound, so recover the guard rather than
    // propagating poison through every caller.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("result cache mutex was poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}
