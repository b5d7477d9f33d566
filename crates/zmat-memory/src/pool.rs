//! Cell-buffer pool with size classes for temporary-matrix reuse.

use std::collections::{HashMap, TryReserveError};

use num_bigint::BigInt;
use num_traits::Zero;
use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

/// Smallest size class, in cells.
const MIN_CLASS: usize = 16;

/// Pool of `Vec<BigInt>` cell buffers, organised by size class (power of 4).
///
/// A buffer filed under class `c` always has capacity of at least `c` cells,
/// so any request of up to `c` cells can be served from it without growing.
pub struct CellPool {
    pools: Mutex<HashMap<usize, Vec<Vec<BigInt>>>>,
    max_cells: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl CellPool {
    /// Create a new pool.
    ///
    /// Buffers larger than `max_cells` are never retained, and at most
    /// `max_per_class` buffers are kept in each class.
    #[must_use]
    pub fn new(max_cells: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_cells,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Get a zero-filled buffer of exactly `len` cells.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if a fresh buffer cannot be reserved.
    pub fn acquire(&self, len: usize) -> Result<Vec<BigInt>, TryReserveError> {
        let class = Self::class_for_len(len);
        let pooled = self.pools.lock().get_mut(&class).and_then(Vec::pop);

        let mut buf = if let Some(buf) = pooled {
            self.stats.record_hit();
            buf
        } else {
            self.stats.record_miss();
            let mut buf = Vec::new();
            buf.try_reserve_exact(class)?;
            buf
        };
        buf.resize_with(len, BigInt::zero);
        Ok(buf)
    }

    /// Return a buffer to the pool.
    pub fn release(&self, mut buf: Vec<BigInt>) {
        let capacity = buf.capacity();
        if capacity < MIN_CLASS || capacity > self.max_cells {
            self.stats.record_eviction();
            return;
        }

        buf.clear();
        let class = Self::class_for_capacity(capacity);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        if pool.len() < self.max_per_class {
            pool.push(buf);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Smallest class that can hold `len` cells.
    fn class_for_len(len: usize) -> usize {
        let mut class = MIN_CLASS;
        while class < len {
            class = class.saturating_mul(4);
        }
        class
    }

    /// Largest class not exceeding `capacity`.
    fn class_for_capacity(capacity: usize) -> usize {
        let mut class = MIN_CLASS;
        while class.saturating_mul(4) <= capacity && class < usize::MAX / 4 {
            class *= 4;
        }
        class
    }

    /// Get total number of pooled buffers.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.pools.lock().values().map(Vec::len).sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Drop every pooled buffer.
    pub fn clear(&self) {
        self.pools.lock().clear();
    }

    /// Pre-populate the class serving `len`-cell requests.
    pub fn warm(&self, len: usize, count: usize) {
        let class = Self::class_for_len(len);
        if class > self.max_cells {
            return;
        }
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        let to_add = count
            .saturating_sub(pool.len())
            .min(self.max_per_class.saturating_sub(pool.len()));
        for _ in 0..to_add {
            pool.push(Vec::with_capacity(class));
        }
    }
}

impl Default for CellPool {
    fn default() -> Self {
        Self::new(1 << 24, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn acquire_is_zero_filled() {
        let pool = CellPool::default();
        let buf = pool.acquire(10).unwrap();
        assert_eq!(buf.len(), 10);
        assert!(buf.iter().all(Zero::is_zero));
    }

    #[test]
    fn released_buffer_is_reused_and_cleared() {
        let pool = CellPool::default();
        let mut buf = pool.acquire(20).unwrap();
        buf[3] = BigInt::from(-77);
        pool.release(buf);
        assert_eq!(pool.total_pooled(), 1);

        let again = pool.acquire(30).unwrap();
        assert_eq!(again.len(), 30);
        assert!(again.iter().all(Zero::is_zero));
        let stats = pool.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn class_computation() {
        assert_eq!(CellPool::class_for_len(0), 16);
        assert_eq!(CellPool::class_for_len(16), 16);
        assert_eq!(CellPool::class_for_len(17), 64);
        assert_eq!(CellPool::class_for_len(64), 64);
        assert_eq!(CellPool::class_for_capacity(16), 16);
        assert_eq!(CellPool::class_for_capacity(63), 16);
        assert_eq!(CellPool::class_for_capacity(64), 64);
        assert_eq!(CellPool::class_for_capacity(300), 256);
    }

    #[test]
    fn oversized_buffers_are_evicted() {
        let pool = CellPool::new(64, 4);
        pool.release(Vec::with_capacity(1024));
        assert_eq!(pool.total_pooled(), 0);
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn full_class_evicts() {
        let pool = CellPool::new(1024, 1);
        pool.release(Vec::with_capacity(16));
        pool.release(Vec::with_capacity(16));
        assert_eq!(pool.total_pooled(), 1);
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn warm_respects_limits() {
        let pool = CellPool::new(1 << 20, 3);
        pool.warm(100, 2);
        assert_eq!(pool.total_pooled(), 2);
        pool.warm(100, 8);
        assert_eq!(pool.total_pooled(), 3);
        pool.clear();
        assert_eq!(pool.total_pooled(), 0);
    }

    proptest! {
        #[test]
        fn pooled_buffers_always_fit_their_class(cap in 16usize..100_000, len in 0usize..100_000) {
            let class = CellPool::class_for_capacity(cap);
            prop_assert!(class <= cap);
            prop_assert!(CellPool::class_for_len(len) >= len);
        }
    }
}
