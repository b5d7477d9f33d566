//! Atomic counters for pool and scratch-matrix usage.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cell-buffer pool usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers served from the pool.
    pub hits: u64,
    /// Buffers that had to be freshly allocated.
    pub misses: u64,
    /// Buffers dropped on release (too large or class full).
    pub evictions: u64,
}

/// Lock-free counters behind [`PoolStats`].
pub struct AtomicPoolStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    /// Increment hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment eviction counter.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AtomicPoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of temporary-matrix traffic through a scratch allocator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScratchStats {
    /// Temporaries handed out.
    pub acquired: u64,
    /// Temporaries given back.
    pub released: u64,
    /// Acquisitions that failed.
    pub failed: u64,
    /// Temporaries currently outstanding.
    pub live: u64,
    /// Highest number of temporaries outstanding at once.
    pub peak_live: u64,
    /// Total cells handed out over all acquisitions.
    pub cells: u64,
}

impl ScratchStats {
    /// True when every acquired temporary has been released.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.live == 0 && self.acquired == self.released
    }
}

/// Lock-free counters behind [`ScratchStats`].
///
/// `live` and `peak_live` are updated with acquire/release ordering so that
/// the peak observed from several rayon workers is never lower than the
/// real high-water mark.
pub struct AtomicScratchStats {
    acquired: AtomicU64,
    released: AtomicU64,
    failed: AtomicU64,
    live: AtomicU64,
    peak_live: AtomicU64,
    cells: AtomicU64,
}

impl AtomicScratchStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            live: AtomicU64::new(0),
            peak_live: AtomicU64::new(0),
            cells: AtomicU64::new(0),
        }
    }

    /// Record a successful acquisition of a temporary with `cells` cells.
    pub fn record_acquire(&self, cells: u64) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        self.cells.fetch_add(cells, Ordering::Relaxed);
        let live = self.live.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_live.fetch_max(live, Ordering::AcqRel);
    }

    /// Record the release of a temporary.
    pub fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    /// Record a failed acquisition.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> ScratchStats {
        ScratchStats {
            acquired: self.acquired.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Acquire),
            peak_live: self.peak_live.load(Ordering::Acquire),
            cells: self.cells.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    ///
    /// Only meaningful while no temporary is outstanding.
    pub fn reset(&self) {
        self.acquired.store(0, Ordering::Relaxed);
        self.released.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.live.store(0, Ordering::Release);
        self.peak_live.store(0, Ordering::Release);
        self.cells.store(0, Ordering::Relaxed);
    }
}

impl Default for AtomicScratchStats {
    fn default() -> Self {
        Self::new()
    }
}
