//! Temporary matrices for the recursion.
//!
//! Every temporary used by a schedule is obtained through a [`ScratchAlloc`]
//! and held in a [`Temp`] guard. The guard returns its storage when it is
//! dropped, so temporaries are released on normal return, on `?` early
//! return and while unwinding alike.

use std::ops::{Deref, DerefMut};

use zmat_memory::{AtomicScratchStats, CellPool, PoolStats, ScratchStats};

use crate::matrix::Matrix;
use crate::multiplier::MatError;

/// Source of zero-filled temporary matrices.
pub trait ScratchAlloc: Send + Sync {
    /// Get a zero-filled `rows x cols` matrix.
    fn acquire(&self, rows: usize, cols: usize) -> Result<Matrix, MatError>;

    /// Take back a matrix previously handed out by `acquire`.
    fn release(&self, m: Matrix);

    fn name(&self) -> &'static str;
}

/// Owns a temporary for the lifetime of one recursion frame.
pub struct Temp<'s> {
    mat: Matrix,
    alloc: &'s dyn ScratchAlloc,
}

impl<'s> Temp<'s> {
    /// Acquire a `rows x cols` temporary from `alloc`.
    pub fn acquire(alloc: &'s dyn ScratchAlloc, rows: usize, cols: usize) -> Result<Self, MatError> {
        let mat = alloc.acquire(rows, cols)?;
        Ok(Self { mat, alloc })
    }
}

impl Deref for Temp<'_> {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.mat
    }
}

impl DerefMut for Temp<'_> {
    fn deref_mut(&mut self) -> &mut Matrix {
        &mut self.mat
    }
}

impl Drop for Temp<'_> {
    fn drop(&mut self) {
        self.alloc.release(std::mem::take(&mut self.mat));
    }
}

/// Allocates every temporary fresh from the heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapScratch;

impl ScratchAlloc for HeapScratch {
    fn acquire(&self, rows: usize, cols: usize) -> Result<Matrix, MatError> {
        Matrix::try_zeros(rows, cols)
    }

    fn release(&self, m: Matrix) {
        drop(m);
    }

    fn name(&self) -> &'static str {
        "heap"
    }
}

/// Reuses cell buffers across temporaries via a [`CellPool`].
#[derive(Default)]
pub struct PooledScratch {
    pool: CellPool,
}

impl PooledScratch {
    #[must_use]
    pub fn new(pool: CellPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl ScratchAlloc for PooledScratch {
    fn acquire(&self, rows: usize, cols: usize) -> Result<Matrix, MatError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(MatError::Allocation { rows, cols })?;
        let cells = self
            .pool
            .acquire(len)
            .map_err(|_| MatError::Allocation { rows, cols })?;
        Matrix::from_cells(rows, cols, cells)
    }

    fn release(&self, m: Matrix) {
        self.pool.release(m.into_cells());
    }

    fn name(&self) -> &'static str {
        "pooled"
    }
}

/// Wraps another allocator and counts the traffic through it.
pub struct CountingScratch<S> {
    inner: S,
    stats: AtomicScratchStats,
}

impl<S: ScratchAlloc> CountingScratch<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: AtomicScratchStats::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> ScratchStats {
        self.stats.snapshot()
    }

    pub fn reset(&self) {
        self.stats.reset();
    }
}

impl<S: ScratchAlloc> ScratchAlloc for CountingScratch<S> {
    fn acquire(&self, rows: usize, cols: usize) -> Result<Matrix, MatError> {
        match self.inner.acquire(rows, cols) {
            Ok(m) => {
                self.stats
                    .record_acquire(u64::try_from(m.len()).unwrap_or(u64::MAX));
                Ok(m)
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    fn release(&self, m: Matrix) {
        self.stats.record_release();
        self.inner.release(m);
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
