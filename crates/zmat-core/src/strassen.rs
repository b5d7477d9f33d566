//! Strassen multiplication engine.
//!
//! Each level splits the operands into quadrants over their even-sized
//! leading blocks, lets the configured [`Schedule`] compute the even block of
//! the product with seven recursive multiplications, then completes odd
//! dimensions with the [`boundary`](crate::boundary) patches. Products at or
//! below the base-case size go to the classical kernel.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::boundary;
use crate::classical;
use crate::matrix::Matrix;
use crate::multiplier::{check_conformant, MatError, MatrixMultiplier};
use crate::options::StrassenOptions;
use crate::schedule::{Halves, Schedule, WinogradSchedule};
use crate::scratch::{HeapScratch, ScratchAlloc, Temp};
use crate::view::{MatMut, MatRef};

/// Strassen multiplier with a pluggable schedule and scratch allocator.
#[derive(Clone)]
pub struct Strassen {
    opts: StrassenOptions,
    schedule: Arc<dyn Schedule>,
    scratch: Arc<dyn ScratchAlloc>,
}

impl Strassen {
    /// Create an engine using the Winograd schedule and heap temporaries.
    #[must_use]
    pub fn new(opts: StrassenOptions) -> Self {
        Self {
            opts: opts.normalize(),
            schedule: Arc::new(WinogradSchedule),
            scratch: Arc::new(HeapScratch),
        }
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: Arc<dyn Schedule>) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_scratch(mut self, scratch: Arc<dyn ScratchAlloc>) -> Self {
        self.scratch = scratch;
        self
    }

    #[must_use]
    pub fn options(&self) -> &StrassenOptions {
        &self.opts
    }

    #[must_use]
    pub fn schedule(&self) -> &dyn Schedule {
        self.schedule.as_ref()
    }

    #[must_use]
    pub fn scratch(&self) -> &dyn ScratchAlloc {
        self.scratch.as_ref()
    }

    /// Acquire a temporary from this engine's allocator.
    pub fn temp(&self, rows: usize, cols: usize) -> Result<Temp<'_>, MatError> {
        Temp::acquire(self.scratch.as_ref(), rows, cols)
    }

    /// Number of Strassen levels an `ar x ac` by `ac x bc` product goes
    /// through before every block reaches the base case.
    #[must_use]
    pub fn depth(&self, ar: usize, ac: usize, bc: usize) -> u32 {
        let (mut ar, mut ac, mut bc) = (ar, ac, bc);
        let mut levels = 0;
        while !self.opts.is_base_case(ar, ac, bc) {
            (ar, ac, bc) = (ar / 2, ac / 2, bc / 2);
            levels += 1;
        }
        levels
    }

    /// Overwrite `c` with `a * b`. Shapes must already be conformant.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::Allocation`] if a temporary cannot be acquired.
    /// `c` is left partially written in that case.
    pub fn mul_rec(&self, mut c: MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) -> Result<(), MatError> {
        let (ar, ac, bc) = (a.rows(), a.cols(), b.cols());
        if self.opts.is_base_case(ar, ac, bc) {
            trace!(ar, ac, bc, "classical base case");
            classical::mul_into(c, a, b);
            return Ok(());
        }

        let halves = Halves::of(ar, ac, bc);
        let Halves { n, k, m } = halves;
        trace!(ar, ac, bc, schedule = self.schedule.name(), "strassen level");
        self.schedule.combine(
            self,
            c.submatrix_mut(0, 0, 2 * n, 2 * m),
            a.submatrix(0, 0, 2 * n, 2 * k),
            b.submatrix(0, 0, 2 * k, 2 * m),
            halves,
        )?;
        boundary::correct(&mut c, a, b, self.opts.correction_order);
        Ok(())
    }
}

impl Default for Strassen {
    fn default() -> Self {
        Self::new(StrassenOptions::default())
    }
}

impl fmt::Debug for Strassen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strassen")
            .field("opts", &self.opts)
            .field("schedule", &self.schedule.name())
            .field("scratch", &self.scratch.name())
            .finish()
    }
}

impl MatrixMultiplier for Strassen {
    fn multiply_into(&self, c: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<(), MatError> {
        check_conformant(c, a, b)?;
        debug!(
            ar = a.rows(),
            ac = a.cols(),
            bc = b.cols(),
            schedule = self.schedule.name(),
            scratch = self.scratch.name(),
            depth = self.depth(a.rows(), a.cols(), b.cols()),
            "strassen multiply"
        );
        let result = self.mul_rec(c.as_mut(), a.as_ref(), b.as_ref());
        if let Err(err) = &result {
            warn!(%err, "aborting multiplication, output cleared");
            c.fill_zero();
        }
        result
    }

    fn name(&self) -> &str {
        self.schedule.name()
    }
}
