//! # zmat-core
//!
//! Exact multiplication of dense arbitrary-precision integer matrices.
//! Implements the classical algorithm and Strassen's seven-product recursion
//! with odd-dimension correction and pluggable temporary allocation.

pub mod arith;
pub mod boundary;
pub mod classical;
pub mod constants;
pub mod matrix;
pub mod multiplier;
pub mod options;
pub mod random;
pub mod scalar;
pub mod schedule;
pub mod scratch;
pub mod strassen;
pub mod view;

// Re-exports
pub use boundary::CorrectionOrder;
pub use classical::Classical;
pub use constants::{
    exit_codes, DEFAULT_BASE_CASE_AREA, DEFAULT_BASE_CASE_FLOOR, DEFAULT_ENTRY_BITS,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use matrix::Matrix;
pub use multiplier::{MatError, MatrixMultiplier};
pub use options::StrassenOptions;
pub use schedule::{IndependentProducts, Schedule, ScheduleKind, WinogradSchedule};
pub use scratch::{CountingScratch, HeapScratch, PooledScratch, ScratchAlloc, Temp};
pub use strassen::Strassen;
pub use view::{MatMut, MatRef, Window};

/// Multiply two matrices with the default Strassen configuration.
///
/// For custom thresholds, schedules or allocators build a [`Strassen`]
/// directly.
///
/// # Example
/// ```
/// use zmat_core::Matrix;
///
/// let a = Matrix::from_rows([[1, 2], [3, 4]]).unwrap();
/// let b = Matrix::from_rows([[5, 6], [7, 8]]).unwrap();
/// let c = zmat_core::multiply(&a, &b).unwrap();
/// assert_eq!(c.to_string(), "19 22\n43 50\n");
/// ```
///
/// # Errors
///
/// Returns [`MatError::DimensionMismatch`] if `a.cols() != b.rows()` and
/// [`MatError::Allocation`] if a temporary cannot be allocated.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
    Strassen::default().multiply(a, b)
}
