//! Error type and the `MatrixMultiplier` trait.
//!
//! `MatrixMultiplier` is the public interface consumed by callers and by the
//! CLI. It is implemented by the classical baseline and by the Strassen engine.

use crate::matrix::Matrix;

/// Error type for matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatError {
    /// `A.cols != B.rows`.
    #[error("dimension mismatch: cannot multiply {a_rows}x{a_cols} by {b_rows}x{b_cols}")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },

    /// The output matrix is not shaped `A.rows x B.cols`.
    #[error("output is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    OutputShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// A temporary matrix could not be allocated.
    #[error("failed to allocate a {rows}x{cols} temporary matrix")]
    Allocation { rows: usize, cols: usize },

    /// Matrix data does not describe a rectangular grid.
    #[error("invalid matrix data: {0}")]
    InvalidData(String),

    /// Two multipliers disagreed on the same operands.
    #[error("result mismatch between {left} and {right}")]
    Mismatch { left: String, right: String },
}

/// Check that `a * b` is defined.
pub fn check_inner(a: &Matrix, b: &Matrix) -> Result<(), MatError> {
    if a.cols() != b.rows() {
        return Err(MatError::DimensionMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }
    Ok(())
}

/// Check that `a * b` is defined and that `c` can hold it.
///
/// Performs no mutation, so a failing check leaves `c` untouched.
pub fn check_conformant(c: &Matrix, a: &Matrix, b: &Matrix) -> Result<(), MatError> {
    check_inner(a, b)?;
    if c.rows() != a.rows() || c.cols() != b.cols() {
        return Err(MatError::OutputShape {
            expected_rows: a.rows(),
            expected_cols: b.cols(),
            rows: c.rows(),
            cols: c.cols(),
        });
    }
    Ok(())
}

/// Public trait for exact matrix multipliers.
pub trait MatrixMultiplier: Send + Sync {
    /// Overwrite `c` with `a * b`.
    fn multiply_into(&self, c: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<(), MatError>;

    /// Compute `a * b` into a freshly allocated matrix.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatError> {
        check_inner(a, b)?;
        let mut c = Matrix::try_zeros(a.rows(), b.cols())?;
        self.multiply_into(&mut c, a, b)?;
        Ok(c)
    }

    /// Get the name of this multiplier.
    fn name(&self) -> &str;
}
