//! Row-major matrix of arbitrary-precision integers.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::multiplier::MatError;
use crate::view::{MatMut, MatRef, Window};

/// Dense matrix owning `rows * cols` `BigInt` cells in row-major order.
///
/// Every cell is initialised; new matrices are all zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<BigInt>,
}

impl Matrix {
    /// Create a zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(rows * cols, BigInt::zero);
        Self { rows, cols, cells }
    }

    /// Create a zero matrix, reporting allocation failure instead of aborting.
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Self, MatError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(MatError::Allocation { rows, cols })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| MatError::Allocation { rows, cols })?;
        cells.resize_with(len, BigInt::zero);
        Ok(Self { rows, cols, cells })
    }

    /// Wrap an existing zero-filled or populated row-major buffer.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<BigInt>) -> Result<Self, MatError> {
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(MatError::InvalidData(format!(
                "{} cells cannot form a {rows}x{cols} matrix",
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a matrix from rows of values convertible to `BigInt`.
    pub fn from_rows<T, R>(rows: impl IntoIterator<Item = R>) -> Result<Self, MatError>
    where
        T: Into<BigInt>,
        R: IntoIterator<Item = T>,
    {
        let mut cells = Vec::new();
        let mut n_rows = 0;
        let mut n_cols = None;
        for row in rows {
            let before = cells.len();
            cells.extend(row.into_iter().map(Into::into));
            let width = cells.len() - before;
            match n_cols {
                None => n_cols = Some(width),
                Some(w) if w != width => {
                    return Err(MatError::InvalidData(format!(
                        "row {n_rows} has {width} entries, expected {w}"
                    )));
                }
                Some(_) => {}
            }
            n_rows += 1;
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols.unwrap_or(0),
            cells,
        })
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> BigInt) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                cells.push(f(i, j));
            }
        }
        Self { rows, cols, cells }
    }

    /// Create the `n x n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { BigInt::one() } else { BigInt::zero() })
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for matrices with no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> &BigInt {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) outside {}x{}", self.rows, self.cols);
        &self.cells[i * self.cols + j]
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut BigInt {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) outside {}x{}", self.rows, self.cols);
        &mut self.cells[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: impl Into<BigInt>) {
        *self.get_mut(i, j) = value.into();
    }

    /// Shared view of the whole matrix.
    #[must_use]
    pub fn as_ref(&self) -> MatRef<'_> {
        MatRef::new(self, Window::full(self.rows, self.cols))
    }

    /// Exclusive view of the whole matrix.
    pub fn as_mut(&mut self) -> MatMut<'_> {
        let win = Window::full(self.rows, self.cols);
        MatMut::new(self, win)
    }

    /// Shared view onto `[r0, r1) x [c0, c1)`.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle does not lie inside the matrix.
    #[must_use]
    pub fn view(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatRef<'_> {
        self.as_ref().submatrix(r0, c0, r1, c1)
    }

    /// Exclusive view onto `[r0, r1) x [c0, c1)`.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle does not lie inside the matrix.
    pub fn view_mut(&mut self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatMut<'_> {
        self.as_mut().into_submatrix(r0, c0, r1, c1)
    }

    /// Set every cell to zero.
    pub fn fill_zero(&mut self) {
        self.cells.iter_mut().for_each(Zero::set_zero);
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(Zero::is_zero)
    }

    /// The row-major cell buffer.
    #[must_use]
    pub fn cells(&self) -> &[BigInt] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [BigInt] {
        &mut self.cells
    }

    /// Give up the cell buffer, e.g. to return it to a pool.
    #[must_use]
    pub fn into_cells(self) -> Vec<BigInt> {
        self.cells
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i).clone())
    }

    /// Largest entry bit length (0 for an all-zero matrix).
    #[must_use]
    pub fn max_bits(&self) -> u64 {
        self.cells.iter().map(BigInt::bits).max().unwrap_or(0)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = BigInt;

    fn index(&self, (i, j): (usize, usize)) -> &BigInt {
        self.get(i, j)
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut BigInt {
        self.get_mut(i, j)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let row = &self.cells[i * self.cols..(i + 1) * self.cols];
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
