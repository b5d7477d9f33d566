//! Zero-copy sub-matrix views.
//!
//! A [`Window`] is an offset plus an extent into a backing [`Matrix`].
//! [`MatRef`] pairs a shared borrow of the backing matrix with a window,
//! [`MatMut`] pairs an exclusive borrow with one. Cell `(i, j)` of a view is
//! cell `(row + i, col + j)` of the backing matrix; no cells are copied and
//! dropping a view never touches the backing storage.
//!
//! Windows are checked against their parent when a view is narrowed. A
//! window that escapes its parent is a programming error and panics.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::matrix::Matrix;

/// Offset and extent of a rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Window {
    /// Window covering a whole `rows x cols` matrix.
    #[must_use]
    pub const fn full(rows: usize, cols: usize) -> Self {
        Self {
            row: 0,
            col: 0,
            rows,
            cols,
        }
    }

    /// Half-open rectangle `[r0, r1) x [c0, c1)`.
    ///
    /// # Panics
    ///
    /// Panics if `r0 > r1` or `c0 > c1`.
    #[must_use]
    pub fn span(r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        assert!(
            r0 <= r1 && c0 <= c1,
            "inverted window [{r0}, {r1}) x [{c0}, {c1})"
        );
        Self {
            row: r0,
            col: c0,
            rows: r1 - r0,
            cols: c1 - c0,
        }
    }

    /// Whether this window lies inside a `rows x cols` parent.
    #[must_use]
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        self.row + self.rows <= rows && self.col + self.cols <= cols
    }

    /// Narrow this window to `[r0, r1) x [c0, c1)` in its own coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle does not lie inside `self`.
    #[must_use]
    pub fn sub(self, r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        self.nest(Self::span(r0, c0, r1, c1))
    }

    /// Place a window given in this window's coordinates into the parent's.
    ///
    /// # Panics
    ///
    /// Panics if `inner` does not lie inside `self`.
    #[must_use]
    pub fn nest(self, inner: Window) -> Self {
        assert!(
            inner.fits(self.rows, self.cols),
            "view [{}, {}) x [{}, {}) outside {}x{}",
            inner.row,
            inner.row + inner.rows,
            inner.col,
            inner.col + inner.cols,
            self.rows,
            self.cols
        );
        Self {
            row: self.row + inner.row,
            col: self.col + inner.col,
            rows: inner.rows,
            cols: inner.cols,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether two windows share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &Window) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.row < other.row + other.rows
            && other.row < self.row + self.rows
            && self.col < other.col + other.cols
            && other.col < self.col + self.cols
    }

    /// The four `half_rows x half_cols` quadrants of a `2*half_rows x 2*half_cols`
    /// block, in the order `[11, 12, 21, 22]`.
    #[must_use]
    pub fn quadrants(half_rows: usize, half_cols: usize) -> [Window; 4] {
        let (h, w) = (half_rows, half_cols);
        [
            Self::span(0, 0, h, w),
            Self::span(0, w, h, 2 * w),
            Self::span(h, 0, 2 * h, w),
            Self::span(h, w, 2 * h, 2 * w),
        ]
    }
}

/// Shared view of a rectangular region of a matrix.
#[derive(Clone, Copy)]
pub struct MatRef<'a> {
    mat: &'a Matrix,
    win: Window,
}

impl<'a> MatRef<'a> {
    pub(crate) fn new(mat: &'a Matrix, win: Window) -> Self {
        assert!(
            win.fits(mat.rows(), mat.cols()),
            "window {win:?} outside {}x{}",
            mat.rows(),
            mat.cols()
        );
        Self { mat, win }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.win.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.win.cols
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.win.rows, self.win.cols)
    }

    /// Position of this view inside its backing matrix.
    #[must_use]
    pub fn window(&self) -> Window {
        self.win
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> &'a BigInt {
        debug_assert!(i < self.win.rows && j < self.win.cols);
        &self.mat.cells()[(self.win.row + i) * self.mat.cols() + self.win.col + j]
    }

    /// Row `i` of the view as a contiguous slice.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &'a [BigInt] {
        assert!(i < self.win.rows, "row {i} outside view of {} rows", self.win.rows);
        let start = (self.win.row + i) * self.mat.cols() + self.win.col;
        &self.mat.cells()[start..start + self.win.cols]
    }

    /// View onto `[r0, r1) x [c0, c1)` of this view.
    #[must_use]
    pub fn submatrix(self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatRef<'a> {
        self.in_window(Window::span(r0, c0, r1, c1))
    }

    /// View onto a window given in this view's coordinates.
    #[must_use]
    pub fn in_window(self, inner: Window) -> MatRef<'a> {
        Self {
            mat: self.mat,
            win: self.win.nest(inner),
        }
    }

    /// Quadrant views `[11, 12, 21, 22]` of the leading even-sized block.
    #[must_use]
    pub fn quadrants(self, half_rows: usize, half_cols: usize) -> [MatRef<'a>; 4] {
        Window::quadrants(half_rows, half_cols).map(|w| self.in_window(w))
    }

    /// Copy the viewed cells into a new matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_fn(self.rows(), self.cols(), |i, j| self.get(i, j).clone())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        (0..self.rows()).all(|i| self.row(i).iter().all(Zero::is_zero))
    }
}

impl PartialEq for MatRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && (0..self.rows()).all(|i| self.row(i) == other.row(i))
    }
}

impl fmt::Debug for MatRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatRef")
            .field("window", &self.win)
            .field("backing", &self.mat.shape())
            .finish()
    }
}

/// Exclusive view of a rectangular region of a matrix.
pub struct MatMut<'a> {
    mat: &'a mut Matrix,
    win: Window,
}

impl<'a> MatMut<'a> {
    pub(crate) fn new(mat: &'a mut Matrix, win: Window) -> Self {
        assert!(
            win.fits(mat.rows(), mat.cols()),
            "window {win:?} outside {}x{}",
            mat.rows(),
            mat.cols()
        );
        Self { mat, win }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.win.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.win.cols
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.win.rows, self.win.cols)
    }

    #[must_use]
    pub fn window(&self) -> Window {
        self.win
    }

    /// Shared reborrow.
    #[must_use]
    pub fn rb(&self) -> MatRef<'_> {
        MatRef {
            mat: self.mat,
            win: self.win,
        }
    }

    /// Exclusive reborrow.
    pub fn rb_mut(&mut self) -> MatMut<'_> {
        MatMut {
            mat: self.mat,
            win: self.win,
        }
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.win.rows && j < self.win.cols);
        (self.win.row + i) * self.mat.cols() + self.win.col + j
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> &BigInt {
        &self.mat.cells()[self.offset(i, j)]
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut BigInt {
        let at = self.offset(i, j);
        &mut self.mat.cells_mut()[at]
    }

    pub fn set(&mut self, i: usize, j: usize, value: impl Into<BigInt>) {
        *self.get_mut(i, j) = value.into();
    }

    /// Row `i` of the view as a contiguous mutable slice.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [BigInt] {
        assert!(i < self.win.rows, "row {i} outside view of {} rows", self.win.rows);
        let start = (self.win.row + i) * self.mat.cols() + self.win.col;
        let end = start + self.win.cols;
        &mut self.mat.cells_mut()[start..end]
    }

    /// Shared view onto `[r0, r1) x [c0, c1)` of this view.
    #[must_use]
    pub fn submatrix(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatRef<'_> {
        self.rb().submatrix(r0, c0, r1, c1)
    }

    /// Exclusive view onto `[r0, r1) x [c0, c1)`, borrowing from `self`.
    pub fn submatrix_mut(&mut self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatMut<'_> {
        self.rb_mut().into_submatrix(r0, c0, r1, c1)
    }

    /// Exclusive view onto `[r0, r1) x [c0, c1)`, consuming `self`.
    #[must_use]
    pub fn into_submatrix(self, r0: usize, c0: usize, r1: usize, c1: usize) -> MatMut<'a> {
        let win = self.win.sub(r0, c0, r1, c1);
        MatMut { mat: self.mat, win }
    }

    /// Exclusive view onto a window given in this view's coordinates.
    pub fn in_window_mut(&mut self, inner: Window) -> MatMut<'_> {
        let win = self.win.nest(inner);
        MatMut { mat: self.mat, win }
    }

    /// Set every viewed cell to zero.
    pub fn fill_zero(&mut self) {
        for i in 0..self.rows() {
            self.row_mut(i).iter_mut().for_each(Zero::set_zero);
        }
    }

    /// Row `i` of window `dst` (mutable) and of window `src` (shared), both
    /// given in this view's coordinates.
    ///
    /// The two windows must be disjoint, which makes the two row slices
    /// disjoint ranges of the backing buffer.
    pub(crate) fn row_pair(
        &mut self,
        dst: Window,
        src: Window,
        i: usize,
    ) -> (&mut [BigInt], &[BigInt]) {
        let stride = self.mat.cols();
        let d0 = (self.win.row + dst.row + i) * stride + self.win.col + dst.col;
        let s0 = (self.win.row + src.row + i) * stride + self.win.col + src.col;
        let width = dst.cols;
        let cells = self.mat.cells_mut();
        if d0 < s0 {
            let (lo, hi) = cells.split_at_mut(s0);
            (&mut lo[d0..d0 + width], &hi[..width])
        } else {
            let (lo, hi) = cells.split_at_mut(d0);
            (&mut hi[..width], &lo[s0..s0 + width])
        }
    }
}

impl fmt::Debug for MatMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatMut")
            .field("window", &self.win)
            .field("backing", &self.mat.shape())
            .finish()
    }
}
