//! Elementwise addition and subtraction on views.
//!
//! All operations require equal shapes and panic otherwise. The `*_within`
//! variants read and write two disjoint windows of the same view, which is
//! how the output quadrants of a Strassen level are combined in place.

use std::mem;

use num_bigint::BigInt;

use crate::view::{MatMut, MatRef, Window};

#[inline]
fn assert_same_shape(op: &str, dst: (usize, usize), src: (usize, usize)) {
    assert!(
        dst == src,
        "{op}: shape {}x{} does not match {}x{}",
        dst.0,
        dst.1,
        src.0,
        src.1
    );
}

#[inline]
fn negate_in_place(d: &mut BigInt) {
    *d = -mem::take(d);
}

/// `dst = x + y`.
pub fn add(mut dst: MatMut<'_>, x: MatRef<'_>, y: MatRef<'_>) {
    assert_same_shape("add", dst.shape(), x.shape());
    assert_same_shape("add", dst.shape(), y.shape());
    for i in 0..dst.rows() {
        let (xr, yr) = (x.row(i), y.row(i));
        for ((d, a), b) in dst.row_mut(i).iter_mut().zip(xr).zip(yr) {
            d.clone_from(a);
            *d += b;
        }
    }
}

/// `dst = x - y`.
pub fn sub(mut dst: MatMut<'_>, x: MatRef<'_>, y: MatRef<'_>) {
    assert_same_shape("sub", dst.shape(), x.shape());
    assert_same_shape("sub", dst.shape(), y.shape());
    for i in 0..dst.rows() {
        let (xr, yr) = (x.row(i), y.row(i));
        for ((d, a), b) in dst.row_mut(i).iter_mut().zip(xr).zip(yr) {
            d.clone_from(a);
            *d -= b;
        }
    }
}

impl MatMut<'_> {
    /// `self = src`.
    pub fn copy_from(&mut self, src: MatRef<'_>) {
        assert_same_shape("copy_from", self.shape(), src.shape());
        for i in 0..self.rows() {
            let sr = src.row(i);
            for (d, s) in self.row_mut(i).iter_mut().zip(sr) {
                d.clone_from(s);
            }
        }
    }

    /// `self += src`.
    pub fn add_assign(&mut self, src: MatRef<'_>) {
        assert_same_shape("add_assign", self.shape(), src.shape());
        for i in 0..self.rows() {
            let sr = src.row(i);
            for (d, s) in self.row_mut(i).iter_mut().zip(sr) {
                *d += s;
            }
        }
    }

    /// `self -= src`.
    pub fn sub_assign(&mut self, src: MatRef<'_>) {
        assert_same_shape("sub_assign", self.shape(), src.shape());
        for i in 0..self.rows() {
            let sr = src.row(i);
            for (d, s) in self.row_mut(i).iter_mut().zip(sr) {
                *d -= s;
            }
        }
    }

    /// `self = src - self`.
    pub fn rsub_assign(&mut self, src: MatRef<'_>) {
        assert_same_shape("rsub_assign", self.shape(), src.shape());
        for i in 0..self.rows() {
            let sr = src.row(i);
            for (d, s) in self.row_mut(i).iter_mut().zip(sr) {
                *d -= s;
                negate_in_place(d);
            }
        }
    }

    /// `self[dst] += self[src]` for two disjoint windows of this view.
    ///
    /// # Panics
    ///
    /// Panics if the windows differ in shape, overlap, or leave the view.
    pub fn add_assign_within(&mut self, dst: Window, src: Window) {
        self.check_within("add_assign_within", dst, src);
        for i in 0..dst.rows {
            let (dr, sr) = self.row_pair(dst, src, i);
            for (d, s) in dr.iter_mut().zip(sr) {
                *d += s;
            }
        }
    }

    /// `self[dst] = self[src] - self[dst]` for two disjoint windows of this view.
    ///
    /// # Panics
    ///
    /// Panics if the windows differ in shape, overlap, or leave the view.
    pub fn rsub_assign_within(&mut self, dst: Window, src: Window) {
        self.check_within("rsub_assign_within", dst, src);
        for i in 0..dst.rows {
            let (dr, sr) = self.row_pair(dst, src, i);
            for (d, s) in dr.iter_mut().zip(sr) {
                *d -= s;
                negate_in_place(d);
            }
        }
    }

    fn check_within(&self, op: &str, dst: Window, src: Window) {
        assert_same_shape(op, (dst.rows, dst.cols), (src.rows, src.cols));
        let (rows, cols) = self.shape();
        assert!(
            dst.fits(rows, cols) && src.fits(rows, cols),
            "{op}: window outside {rows}x{cols}"
        );
        assert!(!dst.overlaps(&src), "{op}: windows {dst:?} and {src:?} overlap");
    }
}
