//! Odd-dimension patches applied after the even-sized block of a level.
//!
//! With `n = ar & !1` and `m = bc & !1` the schedules only produce
//! `C[0..n, 0..m]` from the leading even-sized blocks of `A` and `B`. The
//! three patches below complete the product:
//!
//! - last row (ar odd): `C[ar-1, ..]` is overwritten with `A[ar-1, ..] * B`
//! - last column (bc odd): `C[0..n, bc-1]` is overwritten with `A[0..n, ..] * B[.., bc-1]`
//! - last inner index (ac odd): `C[0..n, 0..m] += A[0..n, ac-1] * B[ac-1, 0..m]`
//!
//! The regions written are pairwise disjoint, so the patches commute.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classical::{addmul_into, mul_into};
use crate::scalar::dot;
use crate::view::{MatMut, MatRef};

/// Order in which the three patches run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionOrder {
    /// Last row, then last column, then the rank-one inner update.
    #[default]
    RowColInner,
    /// Rank-one inner update first, then last row and column.
    InnerRowCol,
}

impl CorrectionOrder {
    pub const ALL: [CorrectionOrder; 2] = [Self::RowColInner, Self::InnerRowCol];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RowColInner => "row-col-inner",
            Self::InnerRowCol => "inner-row-col",
        }
    }
}

impl fmt::Display for CorrectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown correction order '{s}' (expected row-col-inner or inner-row-col)"))
    }
}

/// Overwrite the last row of `c` with `A[ar-1, ..] * B` when `ar` is odd.
pub fn fix_last_row(c: &mut MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    let (ar, ac, bc) = (a.rows(), a.cols(), b.cols());
    if ar % 2 == 0 {
        return;
    }
    let i = ar - 1;
    mul_into(c.submatrix_mut(i, 0, ar, bc), a.submatrix(i, 0, ar, ac), b);
}

/// Overwrite `C[0..n, bc-1]` when `bc` is odd.
pub fn fix_last_col(c: &mut MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    let (ar, ac, bc) = (a.rows(), a.cols(), b.cols());
    if bc % 2 == 0 {
        return;
    }
    let (n, j) = (ar & !1, bc - 1);
    for i in 0..n {
        *c.get_mut(i, j) = dot(a.row(i), (0..ac).map(|t| b.get(t, j)));
    }
}

/// Add the contribution of the dropped inner index to the even block when
/// `ac` is odd.
pub fn fold_last_inner(c: &mut MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    let (ar, ac, bc) = (a.rows(), a.cols(), b.cols());
    if ac % 2 == 0 {
        return;
    }
    let (n, m, t) = (ar & !1, bc & !1, ac - 1);
    addmul_into(
        c.submatrix_mut(0, 0, n, m),
        a.submatrix(0, t, n, ac),
        b.submatrix(t, 0, ac, m),
    );
}

/// Apply all three patches in the given order.
pub fn correct(c: &mut MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>, order: CorrectionOrder) {
    match order {
        CorrectionOrder::RowColInner => {
            fix_last_row(c, a, b);
            fix_last_col(c, a, b);
            fold_last_inner(c, a, b);
        }
        CorrectionOrder::InnerRowCol => {
            fold_last_inner(c, a, b);
            fix_last_row(c, a, b);
            fix_last_col(c, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use num_bigint::BigInt;

    fn operands(ar: usize, ac: usize, bc: usize) -> (Matrix, Matrix) {
        let a = Matrix::from_fn(ar, ac, |i, j| BigInt::from(i as i64 * 7 - j as i64 * 3 + 1));
        let b = Matrix::from_fn(ac, bc, |i, j| BigInt::from(j as i64 * 5 - i as i64 * 2 - 4));
        (a, b)
    }

    fn reference(a: &Matrix, b: &Matrix) -> Matrix {
        let mut c = Matrix::zeros(a.rows(), b.cols());
        mul_into(c.as_mut(), a.as_ref(), b.as_ref());
        c
    }

    /// Even block filled from the even-sized operand blocks, rest left noisy.
    fn even_block_only(a: &Matrix, b: &Matrix) -> Matrix {
        let (n, k, m) = (a.rows() & !1, a.cols() & !1, b.cols() & !1);
        let mut c = Matrix::from_fn(a.rows(), b.cols(), |i, j| BigInt::from(1000 + i * 10 + j));
        mul_into(c.view_mut(0, 0, n, m), a.view(0, 0, n, k), b.view(0, 0, k, m));
        c
    }

    #[test]
    fn patches_complete_every_parity() {
        for ar in [4, 5] {
            for ac in [4, 5] {
                for bc in [4, 5] {
                    let (a, b) = operands(ar, ac, bc);
                    for order in CorrectionOrder::ALL {
                        let mut c = even_block_only(&a, &b);
                        correct(&mut c.as_mut(), a.as_ref(), b.as_ref(), order);
                        assert_eq!(c, reference(&a, &b), "{ar}x{ac}x{bc} {order}");
                    }
                }
            }
        }
    }

    #[test]
    fn even_dimensions_are_untouched() {
        let (a, b) = operands(4, 4, 4);
        let mut c = Matrix::from_fn(4, 4, |i, j| BigInt::from(i + j));
        let before = c.clone();
        correct(&mut c.as_mut(), a.as_ref(), b.as_ref(), CorrectionOrder::RowColInner);
        assert_eq!(c, before);
    }

    #[test]
    fn last_row_covers_corner() {
        let (a, b) = operands(3, 2, 3);
        let mut c = Matrix::zeros(3, 3);
        fix_last_row(&mut c.as_mut(), a.as_ref(), b.as_ref());
        let full = reference(&a, &b);
        assert_eq!(c.view(2, 0, 3, 3), full.view(2, 0, 3, 3));
        assert!(c.view(0, 0, 2, 3).is_zero());
    }

    #[test]
    fn last_col_stops_at_even_rows() {
        let (a, b) = operands(3, 2, 3);
        let mut c = Matrix::zeros(3, 3);
        fix_last_col(&mut c.as_mut(), a.as_ref(), b.as_ref());
        let full = reference(&a, &b);
        assert_eq!(c.view(0, 2, 2, 3), full.view(0, 2, 2, 3));
        assert!(c.view(2, 0, 3, 3).is_zero());
        assert!(c.view(0, 0, 2, 2).is_zero());
    }

    #[test]
    fn last_col_is_exact_for_wide_entries() {
        let a = Matrix::from_fn(4, 3, |i, j| (BigInt::from(i * 3 + j + 1) << 190u32) - 7);
        let b = Matrix::from_fn(3, 5, |i, j| BigInt::from(j as i64 - i as i64) << 150u32);
        let mut c = Matrix::from_fn(4, 5, |i, j| BigInt::from(i * 100 + j));
        let before = c.clone();
        fix_last_col(&mut c.as_mut(), a.as_ref(), b.as_ref());
        let full = reference(&a, &b);
        assert_eq!(c.view(0, 4, 4, 5), full.view(0, 4, 4, 5));
        assert_eq!(c.view(0, 0, 4, 4), before.view(0, 0, 4, 4));
    }

    #[test]
    fn order_round_trips_through_text() {
        for order in CorrectionOrder::ALL {
            assert_eq!(order.to_string().parse::<CorrectionOrder>(), Ok(order));
        }
        assert!("sideways".parse::<CorrectionOrder>().is_err());
        assert_eq!(CorrectionOrder::default(), CorrectionOrder::RowColInner);
    }
}
