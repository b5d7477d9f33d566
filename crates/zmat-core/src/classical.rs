//! Schoolbook multiplication.
//!
//! Used as the Strassen base case, for the odd-dimension patches, and as the
//! reference result that every other multiplier is checked against.

use num_traits::Zero;
use rayon::prelude::*;

use crate::matrix::Matrix;
use crate::multiplier::{check_conformant, MatError, MatrixMultiplier};
use crate::scalar::addmul;
use crate::view::{MatMut, MatRef};

fn assert_product_shape(c: (usize, usize), a: (usize, usize), b: (usize, usize)) {
    assert!(
        a.1 == b.0 && c.0 == a.0 && c.1 == b.1,
        "cannot store {}x{} * {}x{} in {}x{}",
        a.0,
        a.1,
        b.0,
        b.1,
        c.0,
        c.1
    );
}

/// `c = a * b` on views.
///
/// # Panics
///
/// Panics if the shapes are not conformant.
pub fn mul_into(mut c: MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    assert_product_shape(c.shape(), a.shape(), b.shape());
    c.fill_zero();
    accumulate(&mut c, a, b);
}

/// `c += a * b` on views.
///
/// # Panics
///
/// Panics if the shapes are not conformant.
pub fn addmul_into(mut c: MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    assert_product_shape(c.shape(), a.shape(), b.shape());
    accumulate(&mut c, a, b);
}

fn accumulate(c: &mut MatMut<'_>, a: MatRef<'_>, b: MatRef<'_>) {
    for i in 0..a.rows() {
        let a_row = a.row(i);
        let c_row = c.row_mut(i);
        for (t, x) in a_row.iter().enumerate() {
            if x.is_zero() {
                continue;
            }
            for (d, y) in c_row.iter_mut().zip(b.row(t)) {
                addmul(d, x, y);
            }
        }
    }
}

/// Triple-loop multiplier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classical {
    parallel: bool,
}

impl Classical {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute output rows on the rayon pool.
    #[must_use]
    pub fn parallel() -> Self {
        Self { parallel: true }
    }
}

impl MatrixMultiplier for Classical {
    fn multiply_into(&self, c: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<(), MatError> {
        check_conformant(c, a, b)?;
        let width = c.cols();
        if !self.parallel || width == 0 {
            mul_into(c.as_mut(), a.as_ref(), b.as_ref());
            return Ok(());
        }
        let (a, b) = (a.as_ref(), b.as_ref());
        c.cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(i, c_row)| {
                c_row.iter_mut().for_each(Zero::set_zero);
                for (t, x) in a.row(i).iter().enumerate() {
                    if x.is_zero() {
                        continue;
                    }
                    for (d, y) in c_row.iter_mut().zip(b.row(t)) {
                        addmul(d, x, y);
                    }
                }
            });
        Ok(())
    }

    fn name(&self) -> &str {
        if self.parallel {
            "classical (parallel)"
        } else {
            "classical"
        }
    }
}
