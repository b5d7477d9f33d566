//! Random operands for tests, benchmarks and calibration.

use num_bigint::{BigInt, RandBigInt};
use num_traits::One;
use rand::Rng;

use crate::matrix::Matrix;

/// Matrix with entries drawn uniformly from `[-2^bits, 2^bits]`.
pub fn random_matrix<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize, bits: u64) -> Matrix {
    let bound = BigInt::one() << bits;
    let lo = -bound.clone();
    let hi = bound + 1u32;
    Matrix::from_fn(rows, cols, |_, _| rng.gen_bigint_range(&lo, &hi))
}
