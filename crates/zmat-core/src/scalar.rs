//! Fused scalar kernels on `BigInt`.

use num_bigint::BigInt;
use num_traits::Zero;

/// `acc += x * y`.
#[inline]
pub fn addmul(acc: &mut BigInt, x: &BigInt, y: &BigInt) {
    if x.is_zero() || y.is_zero() {
        return;
    }
    *acc += x * y;
}

/// Sum of pairwise products of two equally long sequences.
pub fn dot<'a>(
    xs: impl IntoIterator<Item = &'a BigInt>,
    ys: impl IntoIterator<Item = &'a BigInt>,
) -> BigInt {
    let mut acc = BigInt::zero();
    for (x, y) in xs.into_iter().zip(ys) {
        addmul(&mut acc, x, y);
    }
    acc
}
