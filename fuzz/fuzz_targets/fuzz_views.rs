#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigInt;

use zmat_core::{Matrix, Window};

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let rows = usize::from(data[0] % 16) + 1;
    let cols = usize::from(data[1] % 16) + 1;
    let m = Matrix::from_fn(rows, cols, |i, j| BigInt::from(i * 100 + j));

    let r0 = usize::from(data[2]) % rows;
    let c0 = usize::from(data[3]) % cols;
    let r1 = r0 + usize::from(data[4]) % (rows - r0 + 1);
    let c1 = c0 + usize::from(data[5]) % (cols - c0 + 1);

    let view = m.view(r0, c0, r1, c1);
    assert_eq!(view.window(), Window::span(r0, c0, r1, c1));
    for i in 0..view.rows() {
        for j in 0..view.cols() {
            assert_eq!(view.get(i, j), m.get(r0 + i, c0 + j));
        }
    }
    assert_eq!(view.to_matrix().shape(), (r1 - r0, c1 - c0));
});
