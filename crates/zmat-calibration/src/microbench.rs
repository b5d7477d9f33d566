//! Micro-benchmarks for calibration.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use zmat_core::random::random_matrix;
use zmat_core::{
    Classical, IndependentProducts, Matrix, MatrixMultiplier, Strassen, StrassenOptions,
};

use crate::runner::{measure, Timing};

/// Classical vs one Strassen level on `size x size` operands.
#[derive(Debug, Clone)]
pub struct CrossoverPoint {
    pub size: usize,
    pub classical_ns: u64,
    pub strassen_ns: u64,
    pub strassen_is_faster: bool,
}

/// Sequential vs parallel products of one level on `size x size` operands.
#[derive(Debug, Clone)]
pub struct ParallelOverhead {
    pub size: usize,
    pub sequential_ns: u64,
    pub parallel_ns: u64,
    pub speedup: f64,
}

fn square_operands(size: usize, bits: u64) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(0x5eed ^ size as u64);
    (
        random_matrix(&mut rng, size, size, bits),
        random_matrix(&mut rng, size, size, bits),
    )
}

/// Options that run exactly one Strassen level on `size x size` operands.
fn single_level(size: usize) -> StrassenOptions {
    let half = (size / 2).max(1);
    StrassenOptions {
        base_case_area: half * half,
        base_case_floor: 1,
        parallel_threshold: usize::MAX,
        ..StrassenOptions::default()
    }
}

fn time(mul: &dyn MatrixMultiplier, a: &Matrix, b: &Matrix, samples: u32) -> Timing {
    measure(1, samples, || {
        std::hint::black_box(mul.multiply(a, b).ok());
    })
    .labelled(mul.name())
}

/// Time the classical kernel against a single Strassen level at each size.
#[must_use]
pub fn find_crossover(sizes: &[usize], bits: u64, samples: u32) -> Vec<CrossoverPoint> {
    sizes
        .iter()
        .map(|&size| {
            let (a, b) = square_operands(size, bits);
            let classical = time(&Classical::new(), &a, &b, samples);
            let strassen = time(&Strassen::new(single_level(size)), &a, &b, samples);
            CrossoverPoint {
                size,
                classical_ns: classical.median_ns(),
                strassen_ns: strassen.median_ns(),
                strassen_is_faster: strassen.median < classical.median,
            }
        })
        .collect()
}

/// Compare the independent-products schedule run sequentially and on the
/// rayon pool for one level of `size x size` operands.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn measure_parallel_overhead(size: usize, bits: u64, samples: u32) -> ParallelOverhead {
    let (a, b) = square_operands(size, bits);
    let opts = single_level(size);
    let sequential = Strassen::new(opts).with_schedule(Arc::new(IndependentProducts));
    let parallel = Strassen::new(StrassenOptions {
        parallel_threshold: 1,
        ..opts
    })
    .with_schedule(Arc::new(IndependentProducts));

    let seq_ns = time(&sequential, &a, &b, samples).median_ns();
    let par_ns = time(&parallel, &a, &b, samples).median_ns();

    ParallelOverhead {
        size,
        sequential_ns: seq_ns,
        parallel_ns: par_ns,
        speedup: if par_ns > 0 {
            seq_ns as f64 / par_ns as f64
        } else {
            1.0
        },
    }
}
