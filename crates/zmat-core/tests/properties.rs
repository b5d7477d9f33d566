//! Property-based tests for the Strassen engine.
//!
//! Every configuration is checked against the classical multiplier on
//! random shapes and entries, with recursion forced down to small blocks so
//! that every level and every odd-dimension patch is exercised.

use std::sync::Arc;

use num_bigint::BigInt;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use zmat_core::random::random_matrix;
use zmat_core::{
    Classical, CorrectionOrder, CountingScratch, HeapScratch, Matrix, MatrixMultiplier,
    ScheduleKind, Strassen, StrassenOptions,
};

fn deep(kind: ScheduleKind, order: CorrectionOrder) -> Strassen {
    Strassen::new(StrassenOptions {
        base_case_area: 4,
        base_case_floor: 1,
        parallel_threshold: 16,
        correction_order: order,
    })
    .with_schedule(kind.build())
}

fn operands(seed: u64, ar: usize, ac: usize, bc: usize, bits: u64) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(seed);
    (
        random_matrix(&mut rng, ar, ac, bits),
        random_matrix(&mut rng, ac, bc, bits),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Strassen equals the schoolbook product for every schedule.
    #[test]
    fn strassen_matches_classical(
        ar in 1usize..14,
        ac in 1usize..14,
        bc in 1usize..14,
        bits in 0u64..80,
        seed in any::<u64>(),
    ) {
        let (a, b) = operands(seed, ar, ac, bc, bits);
        let expected = Classical::new().multiply(&a, &b).unwrap();
        for kind in ScheduleKind::ALL {
            let got = deep(kind, CorrectionOrder::default()).multiply(&a, &b).unwrap();
            prop_assert_eq!(&got, &expected, "{} on {}x{}x{}", kind, ar, ac, bc);
        }
    }

    /// Both correction orders produce the same result.
    #[test]
    fn correction_orders_agree(
        ar in 2usize..12,
        ac in 2usize..12,
        bc in 2usize..12,
        seed in any::<u64>(),
    ) {
        let (a, b) = operands(seed, ar, ac, bc, 32);
        let first = deep(ScheduleKind::Winograd, CorrectionOrder::RowColInner)
            .multiply(&a, &b)
            .unwrap();
        let second = deep(ScheduleKind::Winograd, CorrectionOrder::InnerRowCol)
            .multiply(&a, &b)
            .unwrap();
        prop_assert_eq!(first, second);
    }

    /// Whatever `C` held before is fully replaced.
    #[test]
    fn prefilled_output_is_overwritten(
        n in 2usize..10,
        noise in -1000i64..1000,
        seed in any::<u64>(),
    ) {
        let (a, b) = operands(seed, n, n + 1, n, 16);
        let expected = Classical::new().multiply(&a, &b).unwrap();
        let mut c = Matrix::from_fn(n, n, |i, j| BigInt::from(noise) * (i + j + 1));
        deep(ScheduleKind::Winograd, CorrectionOrder::default())
            .multiply_into(&mut c, &a, &b)
            .unwrap();
        prop_assert_eq!(c, expected);
    }

    /// Every temporary is returned once the product is complete.
    #[test]
    fn temporaries_balance(n in 2usize..12, seed in any::<u64>()) {
        let (a, b) = operands(seed, n, n, n, 8);
        for kind in ScheduleKind::ALL {
            let scratch = Arc::new(CountingScratch::new(HeapScratch));
            deep(kind, CorrectionOrder::default())
                .with_scratch(scratch.clone())
                .multiply(&a, &b)
                .unwrap();
            prop_assert!(scratch.stats().is_balanced());
        }
    }
}

#[test]
fn every_parity_combination() {
    for ar in [8, 9] {
        for ac in [8, 9] {
            for bc in [8, 9] {
                let (a, b) = operands(11, ar, ac, bc, 40);
                let expected = Classical::new().multiply(&a, &b).unwrap();
                for kind in ScheduleKind::ALL {
                    let got = deep(kind, CorrectionOrder::default())
                        .multiply(&a, &b)
                        .unwrap();
                    assert_eq!(got, expected, "{kind} on {ar}x{ac}x{bc}");
                }
            }
        }
    }
}

#[test]
fn large_entries_on_odd_shapes() {
    let (a, b) = operands(2024, 33, 37, 41, 200);
    assert!(a.max_bits() > 190);
    let expected = Classical::new().multiply(&a, &b).unwrap();
    for kind in ScheduleKind::ALL {
        let got = Strassen::new(StrassenOptions {
            base_case_area: 16,
            base_case_floor: 2,
            ..StrassenOptions::default()
        })
        .with_schedule(kind.build())
        .multiply(&a, &b)
        .unwrap();
        assert_eq!(got, expected, "{kind}");
    }
}

#[test]
fn default_engine_above_the_base_case() {
    let (a, b) = operands(5, 70, 66, 72, 64);
    let engine = Strassen::default();
    assert!(engine.depth(70, 66, 72) >= 1);
    assert_eq!(
        engine.multiply(&a, &b).unwrap(),
        Classical::new().multiply(&a, &b).unwrap()
    );
}

#[test]
fn zero_operand_gives_zero() {
    let (a, _) = operands(3, 9, 9, 9, 64);
    let z = Matrix::zeros(9, 9);
    let engine = deep(ScheduleKind::Winograd, CorrectionOrder::default());
    assert!(engine.multiply(&a, &z).unwrap().is_zero());
    assert!(engine.multiply(&z, &a).unwrap().is_zero());
}

#[test]
fn identity_is_neutral() {
    let (a, _) = operands(4, 10, 10, 10, 100);
    let id = Matrix::identity(10);
    let engine = deep(ScheduleKind::Independent, CorrectionOrder::InnerRowCol);
    assert_eq!(engine.multiply(&a, &id).unwrap(), a);
    assert_eq!(engine.multiply(&id, &a).unwrap(), a);
}

#[test]
fn one_by_one() {
    let a = Matrix::from_rows([[-7]]).unwrap();
    let b = Matrix::from_rows([[6]]).unwrap();
    let c = Strassen::new(StrassenOptions::exhaustive())
        .multiply(&a, &b)
        .unwrap();
    assert_eq!(c[(0, 0)], BigInt::from(-42));
}

#[test]
fn negative_entries() {
    let a = Matrix::from_rows([[-1, -2, -3], [-4, -5, -6], [-7, -8, -9]]).unwrap();
    let b = Matrix::from_rows([[9, -8, 7], [-6, 5, -4], [3, -2, 1]]).unwrap();
    let expected = Matrix::from_rows([[-6, 4, -2], [-24, 19, -14], [-42, 34, -26]]).unwrap();
    for kind in ScheduleKind::ALL {
        let got = Strassen::new(StrassenOptions::exhaustive())
            .with_schedule(kind.build())
            .multiply(&a, &b)
            .unwrap();
        assert_eq!(got, expected, "{kind}");
    }
}
