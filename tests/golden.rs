//! Golden file integration tests.
//!
//! Reads tests/testdata/products_golden.json and checks that every
//! multiplier configuration reproduces the recorded products exactly.

use std::sync::Arc;

use num_bigint::BigInt;
use serde::Deserialize;

use zmat_core::{
    Classical, CorrectionOrder, Matrix, MatrixMultiplier, PooledScratch, ScheduleKind, Strassen,
    StrassenOptions,
};

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    cases: Vec<GoldenCase>,
}

#[derive(Deserialize)]
struct GoldenCase {
    name: String,
    a: Vec<Vec<String>>,
    b: Vec<Vec<String>>,
    c: Vec<Vec<String>>,
}

fn load_golden_data() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/products_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

fn parse(rows: &[Vec<String>]) -> Matrix {
    Matrix::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|s| s.parse::<BigInt>().expect("bad golden entry"))),
    )
    .expect("ragged golden matrix")
}

// ---------------------------------------------------------------------------
// Multiplier configurations under test
// ---------------------------------------------------------------------------

fn multipliers() -> Vec<Box<dyn MatrixMultiplier>> {
    let deep = StrassenOptions {
        base_case_area: 1,
        base_case_floor: 1,
        parallel_threshold: 4,
        ..StrassenOptions::default()
    };
    let mut all: Vec<Box<dyn MatrixMultiplier>> =
        vec![Box::new(Classical::new()), Box::new(Classical::parallel()), Box::new(Strassen::default())];
    for kind in ScheduleKind::ALL {
        for order in CorrectionOrder::ALL {
            let opts = StrassenOptions {
                correction_order: order,
                ..deep
            };
            all.push(Box::new(Strassen::new(opts).with_schedule(kind.build())));
        }
        all.push(Box::new(
            Strassen::new(deep)
                .with_schedule(kind.build())
                .with_scratch(Arc::new(PooledScratch::default())),
        ));
    }
    all
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_file_loads() {
    let data = load_golden_data();
    assert!(data.cases.len() >= 10);
    for case in &data.cases {
        let (a, b, c) = (parse(&case.a), parse(&case.b), parse(&case.c));
        assert_eq!(a.cols(), b.rows(), "{}", case.name);
        assert_eq!(c.shape(), (a.rows(), b.cols()), "{}", case.name);
    }
}

#[test]
fn every_multiplier_matches_golden_products() {
    let data = load_golden_data();
    let multipliers = multipliers();
    for case in &data.cases {
        let (a, b, expected) = (parse(&case.a), parse(&case.b), parse(&case.c));
        for m in &multipliers {
            let c = m.multiply(&a, &b).unwrap();
            assert_eq!(c, expected, "{} via {}", case.name, m.name());
        }
    }
}

#[test]
fn multiply_into_overwrites_previous_contents() {
    let data = load_golden_data();
    let engine = Strassen::new(StrassenOptions::exhaustive());
    for case in &data.cases {
        let (a, b, expected) = (parse(&case.a), parse(&case.b), parse(&case.c));
        let mut c = Matrix::from_fn(a.rows(), b.cols(), |i, j| BigInt::from(i * 31 + j) - 1000);
        engine.multiply_into(&mut c, &a, &b).unwrap();
        assert_eq!(c, expected, "{}", case.name);
    }
}

#[test]
fn transposed_products_agree() {
    // (A B)^T = B^T A^T
    let data = load_golden_data();
    let engine = Strassen::new(StrassenOptions::exhaustive());
    for case in &data.cases {
        let (a, b, expected) = (parse(&case.a), parse(&case.b), parse(&case.c));
        let ct = engine.multiply(&b.transpose(), &a.transpose()).unwrap();
        assert_eq!(ct, expected.transpose(), "{}", case.name);
    }
}

#[test]
fn known_small_product() {
    let data = load_golden_data();
    let case = data.cases.iter().find(|c| c.name == "two_by_two").unwrap();
    assert_eq!(parse(&case.c).to_string(), "19 22\n43 50\n");
}
