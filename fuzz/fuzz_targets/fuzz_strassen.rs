#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigInt;

use zmat_core::{
    Classical, CorrectionOrder, Matrix, MatrixMultiplier, ScheduleKind, Strassen, StrassenOptions,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    // Shapes up to 24 keep each input fast while still recursing a few levels.
    let ar = usize::from(data[0] % 24) + 1;
    let ac = usize::from(data[1] % 24) + 1;
    let bc = usize::from(data[2] % 24) + 1;
    let flags = data[3];
    let shift = usize::from(data[4] % 130);
    let payload = &data[5..];

    let mut bytes = payload.iter().cycle().copied();
    let mut entry = || {
        let v = i64::from(bytes.next().unwrap_or(0) as i8);
        BigInt::from(v) << shift
    };
    let a = Matrix::from_fn(ar, ac, |_, _| entry());
    let b = Matrix::from_fn(ac, bc, |_, _| entry());

    let opts = StrassenOptions {
        base_case_area: 1,
        base_case_floor: usize::from(flags & 0x3) + 1,
        parallel_threshold: if flags & 0x4 != 0 { 1 } else { usize::MAX },
        correction_order: CorrectionOrder::ALL[usize::from(flags >> 3) & 1],
    };
    let kind = ScheduleKind::ALL[usize::from(flags >> 4) & 1];

    let expected = Classical::new().multiply(&a, &b).unwrap();
    let got = Strassen::new(opts)
        .with_schedule(kind.build())
        .multiply(&a, &b)
        .unwrap();
    assert_eq!(got, expected, "{ar}x{ac}x{bc} via {kind} ({opts:?})");
});
