//! Timing loop shared by the micro-benchmarks.

use std::time::{Duration, Instant};

/// Summary of repeated timings of one closure.
#[derive(Debug, Clone, Default)]
pub struct Timing {
    pub label: String,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
    pub samples: u32,
}

impl Timing {
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Median in nanoseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn median_ns(&self) -> u64 {
        u64::try_from(self.median.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Run `f` `warmup` times untimed, then `samples` times timed.
pub fn measure<F>(warmup: u32, samples: u32, mut f: F) -> Timing
where
    F: FnMut(),
{
    for _ in 0..warmup {
        f();
    }

    let mut durations: Vec<Duration> = (0..samples.max(1))
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    durations.sort_unstable();

    let mid = durations.len() / 2;
    let median = if durations.len() % 2 == 1 {
        durations[mid]
    } else {
        (durations[mid - 1] + durations[mid]) / 2
    };

    Timing {
        label: String::new(),
        median,
        min: durations[0],
        max: durations[durations.len() - 1],
        samples: samples.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_of_summary() {
        let t = measure(1, 7, || {
            std::hint::black_box((0..1000u64).sum::<u64>());
        });
        assert_eq!(t.samples, 7);
        assert!(t.min <= t.median && t.median <= t.max);
    }

    #[test]
    fn zero_samples_still_measures_once() {
        let mut calls = 0;
        let t = measure(0, 0, || calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(t.samples, 1);
    }

    #[test]
    fn labels_attach() {
        let t = measure(0, 2, || {}).labelled("noop");
        assert_eq!(t.label, "noop");
    }
}
