//! Calibration engine.

use zmat_core::constants::{DEFAULT_BASE_CASE_AREA, DEFAULT_BASE_CASE_FLOOR, DEFAULT_PARALLEL_THRESHOLD};

use crate::io;
use crate::microbench::{self, CrossoverPoint};
use crate::profile::{self, CalibrationProfile};

/// Mode of calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    /// Benchmark a wide range of sizes.
    Full,
    /// Benchmark a few small sizes only.
    Quick,
    /// Load the stored profile, falling back to defaults.
    Cached,
}

/// Progress callback for calibration.
pub type ProgressCallback = Box<dyn Fn(CalibrationProgress) + Send>;

#[derive(Debug, Clone)]
pub struct CalibrationProgress {
    pub step: String,
    /// 1-based.
    pub current: usize,
    pub total: usize,
}

struct Plan {
    crossover_sizes: &'static [usize],
    parallel_sizes: &'static [usize],
    samples: u32,
}

const FULL: Plan = Plan {
    crossover_sizes: &[16, 24, 32, 48, 64, 96, 128],
    parallel_sizes: &[32, 64, 128, 256],
    samples: 3,
};

const QUICK: Plan = Plan {
    crossover_sizes: &[16, 32, 64],
    parallel_sizes: &[32, 64],
    samples: 1,
};

/// Chooses recursion thresholds for the current machine.
pub struct CalibrationEngine {
    mode: CalibrationMode,
    entry_bits: u64,
    progress_cb: Option<ProgressCallback>,
}

impl CalibrationEngine {
    #[must_use]
    pub fn new(mode: CalibrationMode) -> Self {
        Self {
            mode,
            entry_bits: zmat_core::DEFAULT_ENTRY_BITS,
            progress_cb: None,
        }
    }

    /// Bit bound of the random entries used while benchmarking.
    #[must_use]
    pub fn with_entry_bits(mut self, bits: u64) -> Self {
        self.entry_bits = bits;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, cb: ProgressCallback) -> Self {
        self.progress_cb = Some(cb);
        self
    }

    /// Run calibration and produce a profile.
    #[must_use]
    pub fn calibrate(&self) -> CalibrationProfile {
        match self.mode {
            CalibrationMode::Full => self.measure(&FULL),
            CalibrationMode::Quick => self.measure(&QUICK),
            CalibrationMode::Cached => load_cached(),
        }
    }

    fn report_progress(&self, step: &str, current: usize, total: usize) {
        if let Some(cb) = &self.progress_cb {
            cb(CalibrationProgress {
                step: step.to_string(),
                current,
                total,
            });
        }
    }

    fn measure(&self, plan: &Plan) -> CalibrationProfile {
        let total_steps = 3;

        self.report_progress("Benchmarking classical vs Strassen crossover", 1, total_steps);
        let points = microbench::find_crossover(plan.crossover_sizes, self.entry_bits, plan.samples);
        let base_case_area = base_case_area_from(&points);

        self.report_progress("Measuring parallel overhead", 2, total_steps);
        let parallel_threshold = plan
            .parallel_sizes
            .iter()
            .find(|&&size| {
                microbench::measure_parallel_overhead(size, self.entry_bits, plan.samples).speedup
                    > 1.1
            })
            .map_or(DEFAULT_PARALLEL_THRESHOLD, |&size| (size / 2) * (size / 2));

        self.report_progress("Building profile", 3, total_steps);
        let profile = CalibrationProfile {
            version: profile::PROFILE_VERSION,
            base_case_area,
            base_case_floor: DEFAULT_BASE_CASE_FLOOR,
            parallel_threshold,
            entry_bits: self.entry_bits,
            cpu_model: profile::cpu_model(),
            num_cores: profile::num_cores(),
            cpu_fingerprint: profile::cpu_fingerprint(),
            timestamp: profile::current_timestamp(),
        };
        tracing::info!(
            base_case_area,
            parallel_threshold,
            entry_bits = self.entry_bits,
            "calibration finished"
        );
        profile
    }
}

/// Largest losing size squared, i.e. every size from the first win upward
/// recurses. Without any win, nothing up to the largest measured size does.
fn base_case_area_from(points: &[CrossoverPoint]) -> usize {
    match points.iter().position(|p| p.strassen_is_faster) {
        Some(0) => {
            let half = points[0].size / 2;
            (half * half).max(1)
        }
        Some(i) => points[i - 1].size * points[i - 1].size,
        None => points
            .last()
            .map_or(DEFAULT_BASE_CASE_AREA, |p| (p.size * p.size).max(DEFAULT_BASE_CASE_AREA)),
    }
}

fn load_cached() -> CalibrationProfile {
    match io::load_profile() {
        Some(p) => match io::validate(&p) {
            Ok(()) => p,
            Err(reason) => {
                tracing::warn!(?reason, "cached profile rejected, using defaults");
                CalibrationProfile::default()
            }
        },
        None => CalibrationProfile::default(),
    }
}
