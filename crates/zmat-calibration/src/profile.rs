//! Calibration profile (serializable).

use serde::{Deserialize, Serialize};

use zmat_core::constants::{
    DEFAULT_BASE_CASE_AREA, DEFAULT_BASE_CASE_FLOOR, DEFAULT_PARALLEL_THRESHOLD,
};
use zmat_core::StrassenOptions;

/// Current profile format version.
pub const PROFILE_VERSION: u32 = 1;

/// Measured recursion thresholds for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Profile format version for compatibility checking.
    pub version: u32,
    /// Output area at or below which the classical kernel is used.
    pub base_case_area: usize,
    /// Dimension floor for the classical kernel.
    pub base_case_floor: usize,
    /// Quadrant area from which the seven products run in parallel.
    pub parallel_threshold: usize,
    /// Bit bound of the entries the profile was measured with.
    pub entry_bits: u64,
    pub cpu_model: String,
    pub num_cores: usize,
    /// Used to discard profiles measured on another machine.
    pub cpu_fingerprint: String,
    pub timestamp: String,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            base_case_area: DEFAULT_BASE_CASE_AREA,
            base_case_floor: DEFAULT_BASE_CASE_FLOOR,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            entry_bits: zmat_core::DEFAULT_ENTRY_BITS,
            cpu_model: String::new(),
            num_cores: num_cores(),
            cpu_fingerprint: String::new(),
            timestamp: String::new(),
        }
    }
}

impl CalibrationProfile {
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == PROFILE_VERSION
    }

    /// An empty fingerprint on either side cannot be checked and is accepted.
    #[must_use]
    pub fn matches_cpu(&self, current_fingerprint: &str) -> bool {
        if self.cpu_fingerprint.is_empty() || current_fingerprint.is_empty() {
            return true;
        }
        self.cpu_fingerprint == current_fingerprint
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.base_case_area > 0 && self.base_case_floor > 0 && self.parallel_threshold > 0
    }

    /// Recursion options carrying this profile's thresholds.
    #[must_use]
    pub fn to_options(&self) -> StrassenOptions {
        StrassenOptions {
            base_case_area: self.base_case_area,
            base_case_floor: self.base_case_floor,
            parallel_threshold: self.parallel_threshold,
            ..StrassenOptions::default()
        }
        .normalize()
    }
}

pub(crate) fn num_cores() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(4)
}

/// CPU fingerprint based on the model string and core count.
#[must_use]
pub fn cpu_fingerprint() -> String {
    let model = cpu_model();
    let cores = num_cores();
    if model.is_empty() {
        format!("cores={cores}")
    } else {
        format!("{model};cores={cores}")
    }
}

#[must_use]
pub fn cpu_model() -> String {
    use sysinfo::System;
    let sys = System::new_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .unwrap_or_default()
}

#[must_use]
pub fn current_timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", dur.as_secs())
}
