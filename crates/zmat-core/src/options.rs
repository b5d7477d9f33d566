//! Strassen recursion options.

use serde::{Deserialize, Serialize};

use crate::boundary::CorrectionOrder;
use crate::constants::{
    DEFAULT_BASE_CASE_AREA, DEFAULT_BASE_CASE_FLOOR, DEFAULT_PARALLEL_THRESHOLD,
};

/// Options controlling where the recursion stops and how it is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrassenOptions {
    /// Output area (`rows * cols`) at or below which the classical algorithm is used.
    pub base_case_area: usize,
    /// Any dimension at or below this value selects the classical algorithm.
    pub base_case_floor: usize,
    /// Quadrant area from which independent products are run in parallel.
    pub parallel_threshold: usize,
    /// Order in which odd-dimension patches are applied.
    pub correction_order: CorrectionOrder,
}

impl Default for StrassenOptions {
    fn default() -> Self {
        Self {
            base_case_area: DEFAULT_BASE_CASE_AREA,
            base_case_floor: DEFAULT_BASE_CASE_FLOOR,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            correction_order: CorrectionOrder::default(),
        }
    }
}

impl StrassenOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.base_case_area == 0 {
            self.base_case_area = DEFAULT_BASE_CASE_AREA;
        }
        if self.base_case_floor == 0 {
            self.base_case_floor = DEFAULT_BASE_CASE_FLOOR;
        }
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        self
    }

    /// Whether an `ar x ac` by `ac x bc` product is handled classically.
    #[inline]
    #[must_use]
    pub fn is_base_case(&self, ar: usize, ac: usize, bc: usize) -> bool {
        ar.saturating_mul(bc) <= self.base_case_area
            || ar <= self.base_case_floor
            || ac <= self.base_case_floor
            || bc <= self.base_case_floor
    }

    /// Options that recurse all the way down to 1x1 blocks.
    ///
    /// Useful for exercising every level of the recursion on small inputs.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self {
            base_case_area: 1,
            base_case_floor: 1,
            parallel_threshold: usize::MAX,
            correction_order: CorrectionOrder::default(),
        }
    }
}
