//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

use zmat_calibration::CalibrationProfile;
use zmat_core::{CorrectionOrder, ScheduleKind, StrassenOptions, DEFAULT_ENTRY_BITS};

/// Which multipliers to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algo {
    /// Strassen with the Winograd combination schedule.
    Winograd,
    /// Strassen with seven independent products.
    Independent,
    /// The cubic baseline.
    Classical,
    /// Every multiplier above, cross-checked against each other.
    All,
}

impl Algo {
    /// Strassen schedules selected by this choice, in run order.
    #[must_use]
    pub fn schedules(self) -> Vec<ScheduleKind> {
        match self {
            Self::Winograd => vec![ScheduleKind::Winograd],
            Self::Independent => vec![ScheduleKind::Independent],
            Self::Classical => Vec::new(),
            Self::All => ScheduleKind::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn includes_classical(self) -> bool {
        matches!(self, Self::Classical | Self::All)
    }
}

/// zmat: exact Strassen multiplication of big-integer matrices.
#[derive(Parser, Debug)]
#[command(name = "zmat", version, about)]
pub struct AppConfig {
    /// Rows of A (and of the product).
    #[arg(short = 'n', long, default_value_t = 128, env = "ZMAT_ROWS")]
    pub rows: usize,

    /// Columns of A, rows of B.
    #[arg(short = 'k', long, default_value_t = 128, env = "ZMAT_INNER")]
    pub inner: usize,

    /// Columns of B (and of the product).
    #[arg(short = 'm', long, default_value_t = 128, env = "ZMAT_COLS")]
    pub cols: usize,

    /// Entries are drawn uniformly from [-2^bits, 2^bits].
    #[arg(long, default_value_t = DEFAULT_ENTRY_BITS, env = "ZMAT_BITS")]
    pub bits: u64,

    /// Seed for the operand generator.
    #[arg(long, default_value_t = 42, env = "ZMAT_SEED")]
    pub seed: u64,

    /// Multiplier to run.
    #[arg(long, value_enum, default_value_t = Algo::Winograd, env = "ZMAT_ALGO")]
    pub algo: Algo,

    /// Output area at or below which the classical kernel is used (0 = profile or default).
    #[arg(long, default_value_t = 0, env = "ZMAT_BASE_AREA")]
    pub base_area: usize,

    /// Dimension floor for the classical kernel (0 = profile or default).
    #[arg(long, default_value_t = 0, env = "ZMAT_BASE_FLOOR")]
    pub base_floor: usize,

    /// Quadrant area from which independent products run in parallel (0 = profile or default).
    #[arg(long, default_value_t = 0, env = "ZMAT_PARALLEL_THRESHOLD")]
    pub parallel_threshold: usize,

    /// Order of the odd-dimension patches: row-col-inner or inner-row-col.
    #[arg(long, default_value_t = CorrectionOrder::RowColInner, env = "ZMAT_CORRECTION_ORDER")]
    pub correction_order: CorrectionOrder,

    /// Reuse temporary buffers through a cell pool.
    #[arg(long)]
    pub pooled: bool,

    /// Cross-check every result against the classical baseline.
    #[arg(long)]
    pub verify: bool,

    /// Write the product to this file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (only print the product).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (full matrices and entries).
    #[arg(short, long)]
    pub verbose: bool,

    /// Run full calibration and save the profile.
    #[arg(long)]
    pub calibrate: bool,

    /// Run a quick calibration and save the profile.
    #[arg(long)]
    pub auto_calibrate: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Whether any threshold is left for the profile to fill in.
    #[must_use]
    pub fn wants_profile(&self) -> bool {
        self.base_area == 0 || self.base_floor == 0 || self.parallel_threshold == 0
    }

    /// Recursion options: explicit flags win over the profile, which wins
    /// over the built-in defaults.
    #[must_use]
    pub fn strassen_options(&self, profile: Option<&CalibrationProfile>) -> StrassenOptions {
        let base = profile.map_or_else(StrassenOptions::default, CalibrationProfile::to_options);
        StrassenOptions {
            base_case_area: pick(self.base_area, base.base_case_area),
            base_case_floor: pick(self.base_floor, base.base_case_floor),
            parallel_threshold: pick(self.parallel_threshold, base.parallel_threshold),
            correction_order: self.correction_order,
        }
        .normalize()
    }
}

fn pick(flag: usize, fallback: usize) -> usize {
    if flag == 0 {
        fallback
    } else {
        flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmat_core::DEFAULT_BASE_CASE_AREA;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("zmat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = parse(&[]);
        assert_eq!((cfg.rows, cfg.inner, cfg.cols), (128, 128, 128));
        assert_eq!(cfg.algo, Algo::Winograd);
        assert_eq!(cfg.correction_order, CorrectionOrder::RowColInner);
        assert!(cfg.wants_profile());
        assert_eq!(cfg.strassen_options(None), StrassenOptions::default());
    }

    #[test]
    fn shape_and_algo_flags() {
        let cfg = parse(&["-n", "3", "-k", "5", "-m", "7", "--algo", "all", "--bits", "200"]);
        assert_eq!((cfg.rows, cfg.inner, cfg.cols), (3, 5, 7));
        assert_eq!(cfg.bits, 200);
        assert_eq!(cfg.algo.schedules(), ScheduleKind::ALL.to_vec());
        assert!(cfg.algo.includes_classical());
    }

    #[test]
    fn correction_order_flag() {
        let cfg = parse(&["--correction-order", "inner-row-col"]);
        assert_eq!(cfg.correction_order, CorrectionOrder::InnerRowCol);
        assert!(AppConfig::try_parse_from(["zmat", "--correction-order", "sideways"]).is_err());
    }

    #[test]
    fn flags_override_profile() {
        let profile = CalibrationProfile {
            base_case_area: 256,
            base_case_floor: 2,
            parallel_threshold: 999,
            ..CalibrationProfile::default()
        };
        let cfg = parse(&["--base-area", "16"]);
        let opts = cfg.strassen_options(Some(&profile));
        assert_eq!(opts.base_case_area, 16);
        assert_eq!(opts.base_case_floor, 2);
        assert_eq!(opts.parallel_threshold, 999);

        let opts = parse(&[]).strassen_options(None);
        assert_eq!(opts.base_case_area, DEFAULT_BASE_CASE_AREA);
    }

    #[test]
    fn explicit_thresholds_skip_profile() {
        let cfg = parse(&["--base-area", "1", "--base-floor", "1", "--parallel-threshold", "4"]);
        assert!(!cfg.wants_profile());
    }
}
