//! CLI result presenter.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use zmat_core::{MatError, Matrix, StrassenOptions};
use zmat_memory::ScratchStats;

use crate::output::{format_duration, format_matrix, format_number};

/// Outcome of running one multiplier.
#[derive(Debug)]
pub struct RunRecord {
    pub multiplier: String,
    pub duration: Duration,
    pub result: Result<Matrix, MatError>,
    /// Temporary-matrix traffic, when the multiplier used scratch storage.
    pub scratch: Option<ScratchStats>,
}

/// Machine-readable summary of a whole invocation.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub rows: usize,
    pub inner: usize,
    pub cols: usize,
    pub bits: u64,
    pub seed: u64,
    pub options: StrassenOptions,
    pub runs: Vec<RunSummary>,
    /// `None` when no cross-check was performed.
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub multiplier: String,
    pub duration_ns: u64,
    pub ok: bool,
    pub error: Option<String>,
    pub result_bits: Option<u64>,
    pub temporaries: Option<TempUsage>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TempUsage {
    pub acquired: u64,
    pub peak_live: u64,
    pub cells: u64,
    pub failed: u64,
}

impl From<&ScratchStats> for TempUsage {
    fn from(s: &ScratchStats) -> Self {
        Self {
            acquired: s.acquired,
            peak_live: s.peak_live,
            cells: s.cells,
            failed: s.failed,
        }
    }
}

impl From<&RunRecord> for RunSummary {
    fn from(r: &RunRecord) -> Self {
        Self {
            multiplier: r.multiplier.clone(),
            duration_ns: u64::try_from(r.duration.as_nanos()).unwrap_or(u64::MAX),
            ok: r.result.is_ok(),
            error: r.result.as_ref().err().map(ToString::to_string),
            result_bits: r.result.as_ref().ok().map(Matrix::max_bits),
            temporaries: r.scratch.as_ref().map(TempUsage::from),
        }
    }
}

/// Prints run results for humans (or just the product in quiet mode).
pub struct CliPresenter {
    verbose: bool,
    quiet: bool,
}

impl CliPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Present every run, then a comparison table when there are several.
    ///
    /// Quiet mode prints only the first successful product.
    pub fn present_runs(&self, out: &mut dyn Write, records: &[RunRecord]) -> io::Result<()> {
        if self.quiet {
            if let Some(m) = records.iter().find_map(|r| r.result.as_ref().ok()) {
                write!(out, "{m}")?;
            }
            return Ok(());
        }
        for (i, record) in records.iter().enumerate() {
            self.present_result(out, record, i == 0)?;
        }
        if records.len() > 1 {
            self.present_comparison(out, records)?;
        }
        Ok(())
    }

    fn present_result(&self, out: &mut dyn Write, record: &RunRecord, show_matrix: bool) -> io::Result<()> {
        writeln!(out, "Multiplier: {}", record.multiplier)?;
        writeln!(out, "Duration: {}", format_duration(record.duration))?;
        if let Some(s) = &record.scratch {
            writeln!(
                out,
                "Temporaries: {} acquired, peak {} live, {} cells",
                format_number(s.acquired),
                s.peak_live,
                format_number(s.cells)
            )?;
        }
        match &record.result {
            Ok(m) if show_matrix || self.verbose => write!(out, "{}", format_matrix(m, self.verbose))?,
            Ok(_) => {}
            Err(e) => writeln!(out, "Error: {e}")?,
        }
        writeln!(out)
    }

    pub fn present_comparison(&self, out: &mut dyn Write, records: &[RunRecord]) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(out, "Comparison:")?;
        writeln!(out, "{:-<48}", "")?;
        for r in records {
            let status = if r.result.is_ok() { "OK" } else { "ERROR" };
            writeln!(
                out,
                "  {:<24} {:>12} [{status}]",
                r.multiplier,
                format_duration(r.duration)
            )?;
        }
        Ok(())
    }

    pub fn present_json(&self, out: &mut dyn Write, report: &RunReport) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::other)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, result: Result<Matrix, MatError>) -> RunRecord {
        RunRecord {
            multiplier: name.to_string(),
            duration: Duration::from_millis(5),
            result,
            scratch: None,
        }
    }

    fn render(p: &CliPresenter, records: &[RunRecord]) -> String {
        let mut buf = Vec::new();
        p.present_runs(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn product() -> Matrix {
        Matrix::from_rows([[19, 22], [43, 50]]).unwrap()
    }

    #[test]
    fn quiet_prints_only_the_product() {
        let out = render(
            &CliPresenter::new(false, true),
            &[
                record("winograd", Err(MatError::Allocation { rows: 1, cols: 1 })),
                record("classical", Ok(product())),
            ],
        );
        assert_eq!(out, "19 22\n43 50\n");
    }

    #[test]
    fn normal_output_has_summary_and_comparison() {
        let mut with_scratch = record("winograd", Ok(product()));
        with_scratch.scratch = Some(ScratchStats {
            acquired: 1200,
            released: 1200,
            peak_live: 14,
            cells: 5000,
            ..ScratchStats::default()
        });
        let out = render(
            &CliPresenter::new(false, false),
            &[with_scratch, record("classical", Ok(product()))],
        );
        assert!(out.contains("Multiplier: winograd"));
        assert!(out.contains("Temporaries: 1,200 acquired, peak 14 live, 5,000 cells"));
        assert!(out.contains("19 22"));
        assert!(out.contains("Comparison:"));
        assert!(out.contains("[OK]"));
    }

    #[test]
    fn errors_are_reported_inline() {
        let out = render(
            &CliPresenter::new(false, false),
            &[record("independent", Err(MatError::Allocation { rows: 3, cols: 4 }))],
        );
        assert!(out.contains("Error: failed to allocate a 3x4 temporary matrix"));
        assert!(!out.contains("Comparison:"));
    }

    #[test]
    fn summary_from_record() {
        let s = RunSummary::from(&record("classical", Ok(product())));
        assert!(s.ok);
        assert_eq!(s.result_bits, Some(6));
        assert_eq!(s.duration_ns, 5_000_000);
        assert_eq!(s.error, None);
    }

    #[test]
    fn json_report() {
        let report = RunReport {
            rows: 2,
            inner: 2,
            cols: 2,
            bits: 8,
            seed: 1,
            options: StrassenOptions::default(),
            runs: vec![RunSummary::from(&record("winograd", Ok(product())))],
            verified: Some(true),
        };
        let mut buf = Vec::new();
        CliPresenter::new(false, false).present_json(&mut buf, &report).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["runs"][0]["multiplier"], "winograd");
        assert_eq!(v["options"]["correction_order"], "row-col-inner");
        assert_eq!(v["verified"], true);
    }
}
