//! Application entry point and dispatch.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use zmat_calibration::{io as profile_io, CalibrationEngine, CalibrationMode};
use zmat_cli::output::write_matrix;
use zmat_cli::presenter::RunSummary;
use zmat_cli::{CliPresenter, RunRecord, RunReport};
use zmat_core::random::random_matrix;
use zmat_core::{
    Classical, CountingScratch, HeapScratch, MatError, Matrix, MatrixMultiplier, PooledScratch,
    ScheduleKind, ScratchAlloc, Strassen, StrassenOptions,
};

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        zmat_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    if config.calibrate || config.auto_calibrate {
        return run_calibration(config);
    }

    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<()> {
    let profile = if config.wants_profile() {
        profile_io::load_validated_profile()
    } else {
        None
    };
    let opts = config.strassen_options(profile.as_ref());

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = random_matrix(&mut rng, config.rows, config.inner, config.bits);
    let b = random_matrix(&mut rng, config.inner, config.cols, config.bits);
    tracing::debug!(
        rows = config.rows,
        inner = config.inner,
        cols = config.cols,
        bits = config.bits,
        ?opts,
        "generated operands"
    );

    let mut records: Vec<RunRecord> = config
        .algo
        .schedules()
        .into_iter()
        .map(|kind| run_strassen(kind, opts, config.pooled, &a, &b))
        .collect();
    if config.algo.includes_classical() {
        records.push(run_multiplier(&Classical::new(), &a, &b));
    }

    let verified = cross_check(config, &records, &a, &b)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let presenter = CliPresenter::new(config.verbose, config.quiet);
    if config.json {
        let report = RunReport {
            rows: config.rows,
            inner: config.inner,
            cols: config.cols,
            bits: config.bits,
            seed: config.seed,
            options: opts,
            runs: records.iter().map(RunSummary::from).collect(),
            verified: verified.as_ref().map(Result::is_ok),
        };
        presenter.present_json(&mut out, &report)?;
    } else {
        presenter.present_runs(&mut out, &records)?;
        if let Some(Ok(())) = &verified {
            if !config.quiet {
                writeln!(out, "Verification: all results agree")?;
            }
        }
    }
    out.flush()?;

    if let Some(Err(mismatch)) = verified {
        return Err(mismatch.into());
    }
    if let Some(err) = records.iter().find_map(|r| r.result.as_ref().err()) {
        return Err(anyhow::Error::new(err.clone()).context(format!(
            "multiplying {}x{} by {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }

    if let Some(path) = &config.output {
        if let Some(product) = records.iter().find_map(|r| r.result.as_ref().ok()) {
            write_matrix(Path::new(path), product)
                .with_context(|| format!("writing product to {path}"))?;
        }
    }

    Ok(())
}

/// Run one Strassen schedule with counted temporaries.
fn run_strassen(kind: ScheduleKind, opts: StrassenOptions, pooled: bool, a: &Matrix, b: &Matrix) -> RunRecord {
    if pooled {
        run_counted(kind, opts, PooledScratch::default(), a, b)
    } else {
        run_counted(kind, opts, HeapScratch, a, b)
    }
}

fn run_counted<S: ScratchAlloc + 'static>(
    kind: ScheduleKind,
    opts: StrassenOptions,
    inner: S,
    a: &Matrix,
    b: &Matrix,
) -> RunRecord {
    let scratch = Arc::new(CountingScratch::new(inner));
    let engine = Strassen::new(opts)
        .with_schedule(kind.build())
        .with_scratch(Arc::clone(&scratch) as Arc<dyn ScratchAlloc>);
    let mut record = run_multiplier(&engine, a, b);
    let stats = scratch.stats();
    if !stats.is_balanced() {
        tracing::warn!(?stats, schedule = kind.as_str(), "temporaries left outstanding");
    }
    record.scratch = Some(stats);
    record
}

fn run_multiplier(m: &dyn MatrixMultiplier, a: &Matrix, b: &Matrix) -> RunRecord {
    let start = Instant::now();
    let result = m.multiply(a, b);
    RunRecord {
        multiplier: m.name().to_string(),
        duration: start.elapsed(),
        result,
        scratch: None,
    }
}

/// Compare successful results with each other and, with `--verify`, with
/// the classical baseline.
///
/// Returns `None` when there was nothing to compare.
fn cross_check(
    config: &AppConfig,
    records: &[RunRecord],
    a: &Matrix,
    b: &Matrix,
) -> Result<Option<Result<(), MatError>>> {
    let ok: Vec<(&str, &Matrix)> = records
        .iter()
        .filter_map(|r| r.result.as_ref().ok().map(|m| (r.multiplier.as_str(), m)))
        .collect();

    let reference_run;
    let reference: (&str, &Matrix) = match ok.iter().find(|(name, _)| name.starts_with("classical")) {
        Some(&found) => found,
        None if config.verify && !ok.is_empty() => {
            reference_run = Classical::new()
                .multiply(a, b)
                .context("computing the classical reference")?;
            ("classical", &reference_run)
        }
        None if ok.len() > 1 => ok[0],
        None => return Ok(None),
    };

    for &(name, product) in &ok {
        if product != reference.1 {
            tracing::warn!(left = name, right = reference.0, "results disagree");
            return Ok(Some(Err(MatError::Mismatch {
                left: name.to_string(),
                right: reference.0.to_string(),
            })));
        }
    }
    Ok(Some(Ok(())))
}

fn run_calibration(config: &AppConfig) -> Result<()> {
    let mode = if config.calibrate {
        CalibrationMode::Full
    } else {
        CalibrationMode::Quick
    };

    let quiet = config.quiet;
    let engine = CalibrationEngine::new(mode)
        .with_entry_bits(config.bits)
        .with_progress(Box::new(move |p| {
            if !quiet {
                eprintln!("[{}/{}] {}", p.current, p.total, p.step);
            }
        }));
    let profile = engine.calibrate();
    let path = profile_io::save_profile(&profile).context("saving calibration profile")?;

    if !config.quiet {
        println!("Calibration complete:");
        println!("  Base case area: {}", profile.base_case_area);
        println!("  Base case floor: {}", profile.base_case_floor);
        println!("  Parallel threshold: {}", profile.parallel_threshold);
        println!("  Entry bits: {}", profile.entry_bits);
        println!("  Saved to {}", path.display());
    }
    Ok(())
}
