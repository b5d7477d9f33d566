//! CLI output formatting.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use zmat_core::Matrix;

/// Matrices with at most this many cells are printed in full.
const FULL_PRINT_CELLS: usize = 64;
/// Rows and columns shown from each corner of a large matrix.
const PREVIEW: usize = 4;

/// Format an entry, eliding the middle of very long numbers.
#[must_use]
pub fn format_entry(value: &num_bigint::BigInt, verbose: bool) -> String {
    let s = value.to_string();
    let digits = s.trim_start_matches('-').len();
    if !verbose && digits > 40 {
        format!("{}...{} ({digits} digits)", &s[..s.len() - digits + 15], &s[s.len() - 15..])
    } else {
        s
    }
}

/// Render a matrix for the terminal.
///
/// Small matrices are printed in full; larger ones as a shape line followed
/// by their top-left corner.
#[must_use]
pub fn format_matrix(m: &Matrix, verbose: bool) -> String {
    let mut out = format!(
        "{}x{} matrix, entries up to {} bits\n",
        m.rows(),
        m.cols(),
        m.max_bits()
    );
    let full = verbose || m.len() <= FULL_PRINT_CELLS;
    let rows = if full { m.rows() } else { m.rows().min(PREVIEW) };
    let cols = if full { m.cols() } else { m.cols().min(PREVIEW) };
    for i in 0..rows {
        let line: Vec<String> = (0..cols).map(|j| format_entry(m.get(i, j), verbose)).collect();
        out.push_str(&line.join(" "));
        if cols < m.cols() {
            out.push_str(" ...");
        }
        out.push('\n');
    }
    if rows < m.rows() {
        let _ = writeln!(out, "... ({} more rows)", m.rows() - rows);
    }
    out
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        format!("{mins}m{:.1}s", secs - mins as f64 * 60.0)
    }
}

/// Format a count with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Write a matrix as a `rows cols` header line followed by one line per row.
pub fn write_matrix(path: &Path, m: &Matrix) -> io::Result<()> {
    tracing::debug!(path = %path.display(), rows = m.rows(), cols = m.cols(), "writing product");
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "{} {}", m.rows(), m.cols())?;
    write!(file, "{m}")?;
    file.flush()
}
