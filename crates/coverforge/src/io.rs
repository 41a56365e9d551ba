//! Thin text I/O around the engine.
//!
//! Input is one line per period, each a whitespace-separated list of
//! resource identifiers. Output is one line per agent with exactly
//! `capacity` integers, `-1` marking an empty slot.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use coverforge_config::ProblemConfig;
use coverforge_core::{CoverageIndex, Result};
use tracing::{debug, warn};

/// Reads per-period identifier lists.
///
/// A line counts as a period only when its first character is an ASCII
/// digit; other lines (empty, indented, signed, text) are skipped without
/// ending the read. Identifiers are read up to the first token that is not an
/// integer. Reading stops after `expected_period_count`
/// periods when a count is given; fewer periods is a partial load, which is
/// logged and accepted.
///
/// # Examples
///
/// ```
/// use coverforge::io::load_periods;
///
/// let text = "3 7 x 9\n\n# header\n7\n";
/// let periods = load_periods(text.as_bytes(), Some(3)).unwrap();
/// assert_eq!(periods, vec![vec![3, 7], vec![7]]);
/// ```
pub fn load_periods<R: BufRead>(
    reader: R,
    expected_period_count: Option<usize>,
) -> Result<Vec<Vec<i64>>> {
    let mut periods = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        if expected_period_count.is_some_and(|expected| periods.len() >= expected) {
            break;
        }
        let line = line?;
        if !line.as_bytes().first().is_some_and(u8::is_ascii_digit) {
            skipped += 1;
            continue;
        }
        let ids: Vec<i64> = line
            .split_whitespace()
            .map_while(|t| t.parse::<i64>().ok())
            .collect();
        periods.push(ids);
    }

    debug!(
        event = "periods_loaded",
        loaded = periods.len() as u64,
        skipped_lines = skipped as u64,
    );
    if let Some(expected) = expected_period_count {
        if periods.len() < expected {
            warn!(
                event = "partial_load",
                expected = expected as u64,
                loaded = periods.len() as u64,
            );
        }
    }
    Ok(periods)
}

/// Opens `path` and reads it with [`load_periods`].
///
/// An unreadable source is fatal.
pub fn load_periods_from_path(
    path: impl AsRef<Path>,
    expected_period_count: Option<usize>,
) -> Result<Vec<Vec<i64>>> {
    let file = File::open(path)?;
    load_periods(BufReader::new(file), expected_period_count)
}

/// Loads periods and builds the coverage index using the problem's limits.
pub fn load_index<R: BufRead>(reader: R, problem: &ProblemConfig) -> Result<CoverageIndex> {
    let periods = load_periods(reader, problem.expected_period_count)?;
    Ok(CoverageIndex::build(periods, problem.max_resource_id))
}

/// Path variant of [`load_index`].
pub fn load_index_from_path(
    path: impl AsRef<Path>,
    problem: &ProblemConfig,
) -> Result<CoverageIndex> {
    let periods = load_periods_from_path(path, problem.expected_period_count)?;
    Ok(CoverageIndex::build(periods, problem.max_resource_id))
}

/// Writes one line per agent, slots separated by single spaces.
///
/// # Examples
///
/// ```
/// use coverforge::io::write_assignment;
///
/// let mut out = Vec::new();
/// write_assignment(&mut out, &[vec![4, -1], vec![-1, -1]]).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "4 -1\n-1 -1\n");
/// ```
pub fn write_assignment<W: Write>(mut writer: W, rows: &[Vec<i64>]) -> Result<()> {
    for row in rows {
        let mut first = true;
        for slot in row {
            if !first {
                write!(writer, " ")?;
            }
            write!(writer, "{}", slot)?;
            first = false;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the rows into it.
pub fn write_assignment_to_path(path: impl AsRef<Path>, rows: &[Vec<i64>]) -> Result<()> {
    let file = File::create(path)?;
    write_assignment(std::io::BufWriter::new(file), rows)
}
