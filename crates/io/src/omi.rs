//! Reader for the whitespace-separated OMI (OLR-based MJO index) text file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;
use ttt_dataset::MjoIndex;

use crate::error::IoError;

const N_COLUMNS: usize = 7;

/// Read an OMI file with columns `year month day hour pc1 pc2 amplitude`.
///
/// Blank lines and lines starting with `#` are skipped. Dates must be
/// strictly ascending.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Parse`] for a malformed
/// line, or [`IoError::Dataset`] if the dates are out of order.
pub fn read_omi(path: &Path) -> Result<MjoIndex, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let index = parse_omi(BufReader::new(File::open(path)?), path)?;
    info!(path = %path.display(), n_days = index.len(), "read OMI index");
    Ok(index)
}

/// Parse OMI records from any buffered reader; `path` is only used in errors.
pub(crate) fn parse_omi(reader: impl BufRead, path: &Path) -> Result<MjoIndex, IoError> {
    let mut dates = Vec::new();
    let mut pc1 = Vec::new();
    let mut pc2 = Vec::new();
    let mut amplitude = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parse_err = |reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        };

        let cols: Vec<&str> = trimmed.split_whitespace().collect();
        if cols.len() != N_COLUMNS {
            return Err(parse_err(format!(
                "expected {N_COLUMNS} columns, got {}",
                cols.len()
            )));
        }
        let int = |k: usize| {
            cols[k]
                .parse::<u32>()
                .map_err(|e| parse_err(format!("column {}: {e}", k + 1)))
        };
        let float = |k: usize| {
            cols[k]
                .parse::<f64>()
                .map_err(|e| parse_err(format!("column {}: {e}", k + 1)))
        };

        let (year, month, day) = (int(0)?, int(1)?, int(2)?);
        let date = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
            .ok_or_else(|| parse_err(format!("invalid date {year}-{month}-{day}")))?;

        dates.push(date);
        pc1.push(float(4)?);
        pc2.push(float(5)?);
        amplitude.push(float(6)?);
    }

    Ok(MjoIndex::new(dates, pc1, pc2, amplitude)?)
}
