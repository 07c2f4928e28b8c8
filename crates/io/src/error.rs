//! Error types for ttt-io.

use std::path::PathBuf;

use ttt_dataset::DatasetError;
use ttt_grid::GridError;

/// Error type for all fallible operations in the ttt-io crate.
///
/// Covers missing files, format errors from NetCDF, CSV and the OMI text
/// format, and invariant violations raised while turning file contents into
/// fields and series.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the CSV writer.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps a plain I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value cannot be parsed or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a line of a text file cannot be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Returned when columns handed to a writer are not aligned.
    #[error("{field}: expected {expected} rows, got {got}")]
    LengthMismatch {
        /// Name of the mismatched column.
        field: &'static str,
        /// Expected row count.
        expected: usize,
        /// Actual row count.
        got: usize,
    },

    /// Field construction failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Series construction failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}
