//! # ttt-io
//!
//! File adapters for the TTT pipeline: NetCDF daily fields and long-term
//! means in, the OMI text index in, and the index and dataset CSV files out.
//! Everything returned is already validated by the `ttt-grid` and
//! `ttt-dataset` constructors.

mod csv_io;
mod error;
mod netcdf_read;
mod omi;
mod reader;

pub use csv_io::{
    DATASET_HEADER, INDEX_HEADER, IndexTable, NOISE_COLUMN, read_index_csv, write_dataset_csv,
    write_index_csv,
};
pub use error::IoError;
pub use omi::read_omi;
pub use reader::{FieldReaderConfig, read_climatology, read_field};
