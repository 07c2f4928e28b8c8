//! # ttt-dataset
//!
//! Joins the TTT index and its event flags with MJO state and arbitrary
//! predictor series into one row per date.
//!
//! Rows with an undefined index are dropped, as are dates missing from any
//! auxiliary input. Each row carries the folded day of year, so Feb 29 and
//! Mar 1 share a value.

mod assemble;
mod error;
mod mjo;
mod series;

pub use assemble::{Dataset, DatasetBuilder, DatasetRecord};
pub use error::DatasetError;
pub use mjo::{MjoIndex, mjo_phase};
pub use series::DatedSeries;
