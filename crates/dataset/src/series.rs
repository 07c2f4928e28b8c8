//! Scalar series keyed by date.

use chrono::NaiveDate;

use crate::error::DatasetError;

/// A scalar series with its own ascending dates.
///
/// Used for every input that is joined onto the index by date.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DatedSeries {
    /// Creates a series, checking alignment and date order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::LengthMismatch`] or [`DatasetError::UnsortedDates`].
    pub fn new(
        name: &str,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        check_aligned(name, &dates, values.len())?;
        Ok(Self { dates, values })
    }

    /// Value on `date`, if the series has that date.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| self.values[i])
    }
}

pub(crate) fn check_aligned(
    name: &str,
    dates: &[NaiveDate],
    n_values: usize,
) -> Result<(), DatasetError> {
    if dates.len() != n_values {
        return Err(DatasetError::LengthMismatch {
            field: name.to_string(),
            expected: dates.len(),
            got: n_values,
        });
    }
    if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(DatasetError::UnsortedDates {
            field: name.to_string(),
            position: pos + 1,
        });
    }
    Ok(())
}
