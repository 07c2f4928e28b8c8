//! Joins the index, its event flags and the auxiliary series into rows.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use ttt_calendar::Doy;

use crate::error::DatasetError;
use crate::mjo::MjoIndex;
use crate::series::{DatedSeries, check_aligned};

/// One row of the predictor dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    /// Calendar date of the row.
    pub date: NaiveDate,
    /// Day of year, 1..=365, with Feb 29 folded onto Mar 1.
    pub doy: u16,
    /// TTT index value (never NaN).
    pub index_value: f64,
    /// 1 on event peak days, 0 otherwise.
    pub event: u8,
    /// MJO amplitude.
    pub mjo_amplitude: f64,
    /// MJO phase 1..=8, `None` if the components were missing.
    pub mjo_phase: Option<u8>,
    /// Predictor values in [`Dataset::predictor_names`] order.
    pub predictors: Vec<f64>,
    /// Uniform `[0, 100)` noise baseline, when requested.
    pub noise: Option<f64>,
}

/// The assembled dataset: predictor names plus rows in ascending date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    predictor_names: Vec<String>,
    records: Vec<DatasetRecord>,
    has_noise: bool,
}

impl Dataset {
    /// Predictor column names.
    pub fn predictor_names(&self) -> &[String] {
        &self.predictor_names
    }

    /// Rows, ascending by date.
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// `true` if rows carry the noise column.
    pub fn has_noise(&self) -> bool {
        self.has_noise
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builder that joins every input on the index dates.
///
/// # Example
///
/// ```ignore
/// let dataset = DatasetBuilder::new(dates, index, flags, mjo)?
///     .with_predictor("q850", q850)?
///     .with_noise_seed(42)
///     .assemble();
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    dates: Vec<NaiveDate>,
    index: Vec<f64>,
    flags: Vec<u8>,
    mjo: MjoIndex,
    predictors: Vec<(String, DatedSeries)>,
    noise_seed: Option<u64>,
}

impl DatasetBuilder {
    /// Starts a dataset from the index series, its event flags and the MJO index.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::LengthMismatch`] if `index` or `flags` is not
    /// aligned with `dates`, or [`DatasetError::UnsortedDates`].
    pub fn new(
        dates: Vec<NaiveDate>,
        index: Vec<f64>,
        flags: Vec<u8>,
        mjo: MjoIndex,
    ) -> Result<Self, DatasetError> {
        check_aligned("index", &dates, index.len())?;
        check_aligned("event flags", &dates, flags.len())?;
        Ok(Self {
            dates,
            index,
            flags,
            mjo,
            predictors: Vec::new(),
            noise_seed: None,
        })
    }

    /// Adds a named predictor column.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DuplicatePredictor`] if the name is taken.
    pub fn with_predictor(
        mut self,
        name: impl Into<String>,
        series: DatedSeries,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if self.predictors.iter().any(|(n, _)| *n == name) {
            return Err(DatasetError::DuplicatePredictor { name });
        }
        self.predictors.push((name, series));
        Ok(self)
    }

    /// Appends a seeded uniform `[0, 100)` noise column.
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    /// Joins every input by date.
    ///
    /// Rows are dropped when the index is NaN, or when the MJO index or a
    /// predictor has no value on that date.
    pub fn assemble(self) -> Dataset {
        let mut rng = self.noise_seed.map(StdRng::seed_from_u64);
        let mut records = Vec::with_capacity(self.dates.len());
        let mut n_no_index = 0usize;
        let mut unmatched: BTreeSet<&str> = BTreeSet::new();
        let mut n_unmatched = 0usize;

        'rows: for ((&date, &index_value), &event) in
            self.dates.iter().zip(&self.index).zip(&self.flags)
        {
            if index_value.is_nan() {
                n_no_index += 1;
                continue;
            }
            let Some((mjo_phase, mjo_amplitude)) = self.mjo.on(date) else {
                unmatched.insert("mjo");
                n_unmatched += 1;
                continue;
            };
            let mut predictors = Vec::with_capacity(self.predictors.len());
            for (name, series) in &self.predictors {
                match series.get(date) {
                    Some(v) => predictors.push(v),
                    None => {
                        unmatched.insert(name.as_str());
                        n_unmatched += 1;
                        continue 'rows;
                    }
                }
            }
            records.push(DatasetRecord {
                date,
                doy: Doy::fold(&date).get(),
                index_value,
                event,
                mjo_amplitude,
                mjo_phase,
                predictors,
                noise: rng.as_mut().map(|r| r.random_range(0.0..100.0)),
            });
        }

        if n_unmatched > 0 {
            debug!(
                n_unmatched,
                series = ?unmatched,
                "dropped rows without matching auxiliary data"
            );
        }
        info!(
            n_rows = records.len(),
            n_no_index,
            n_predictors = self.predictors.len(),
            "assembled dataset"
        );

        Dataset {
            predictor_names: self.predictors.into_iter().map(|(n, _)| n).collect(),
            records,
            has_noise: self.noise_seed.is_some(),
        }
    }
}
