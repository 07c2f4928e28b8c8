//! Day-of-year climatology construction and anomaly calculation.

use ndarray::{Array3, ArrayView2, Axis, Zip};
use tracing::{debug, warn};
use ttt_calendar::{Doy, N_SLOTS, Season};

use crate::error::GridError;
use crate::field::TimestampedField;

/// Mean grid for each of the 365 reference day-of-year slots.
///
/// Built once, read-only afterwards. Each slot remembers how many time steps
/// folded into it; looking up a slot that received none is an error.
#[derive(Debug, Clone)]
pub struct Climatology {
    means: Array3<f64>,
    slot_counts: Vec<usize>,
}

impl Climatology {
    /// Builds a climatology from every time step of `field`.
    pub fn build(field: &TimestampedField) -> Self {
        Self::build_in_season(field, Season::all_year())
    }

    /// Builds a climatology from the time steps whose month lies in `season`.
    ///
    /// Slots outside the season stay empty.
    pub fn build_in_season(field: &TimestampedField, season: Season) -> Self {
        let (ny, nx) = field.grid().shape();
        let mut builder = ClimatologyBuilder::new(ny, nx);
        for (date, grid) in field.iter() {
            if season.contains(&date) {
                builder.add(Doy::fold(&date), grid);
            }
        }
        let clim = builder.finish();
        let n_empty = clim.empty_slots().len();
        if n_empty > 0 && season == Season::all_year() {
            warn!(n_empty, "climatology has slots without data");
        } else {
            debug!(n_empty, months = ?season.months(), "built climatology");
        }
        clim
    }

    /// Wraps a precomputed `(365, lat, lon)` long-term mean.
    ///
    /// Every slot is treated as populated.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SlotCount`] if the first axis is not 365 long.
    pub fn from_long_term_mean(means: Array3<f64>) -> Result<Self, GridError> {
        let n = means.len_of(Axis(0));
        if n != N_SLOTS {
            return Err(GridError::SlotCount { got: n });
        }
        Ok(Self {
            means,
            slot_counts: vec![1; N_SLOTS],
        })
    }

    /// Grid shape as `(n_lat, n_lon)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        let (_, ny, nx) = self.means.dim();
        (ny, nx)
    }

    /// The full `(365, lat, lon)` mean array. Empty slots are NaN.
    pub fn means(&self) -> &Array3<f64> {
        &self.means
    }

    /// Number of time steps that contributed to each slot.
    pub fn slot_counts(&self) -> &[usize] {
        &self.slot_counts
    }

    /// The mean grid for `doy`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptySlot`] if no time step folded into `doy`.
    pub fn slot(&self, doy: Doy) -> Result<ArrayView2<'_, f64>, GridError> {
        if self.slot_counts[doy.index()] == 0 {
            return Err(GridError::EmptySlot { doy: doy.get() });
        }
        Ok(self.means.index_axis(Axis(0), doy.index()))
    }

    /// Days of year whose slot received no data.
    pub fn empty_slots(&self) -> Vec<u16> {
        self.slot_counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(|(i, _)| i as u16 + 1)
            .collect()
    }

    /// `true` if every slot received at least one time step.
    pub fn is_complete(&self) -> bool {
        self.slot_counts.iter().all(|&c| c > 0)
    }

    /// Subtracts the matching slot from every time step of `field`.
    ///
    /// NaN in either operand yields NaN.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the grids differ, or
    /// [`GridError::EmptySlot`] if a date folds into an empty slot. Both are
    /// checked before any subtraction.
    pub fn anomalies(&self, field: &TimestampedField) -> Result<TimestampedField, GridError> {
        if self.grid_shape() != field.grid().shape() {
            return Err(GridError::ShapeMismatch {
                field: "climatology",
                expected: field.grid().shape(),
                got: self.grid_shape(),
            });
        }
        let slots: Vec<Doy> = field.dates().iter().map(Doy::fold).collect();
        if let Some(doy) = slots.iter().find(|d| self.slot_counts[d.index()] == 0) {
            return Err(GridError::EmptySlot { doy: doy.get() });
        }

        let mut out = field.data().clone();
        for (mut step, doy) in out.axis_iter_mut(Axis(0)).zip(&slots) {
            let clim = self.means.index_axis(Axis(0), doy.index());
            step -= &clim;
        }
        debug!(n_timesteps = slots.len(), "computed anomalies");
        Ok(field.with_data(out))
    }
}

/// Single-writer accumulator for a [`Climatology`].
///
/// NaN cells are skipped per cell, so a missing value in one grid never
/// removes the rest of that grid from the mean.
#[derive(Debug)]
pub struct ClimatologyBuilder {
    sums: Array3<f64>,
    counts: Array3<u32>,
    slot_counts: Vec<usize>,
}

impl ClimatologyBuilder {
    /// Creates an empty accumulator for `(n_lat, n_lon)` grids.
    pub fn new(n_lat: usize, n_lon: usize) -> Self {
        Self {
            sums: Array3::zeros((N_SLOTS, n_lat, n_lon)),
            counts: Array3::zeros((N_SLOTS, n_lat, n_lon)),
            slot_counts: vec![0; N_SLOTS],
        }
    }

    /// Adds one grid to the slot for `doy`.
    ///
    /// # Panics
    ///
    /// Panics if `grid` does not have the shape given to [`ClimatologyBuilder::new`].
    pub fn add(&mut self, doy: Doy, grid: ArrayView2<'_, f64>) {
        let i = doy.index();
        let sums = self.sums.index_axis_mut(Axis(0), i);
        let counts = self.counts.index_axis_mut(Axis(0), i);
        Zip::from(sums)
            .and(counts)
            .and(&grid)
            .for_each(|s, c, &v| {
                if !v.is_nan() {
                    *s += v;
                    *c += 1;
                }
            });
        self.slot_counts[i] += 1;
    }

    /// Divides the accumulated sums. Cells without contributions become NaN.
    pub fn finish(self) -> Climatology {
        let mut means = self.sums;
        Zip::from(&mut means).and(&self.counts).for_each(|m, &c| {
            *m = if c == 0 { f64::NAN } else { *m / f64::from(c) };
        });
        Climatology {
            means,
            slot_counts: self.slot_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::Array2;

    use super::*;
    use crate::coords::CoordinateGrid;

    fn constant_grid(n_lat: usize, n_lon: usize, value: f64) -> Array2<f64> {
        Array2::from_elem((n_lat, n_lon), value)
    }

    fn field(start: NaiveDate, n: usize, value: impl Fn(usize) -> f64) -> TimestampedField {
        let dates: Vec<NaiveDate> = start.iter_days().take(n).collect();
        let data = Array3::from_shape_fn((n, 2, 2), |(t, _, _)| value(t));
        let grid = CoordinateGrid::new(vec![0.0, -1.0], vec![0.0, 1.0]).unwrap();
        TimestampedField::new(dates, data, grid).unwrap()
    }

    #[test]
    fn builder_skips_nan_per_cell() {
        let mut b = ClimatologyBuilder::new(1, 2);
        let doy = Doy::new(10).unwrap();
        let mut g = constant_grid(1, 2, 4.0);
        b.add(doy, g.view());
        g[[0, 1]] = f64::NAN;
        g[[0, 0]] = 2.0;
        b.add(doy, g.view());
        let c = b.finish();

        let slot = c.slot(doy).unwrap();
        assert_relative_eq!(slot[[0, 0]], 3.0);
        assert_relative_eq!(slot[[0, 1]], 4.0);
        assert_eq!(c.slot_counts()[9], 2);
    }

    #[test]
    fn cell_with_no_valid_values_is_nan() {
        let mut b = ClimatologyBuilder::new(1, 1);
        let doy = Doy::new(1).unwrap();
        b.add(doy, constant_grid(1, 1, f64::NAN).view());
        let c = b.finish();
        assert!(c.slot(doy).unwrap()[[0, 0]].is_nan());
    }

    #[test]
    fn empty_slot_lookup_fails() {
        let c = ClimatologyBuilder::new(1, 1).finish();
        assert!(!c.is_complete());
        assert_eq!(c.empty_slots().len(), 365);
        assert_eq!(
            c.slot(Doy::new(5).unwrap()).unwrap_err(),
            GridError::EmptySlot { doy: 5 }
        );
    }

    #[test]
    fn leap_day_contributes_to_march_first() {
        // 2004-02-28 .. 2004-03-01: three dates, two slots.
        let f = field(NaiveDate::from_ymd_opt(2004, 2, 28).unwrap(), 3, |t| t as f64);
        let c = Climatology::build(&f);
        let mar1 = Doy::from_month_day(3, 1).unwrap();
        assert_eq!(c.slot_counts()[mar1.index()], 2);
        // Feb 29 = 1.0, Mar 1 = 2.0
        assert_relative_eq!(c.slot(mar1).unwrap()[[0, 0]], 1.5);
    }

    #[test]
    fn seasonal_build_leaves_winter_empty() {
        let f = field(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 365, |_| 1.0);
        let c = Climatology::build_in_season(&f, Season::austral_summer());
        let july = Doy::from_month_day(7, 1).unwrap();
        assert!(c.slot(july).is_err());
        assert!(c.slot(Doy::from_month_day(1, 1).unwrap()).is_ok());
        assert_eq!(c.empty_slots().len(), 365 - 243);
    }

    #[test]
    fn anomalies_reject_empty_slot_before_computing() {
        let f = field(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 365, |_| 1.0);
        let c = Climatology::build_in_season(&f, Season::austral_summer());
        let err = c.anomalies(&f).unwrap_err();
        assert!(matches!(err, GridError::EmptySlot { .. }));
    }

    #[test]
    fn anomalies_reject_shape_mismatch() {
        let f = field(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 365, |_| 1.0);
        let c = Climatology::from_long_term_mean(Array3::zeros((365, 3, 3))).unwrap();
        assert!(matches!(
            c.anomalies(&f).unwrap_err(),
            GridError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn long_term_mean_requires_365_slots() {
        assert_eq!(
            Climatology::from_long_term_mean(Array3::zeros((366, 1, 1))).unwrap_err(),
            GridError::SlotCount { got: 366 }
        );
    }

    #[test]
    fn anomalies_propagate_nan() {
        let f = field(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 365, |t| t as f64);
        let c = Climatology::build(&f);
        let mut data = f.data().clone();
        data[[3, 1, 1]] = f64::NAN;
        let g = TimestampedField::new(f.dates().to_vec(), data, f.grid().clone()).unwrap();
        let a = c.anomalies(&g).unwrap();
        assert!(a.data()[[3, 1, 1]].is_nan());
        assert_relative_eq!(a.data()[[3, 0, 0]], 0.0);
    }
}
