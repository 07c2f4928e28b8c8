//! Timestamped daily gridded fields.

use chrono::NaiveDate;
use ndarray::{Array3, ArrayView2, Axis};
use tracing::debug;
use ttt_calendar::Season;

use crate::coords::CoordinateGrid;
use crate::error::GridError;

/// Values strictly below this floor are treated as missing in raw inputs.
pub const NO_DATA_FLOOR: f64 = -9999.0;

/// An ordered daily sequence of `(lat, lon)` grids.
///
/// Data is stored as a `(time, lat, lon)` array. Missing cells are NaN.
///
/// Invariants (checked at construction):
/// - `dates.len()` equals the time dimension,
/// - the `(lat, lon)` shape equals the coordinate grid shape,
/// - dates are strictly ascending.
#[derive(Debug, Clone)]
pub struct TimestampedField {
    dates: Vec<NaiveDate>,
    data: Array3<f64>,
    grid: CoordinateGrid,
}

impl TimestampedField {
    /// Creates a field, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LengthMismatch`], [`GridError::ShapeMismatch`] or
    /// [`GridError::UnsortedDates`] if the inputs are inconsistent.
    pub fn new(
        dates: Vec<NaiveDate>,
        data: Array3<f64>,
        grid: CoordinateGrid,
    ) -> Result<Self, GridError> {
        let (nt, ny, nx) = data.dim();
        if dates.len() != nt {
            return Err(GridError::LengthMismatch {
                field: "dates",
                expected: nt,
                got: dates.len(),
            });
        }
        if grid.shape() != (ny, nx) {
            return Err(GridError::ShapeMismatch {
                field: "data",
                expected: grid.shape(),
                got: (ny, nx),
            });
        }
        if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::UnsortedDates { position: pos + 1 });
        }
        Ok(Self { dates, data, grid })
    }

    /// Returns a copy with every value below `floor` replaced by NaN.
    ///
    /// The source field is left untouched.
    pub fn mask_below(&self, floor: f64) -> Self {
        let mut n_masked = 0usize;
        let data = self.data.mapv(|v| {
            if v < floor {
                n_masked += 1;
                f64::NAN
            } else {
                v
            }
        });
        debug!(floor, n_masked, "masked sentinel values");
        Self {
            dates: self.dates.clone(),
            data,
            grid: self.grid.clone(),
        }
    }

    /// Returns a copy with the standard `-9999` sentinel masked.
    pub fn mask_sentinel(&self) -> Self {
        self.mask_below(NO_DATA_FLOOR)
    }

    /// Returns the time steps whose dates fall in `season`.
    pub fn in_season(&self, season: Season) -> Self {
        let keep: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| season.contains(*d))
            .map(|(i, _)| i)
            .collect();
        debug!(n_kept = keep.len(), n_total = self.dates.len(), "season selection");
        Self {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            data: self.data.select(Axis(0), &keep),
            grid: self.grid.clone(),
        }
    }

    /// Timestamps, one per time step.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The `(time, lat, lon)` data array.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Coordinate axes.
    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    /// Number of time steps.
    pub fn n_timesteps(&self) -> usize {
        self.dates.len()
    }

    /// The grid at time step `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_timesteps()`.
    pub fn grid_at(&self, t: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), t)
    }

    /// Iterates `(date, grid)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, ArrayView2<'_, f64>)> {
        self.dates
            .iter()
            .copied()
            .zip(self.data.axis_iter(Axis(0)))
    }

    /// Rebuilds a field with new data on the same dates and grid.
    pub(crate) fn with_data(&self, data: Array3<f64>) -> Self {
        Self {
            dates: self.dates.clone(),
            data,
            grid: self.grid.clone(),
        }
    }

    pub(crate) fn from_parts_unchecked(
        dates: Vec<NaiveDate>,
        data: Array3<f64>,
        grid: CoordinateGrid,
    ) -> Self {
        Self { dates, data, grid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    fn grid() -> CoordinateGrid {
        CoordinateGrid::new(vec![0.0, -2.5], vec![10.0, 12.5, 15.0]).unwrap()
    }

    #[test]
    fn in_season_keeps_matching_steps() {
        // Jan 1 .. Jun 30 2000
        let d = dates(182);
        let data = Array3::from_shape_fn((182, 2, 3), |(t, _, _)| t as f64);
        let f = TimestampedField::new(d, data, grid()).unwrap();
        let june_only = Season::from_months(&[6]).unwrap();
        let june = f.in_season(june_only);
        assert_eq!(june.n_timesteps(), 30);
        assert_eq!(june.dates()[0], NaiveDate::from_ymd_opt(2000, 6, 1).unwrap());
        assert_eq!(june.grid_at(0)[[1, 2]], 152.0);
    }

    #[test]
    fn new_valid() {
        let f = TimestampedField::new(dates(4), Array3::zeros((4, 2, 3)), grid()).unwrap();
        assert_eq!(f.n_timesteps(), 4);
        assert_eq!(f.grid_at(3).dim(), (2, 3));
    }

    #[test]
    fn new_rejects_date_count() {
        let err = TimestampedField::new(dates(3), Array3::zeros((4, 2, 3)), grid()).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                field: "dates",
                expected: 4,
                got: 3,
            }
        );
    }

    #[test]
    fn new_rejects_shape() {
        let err = TimestampedField::new(dates(4), Array3::zeros((4, 3, 2)), grid()).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { .. }));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let mut d = dates(3);
        d[2] = d[1];
        let err = TimestampedField::new(d, Array3::zeros((3, 2, 3)), grid()).unwrap_err();
        assert_eq!(err, GridError::UnsortedDates { position: 2 });
    }

    #[test]
    fn mask_is_pure() {
        let mut data = Array3::from_elem((1, 2, 3), 250.0);
        data[[0, 1, 2]] = -9999.5;
        data[[0, 0, 0]] = -9999.0;
        let raw = TimestampedField::new(dates(1), data, grid()).unwrap();
        let masked = raw.mask_sentinel();

        assert!(masked.data()[[0, 1, 2]].is_nan());
        // Exactly the floor is still valid.
        assert_eq!(masked.data()[[0, 0, 0]], -9999.0);
        // Source keeps its sentinel.
        assert_eq!(raw.data()[[0, 1, 2]], -9999.5);
    }
}
