//! Latitude/longitude axes shared by every field drawn from one source grid.

use crate::error::GridError;

/// The `(lat, lon)` axes of a gridded field.
///
/// Each axis is strictly monotonic; ascending and descending orders are both
/// accepted because reanalysis products commonly store latitude north to south.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl CoordinateGrid {
    /// Creates a grid from latitude and longitude axis values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyAxis`] or [`GridError::NonMonotonic`] if
    /// either axis is unusable.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, GridError> {
        check_axis("lat", &lats)?;
        check_axis("lon", &lons)?;
        Ok(Self { lats, lons })
    }

    /// Latitude axis values.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude axis values.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Grid shape as `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    /// Position of `lat` on the latitude axis (exact match).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateNotFound`] if `lat` is not on the axis.
    pub fn lat_index(&self, lat: f64) -> Result<usize, GridError> {
        exact_position("lat", &self.lats, lat)
    }

    /// Position of `lon` on the longitude axis (exact match).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateNotFound`] if `lon` is not on the axis.
    pub fn lon_index(&self, lon: f64) -> Result<usize, GridError> {
        exact_position("lon", &self.lons, lon)
    }

    /// Returns the sub-grid covering the given index ranges.
    ///
    /// # Panics
    ///
    /// Panics if either range is out of bounds.
    pub fn sub_grid(
        &self,
        lat_range: std::ops::Range<usize>,
        lon_range: std::ops::Range<usize>,
    ) -> Self {
        Self {
            lats: self.lats[lat_range].to_vec(),
            lons: self.lons[lon_range].to_vec(),
        }
    }
}

fn check_axis(axis: &'static str, values: &[f64]) -> Result<(), GridError> {
    if values.is_empty() {
        return Err(GridError::EmptyAxis { axis });
    }
    if values.len() < 2 {
        return Ok(());
    }
    let ascending = values[1] > values[0];
    for (i, pair) in values.windows(2).enumerate() {
        let ok = if ascending {
            pair[1] > pair[0]
        } else {
            pair[1] < pair[0]
        };
        if !ok {
            return Err(GridError::NonMonotonic {
                axis,
                position: i + 1,
            });
        }
    }
    Ok(())
}

fn exact_position(axis: &'static str, values: &[f64], target: f64) -> Result<usize, GridError> {
    values
        .iter()
        .position(|&v| v == target)
        .ok_or(GridError::CoordinateNotFound {
            axis,
            value: target,
        })
}
