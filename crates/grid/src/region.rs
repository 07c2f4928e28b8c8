//! Named lon/lat boxes and spatial box means.

use std::ops::Range;

use ndarray::{Axis, s};
use tracing::debug;
use ttt_stats::nan_mean;

use crate::coords::CoordinateGrid;
use crate::error::GridError;
use crate::field::TimestampedField;

/// A named rectangular region given as `(west, south, east, north)`.
///
/// Bounds must be exact members of the coordinate axes of the field they are
/// applied to. On each axis the cells between the two bound positions are
/// selected half-open in axis order: the bound met first is included, the
/// other is excluded. For a north-to-south latitude axis this keeps the
/// northern edge row and drops the southern one.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    name: String,
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    /// Creates a box from its bounds.
    pub fn new(name: impl Into<String>, west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: name.into(),
            west,
            south,
            east,
            north,
        }
    }

    /// Creates a box from a `[west, south, east, north]` array.
    pub fn from_bounds(name: impl Into<String>, bounds: [f64; 4]) -> Self {
        let [west, south, east, north] = bounds;
        Self::new(name, west, south, east, north)
    }

    /// Box name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bounds as `[west, south, east, north]`.
    pub fn bounds(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// Resolves the box to `(lat_range, lon_range)` index ranges on `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateNotFound`] if a bound is not on its
    /// axis, or [`GridError::EmptyBox`] if either range is empty.
    pub fn index_ranges(
        &self,
        grid: &CoordinateGrid,
    ) -> Result<(Range<usize>, Range<usize>), GridError> {
        let lat_range = ordered(grid.lat_index(self.north)?, grid.lat_index(self.south)?);
        let lon_range = ordered(grid.lon_index(self.west)?, grid.lon_index(self.east)?);
        if lat_range.is_empty() || lon_range.is_empty() {
            return Err(GridError::EmptyBox {
                name: self.name.clone(),
            });
        }
        Ok((lat_range, lon_range))
    }
}

fn ordered(a: usize, b: usize) -> Range<usize> {
    a.min(b)..a.max(b)
}

/// Mean over the box of every time step, skipping NaN cells.
///
/// A time step whose box cells are all NaN yields NaN.
///
/// # Errors
///
/// Returns the errors of [`BoundingBox::index_ranges`].
pub fn box_mean(field: &TimestampedField, bbox: &BoundingBox) -> Result<Vec<f64>, GridError> {
    let (lat_range, lon_range) = bbox.index_ranges(field.grid())?;
    debug!(
        name = bbox.name(),
        n_lat = lat_range.len(),
        n_lon = lon_range.len(),
        "reducing box"
    );
    let sub = field.data().slice(s![.., lat_range, lon_range]);
    Ok(sub
        .axis_iter(Axis(0))
        .map(|step| nan_mean(&step.iter().copied().collect::<Vec<_>>()))
        .collect())
}

/// Crops a field to the cells selected by `bbox`.
///
/// # Errors
///
/// Returns the errors of [`BoundingBox::index_ranges`].
pub fn crop(field: &TimestampedField, bbox: &BoundingBox) -> Result<TimestampedField, GridError> {
    let (lat_range, lon_range) = bbox.index_ranges(field.grid())?;
    let data = field
        .data()
        .slice(s![.., lat_range.clone(), lon_range.clone()])
        .to_owned();
    let grid = field.grid().sub_grid(lat_range, lon_range);
    Ok(TimestampedField::from_parts_unchecked(
        field.dates().to_vec(),
        data,
        grid,
    ))
}
