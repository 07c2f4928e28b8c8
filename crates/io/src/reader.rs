//! High-level NetCDF field reader configuration and orchestration.

use std::path::Path;

use ndarray::Array3;
use tracing::{debug, info};
use ttt_grid::{BoundingBox, Climatology, CoordinateGrid, NO_DATA_FLOOR, TimestampedField};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// FieldReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a daily `(time, lat, lon)` field from NetCDF.
///
/// Use the builder methods (`with_*`) to customise the data variable,
/// coordinate aliases and crop region. The [`Default`] implementation reads
/// NOAA interpolated OLR (`olr`, `lat`, `lon`, `time`).
#[derive(Debug, Clone)]
pub struct FieldReaderConfig {
    /// NetCDF variable holding the field.
    var: String,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// NetCDF variable name for the time axis.
    time_var: String,
    /// Optional region to keep; bounds must lie on the file's axes.
    crop: Option<BoundingBox>,
}

impl Default for FieldReaderConfig {
    fn default() -> Self {
        Self {
            var: "olr".into(),
            lon_aliases: vec!["lon".into(), "longitude".into()],
            lat_aliases: vec!["lat".into(), "latitude".into()],
            time_var: "time".into(),
            crop: None,
        }
    }
}

impl FieldReaderConfig {
    /// Set the data variable name.
    pub fn with_var(mut self, name: impl Into<String>) -> Self {
        self.var = name.into();
        self
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Restrict the read to `bbox`, or `None` for the whole grid.
    pub fn with_crop(mut self, bbox: Option<BoundingBox>) -> Self {
        self.crop = bbox;
        self
    }

    /// Data variable name.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Crop region, if any.
    pub fn crop(&self) -> Option<&BoundingBox> {
        self.crop.as_ref()
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] if the time variable name is empty
    /// and [`IoError::MissingVariable`] if the data variable name is empty.
    pub fn validate(&self, path: &Path) -> Result<(), IoError> {
        if self.var.is_empty() {
            return Err(IoError::MissingVariable {
                name: String::new(),
                path: path.to_path_buf(),
            });
        }
        if self.time_var.is_empty() {
            return Err(IoError::InvalidTime {
                reason: "time variable name is empty".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// read_field / read_climatology
// ---------------------------------------------------------------------------

/// Read a daily field from a NetCDF file.
///
/// The data variable must be laid out `(time, lat, lon)`. Packed values are
/// unpacked, fill values and anything below `-9999` become NaN, and the crop
/// region (if any) is applied while reading.
///
/// # Errors
///
/// Returns [`IoError`] on missing variables, dimension mismatches,
/// unparseable time axes, or coordinate/date invariant violations.
pub fn read_field(path: &Path, config: &FieldReaderConfig) -> Result<TimestampedField, IoError> {
    config.validate(path)?;
    let file = netcdf_read::open_file(path)?;

    let (grid, data) = read_grid_values(&file, config, path)?;

    let offsets = netcdf_read::read_1d_f64(&file, &[&config.time_var], path)?;
    let (unit, base) = netcdf_read::read_time_units(&file, &config.time_var, path)?;
    let dates = netcdf_read::time_offsets_to_dates(base, unit, &offsets)?;

    let field = TimestampedField::new(dates, data, grid)?.mask_sentinel();
    if let (Some(first), Some(last)) = (field.dates().first(), field.dates().last()) {
        info!(
            path = %path.display(),
            var = %config.var,
            n_days = field.n_timesteps(),
            %first,
            %last,
            "read field"
        );
    }
    Ok(field)
}

/// Read a precomputed 365-day long-term-mean file as a [`Climatology`].
///
/// The time axis is not decoded: its 365 entries are taken as slots 1..=365.
/// Returns the grid alongside so callers can check it against their data.
///
/// # Errors
///
/// Returns the errors of [`read_field`] except time decoding, plus
/// [`ttt_grid::GridError::SlotCount`] if the file does not hold 365 steps.
pub fn read_climatology(
    path: &Path,
    config: &FieldReaderConfig,
) -> Result<(CoordinateGrid, Climatology), IoError> {
    config.validate(path)?;
    let file = netcdf_read::open_file(path)?;
    let (grid, data) = read_grid_values(&file, config, path)?;
    let data = data.mapv_into(|v| if v < NO_DATA_FLOOR { f64::NAN } else { v });
    let clim = Climatology::from_long_term_mean(data)?;
    info!(path = %path.display(), var = %config.var, "read long-term mean");
    Ok((grid, clim))
}

/// Read the coordinate axes and the (possibly cropped) data variable.
fn read_grid_values(
    file: &netcdf::File,
    config: &FieldReaderConfig,
    path: &Path,
) -> Result<(CoordinateGrid, Array3<f64>), IoError> {
    let lon_alias_refs: Vec<&str> = config.lon_aliases.iter().map(String::as_str).collect();
    let lat_alias_refs: Vec<&str> = config.lat_aliases.iter().map(String::as_str).collect();

    let lons = netcdf_read::read_1d_f64(file, &lon_alias_refs, path)?;
    let lats = netcdf_read::read_1d_f64(file, &lat_alias_refs, path)?;
    let full = CoordinateGrid::new(lats, lons)?;
    let (ny, nx) = full.shape();

    let (lat_range, lon_range) = match &config.crop {
        Some(bbox) => bbox.index_ranges(&full)?,
        None => (0..ny, 0..nx),
    };
    debug!(
        var = %config.var,
        lat = ?lat_range,
        lon = ?lon_range,
        "reading hyperslab"
    );

    let data = netcdf_read::read_3d_f64(
        file,
        &config.var,
        (ny, nx),
        lat_range.clone(),
        lon_range.clone(),
        path,
    )?;
    Ok((full.sub_grid(lat_range, lon_range), data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
