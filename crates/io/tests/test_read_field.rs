//! Integration tests for reading NetCDF fields and long-term means.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use chrono::NaiveDate;
use tempfile::tempdir;
use ttt_grid::{BoundingBox, GridError};
use ttt_io::{FieldReaderConfig, IoError, read_climatology, read_field};

// ---------------------------------------------------------------------------
// Helper: programmatic NetCDF fixture builder
// ---------------------------------------------------------------------------

/// A minimal `(time, lat, lon)` file with NOAA-style packing.
struct Fixture {
    nt: usize,
    lats: Vec<f64>,
    lons: Vec<f64>,
    lat_name: &'static str,
    lon_name: &'static str,
    units: String,
    calendar: Option<&'static str>,
    /// Packed values in `[t, lat, lon]` order.
    packed: Vec<i16>,
    scale_factor: f32,
    add_offset: f32,
    fill_value: Option<i16>,
}

impl Fixture {
    /// Descending latitude, ascending longitude, values `t*100 + y*10 + x`.
    fn new(nt: usize) -> Self {
        let lats = vec![10.0, 7.5, 5.0, 2.5];
        let lons = vec![0.0, 2.5, 5.0];
        let packed = (0..nt)
            .flat_map(|t| (0..4).flat_map(move |y| (0..3).map(move |x| (t * 100 + y * 10 + x) as i16)))
            .collect();
        Self {
            nt,
            lats,
            lons,
            lat_name: "lat",
            lon_name: "lon",
            units: "hours since 1800-01-01 00:00:0.0".into(),
            calendar: Some("standard"),
            packed,
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
        }
    }

    fn value_index(&self, t: usize, y: usize, x: usize) -> usize {
        (t * self.lats.len() + y) * self.lons.len() + x
    }

    fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("field.nc");
        let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

        file.add_dimension("time", self.nt).expect("add dim time");
        file.add_dimension(self.lat_name, self.lats.len())
            .expect("add dim lat");
        file.add_dimension(self.lon_name, self.lons.len())
            .expect("add dim lon");

        {
            let mut var = file
                .add_variable::<f64>(self.lat_name, &[self.lat_name])
                .expect("add var lat");
            var.put_values(&self.lats, ..).expect("put lat values");
        }
        {
            let mut var = file
                .add_variable::<f64>(self.lon_name, &[self.lon_name])
                .expect("add var lon");
            var.put_values(&self.lons, ..).expect("put lon values");
        }
        {
            // Daily steps starting 1979-01-01, which is 1569072 hours after 1800-01-01.
            let time_vals: Vec<f64> = (0..self.nt)
                .map(|t| 1_569_072.0 + 24.0 * t as f64)
                .collect();
            let mut var = file
                .add_variable::<f64>("time", &["time"])
                .expect("add var time");
            var.put_values(&time_vals, ..).expect("put time values");
            var.put_attribute("units", self.units.as_str())
                .expect("add time units");
            if let Some(cal) = self.calendar {
                var.put_attribute("calendar", cal).expect("add calendar");
            }
        }
        {
            let mut var = file
                .add_variable::<i16>("olr", &["time", self.lat_name, self.lon_name])
                .expect("add var olr");
            var.put_attribute("scale_factor", self.scale_factor)
                .expect("add scale_factor");
            var.put_attribute("add_offset", self.add_offset)
                .expect("add add_offset");
            if let Some(fv) = self.fill_value {
                var.put_attribute("_FillValue", fv).expect("add _FillValue");
            }
            var.put_values(&self.packed, ..).expect("put olr values");
        }

        path
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn reads_dates_axes_and_values() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(3).write(dir.path());

    let field = read_field(&path, &FieldReaderConfig::default()).unwrap();
    assert_eq!(field.dates(), &[ymd(1979, 1, 1), ymd(1979, 1, 2), ymd(1979, 1, 3)]);
    assert_eq!(field.grid().lats(), &[10.0, 7.5, 5.0, 2.5]);
    assert_eq!(field.grid().lons(), &[0.0, 2.5, 5.0]);
    assert_relative_eq!(field.data()[[2, 3, 1]], 231.0);
}

#[test]
fn unpacks_scale_and_offset() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(1);
    fx.scale_factor = 0.5;
    fx.add_offset = 100.0;
    let path = fx.write(dir.path());

    let field = read_field(&path, &FieldReaderConfig::default()).unwrap();
    // Packed 12 -> 12 * 0.5 + 100.
    assert_relative_eq!(field.data()[[0, 1, 2]], 106.0);
}

#[test]
fn fill_and_sentinel_values_become_nan() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(2);
    fx.fill_value = Some(i16::MAX);
    let fill_at = fx.value_index(0, 0, 0);
    fx.packed[fill_at] = i16::MAX;
    // Unpacked to -10000, below the -9999 floor.
    fx.add_offset = -10_000.0;
    let path = fx.write(dir.path());

    let field = read_field(&path, &FieldReaderConfig::default()).unwrap();
    assert!(field.data()[[0, 0, 0]].is_nan());
    // Packed 1 -> -9999, kept.
    assert_relative_eq!(field.data()[[0, 0, 1]], -9999.0);
    // Packed 0 at t=0 is the fill position; t=1 packed 100 -> -9900.
    assert_relative_eq!(field.data()[[1, 0, 0]], -9900.0);
    assert_eq!(field.data().iter().filter(|v| v.is_nan()).count(), 1);
}

#[test]
fn sentinel_below_floor_masked() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(1);
    fx.add_offset = -10_000.0;
    let path = fx.write(dir.path());

    let field = read_field(&path, &FieldReaderConfig::default()).unwrap();
    // Packed 0 -> -10000 < -9999.
    assert!(field.data()[[0, 0, 0]].is_nan());
    assert!(!field.data()[[0, 0, 1]].is_nan());
}

#[test]
fn crop_reads_only_the_box() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(2).write(dir.path());

    let cfg = FieldReaderConfig::default().with_crop(Some(BoundingBox::new(
        "crop", 2.5, 2.5, 5.0, 7.5,
    )));
    let field = read_field(&path, &cfg).unwrap();
    // lat 7.5 included, 2.5 excluded; lon 2.5 included, 5.0 excluded.
    assert_eq!(field.grid().lats(), &[7.5, 5.0]);
    assert_eq!(field.grid().lons(), &[2.5]);
    assert_eq!(field.data().dim(), (2, 2, 1));
    assert_relative_eq!(field.data()[[1, 1, 0]], 121.0);
}

#[test]
fn crop_bound_off_grid_fails() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(1).write(dir.path());

    let cfg = FieldReaderConfig::default().with_crop(Some(BoundingBox::new(
        "crop", 1.0, 2.5, 5.0, 7.5,
    )));
    let err = read_field(&path, &cfg).unwrap_err();
    assert!(matches!(
        err,
        IoError::Grid(GridError::CoordinateNotFound { axis: "lon", .. })
    ));
}

#[test]
fn latitude_longitude_aliases() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(1);
    fx.lat_name = "latitude";
    fx.lon_name = "longitude";
    fx.units = "days since 1979-01-01".into();
    fx.calendar = None;
    let path = fx.write(dir.path());

    let field = read_field(&path, &FieldReaderConfig::default()).unwrap();
    assert_eq!(field.grid().shape(), (4, 3));
}

#[test]
fn non_gregorian_calendar_rejected() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(1);
    fx.calendar = Some("noleap");
    let path = fx.write(dir.path());

    let err = read_field(&path, &FieldReaderConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::InvalidTime { .. }));
}

#[test]
fn missing_variable_reported() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(1).write(dir.path());

    let err = read_field(&path, &FieldReaderConfig::default().with_var("q")).unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "q"));
}

#[test]
fn long_term_mean_needs_365_steps() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(10).write(dir.path());

    let err = read_climatology(&path, &FieldReaderConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::Grid(GridError::SlotCount { got: 10 })));
}

#[test]
fn long_term_mean_slots() {
    let dir = tempdir().unwrap();
    let mut fx = Fixture::new(365);
    // Keep packed values within i16 range.
    fx.packed = (0..365 * 12).map(|i| (i / 12) as i16).collect();
    let path = fx.write(dir.path());

    let (grid, clim) = read_climatology(&path, &FieldReaderConfig::default()).unwrap();
    assert_eq!(grid.shape(), (4, 3));
    assert!(clim.is_complete());
    let doy = ttt_calendar::Doy::new(60).unwrap();
    assert_relative_eq!(clim.slot(doy).unwrap()[[2, 1]], 59.0);
}
