//! Low-level NetCDF extraction helpers.

use std::ops::Range;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use ndarray::Array3;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read the `[.., lat_range, lon_range]` hyperslab of a 3-D `(time, lat, lon)`
/// variable with packing and fill values decoded.
///
/// `scale_factor` and `add_offset` are applied when present; raw values equal
/// to `_FillValue` or `missing_value` become NaN.
pub(crate) fn read_3d_f64(
    file: &netcdf::File,
    var_name: &str,
    shape: (usize, usize),
    lat_range: Range<usize>,
    lon_range: Range<usize>,
    path: &Path,
) -> Result<Array3<f64>, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} dimensions"),
            expected: 3,
            got: dims.len(),
        });
    }
    let (ny, nx) = shape;
    if dims[1].len() != ny {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} lat"),
            expected: ny,
            got: dims[1].len(),
        });
    }
    if dims[2].len() != nx {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} lon"),
            expected: nx,
            got: dims[2].len(),
        });
    }
    let nt = dims[0].len();

    let scale = f64_attribute(&var, "scale_factor").unwrap_or(1.0);
    let offset = f64_attribute(&var, "add_offset").unwrap_or(0.0);
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| f64_attribute(&var, name))
        .collect();

    let sub_shape = (nt, lat_range.len(), lon_range.len());
    let raw = var.get_values::<f64, _>((.., lat_range, lon_range))?;
    let decoded: Vec<f64> = raw
        .into_iter()
        .map(|v| {
            if fills.contains(&v) {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect();

    Array3::from_shape_vec(sub_shape, decoded).map_err(|e| IoError::Netcdf {
        reason: format!("{var_name}: {e}"),
    })
}

/// Read a numeric scalar attribute as `f64`, if present.
fn f64_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// Unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "s" => Some(Self::Seconds),
            "minutes" | "minute" | "min" => Some(Self::Minutes),
            "hours" | "hour" | "h" => Some(Self::Hours),
            "days" | "day" | "d" => Some(Self::Days),
            _ => None,
        }
    }

    fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86_400.0,
        }
    }
}

/// Parse a CF units string like `"hours since 1800-01-01 00:00:0.0"`.
///
/// Only the date of the reference time is used; every time axis read here is
/// daily and stamped at or after midnight.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeUnit, NaiveDate), IoError> {
    let mut parts = units.split_whitespace();
    let (Some(unit), Some("since"), Some(reference)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    };
    let unit = TimeUnit::parse(unit).ok_or_else(|| IoError::InvalidTime {
        reason: format!("unsupported time unit '{unit}'"),
    })?;

    let date_str = reference.split('T').next().unwrap_or(reference);
    let base = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        IoError::InvalidTime {
            reason: format!("failed to parse base date '{date_str}': {e}"),
        }
    })?;
    Ok((unit, base))
}

/// Read the `units` and optional `calendar` attributes of a time variable.
///
/// Only Gregorian calendars are accepted.
pub(crate) fn read_time_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<(TimeUnit, NaiveDate), IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;

    let calendar = var
        .attribute_value("calendar")
        .and_then(|res| res.ok())
        .and_then(|av| match av {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| "standard".to_string());
    if !matches!(
        calendar.to_ascii_lowercase().as_str(),
        "standard" | "gregorian" | "proleptic_gregorian"
    ) {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported calendar '{calendar}'"),
        });
    }

    parse_time_units(&units)
}

/// Convert offsets from `base` in `unit` into calendar dates.
///
/// Offsets are truncated to whole seconds and the time of day is dropped.
pub(crate) fn time_offsets_to_dates(
    base: NaiveDate,
    unit: TimeUnit,
    offsets: &[f64],
) -> Result<Vec<NaiveDate>, IoError> {
    let midnight = base.and_time(chrono::NaiveTime::MIN);
    offsets
        .iter()
        .map(|&offset| {
            let secs = offset * unit.seconds();
            if !secs.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            TimeDelta::try_seconds(secs.floor() as i64)
                .and_then(|d| midnight.checked_add_signed(d))
                .map(|dt| dt.date())
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("date overflow adding {offset} to {base}"),
                })
        })
        .collect()
}
