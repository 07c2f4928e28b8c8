//! In-season mean and standard deviation of an index series.

use chrono::NaiveDate;
use ttt_calendar::Season;
use ttt_stats::masked_mean_std;

use crate::error::IndexError;

/// Mean and population standard deviation of the in-season, non-NaN values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalStats {
    /// Mean of the qualifying values (NaN if none).
    pub mean: f64,
    /// Population standard deviation of the qualifying values (NaN if none).
    pub std: f64,
}

impl SeasonalStats {
    /// The exceedance threshold `mean + k * std`.
    pub fn threshold(&self, k: f64) -> f64 {
        self.mean + k * self.std
    }
}

/// Computes [`SeasonalStats`] over the days of `index` that fall in `season`.
///
/// # Errors
///
/// Returns [`IndexError::LengthMismatch`] if `dates` is not aligned with `index`.
pub fn seasonal_stats(
    index: &[f64],
    dates: &[NaiveDate],
    season: Season,
) -> Result<SeasonalStats, IndexError> {
    if index.len() != dates.len() {
        return Err(IndexError::LengthMismatch {
            field: "dates".into(),
            expected: index.len(),
            got: dates.len(),
        });
    }
    let (mean, std) = masked_mean_std(index, |i| season.contains(&dates[i]));
    Ok(SeasonalStats { mean, std })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn excludes_winter_and_nan() {
        let dates = [
            ymd(2001, 1, 1),
            ymd(2001, 7, 1),
            ymd(2001, 10, 1),
            ymd(2001, 11, 1),
        ];
        let index = [1.0, 1000.0, 3.0, f64::NAN];
        let s = seasonal_stats(&index, &dates, Season::austral_summer()).unwrap();
        assert_relative_eq!(s.mean, 2.0);
        assert_relative_eq!(s.std, 1.0);
        assert_relative_eq!(s.threshold(2.0), 4.0);
    }

    #[test]
    fn nothing_in_season_is_nan() {
        let s = seasonal_stats(&[1.0], &[ymd(2001, 8, 1)], Season::austral_summer()).unwrap();
        assert!(s.mean.is_nan());
        assert!(s.std.is_nan());
    }

    #[test]
    fn misaligned_dates() {
        let err = seasonal_stats(&[1.0, 2.0], &[ymd(2001, 1, 1)], Season::all_year()).unwrap_err();
        assert!(matches!(err, IndexError::LengthMismatch { .. }));
    }
}
