//! Day-of-year newtype and leap-day folding onto the 365-slot reference year.

use chrono::Datelike;

use crate::error::CalendarError;

/// Number of reference day-of-year slots.
pub const N_SLOTS: usize = 365;

/// Day-of-year in the 365-day reference year (1..=365).
///
/// Every Gregorian date maps onto exactly one `Doy` through [`Doy::fold`];
/// Feb 29 shares its slot with Mar 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(u16);

/// Number of days in each month (index 0 unused, index 1 = January, ..., index 12 = December).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Day-of-year on which each month starts (index 0 unused, index 1 = January starts at DOY 1, ...).
pub(crate) const MONTH_START_DOY: [u16; 13] =
    [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

impl Doy {
    /// Creates a new `Doy` from a day-of-year value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `doy` is not in 1..=365.
    pub fn new(doy: u16) -> Result<Self, CalendarError> {
        if !(1..=365).contains(&doy) {
            return Err(CalendarError::InvalidDoy { doy });
        }
        Ok(Self(doy))
    }

    /// Creates a new `Doy` from a (month, day) pair in the reference year.
    ///
    /// Feb 29 is rejected here; use [`Doy::fold`] for real calendar dates.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    /// Returns [`CalendarError::InvalidDay`] if `day` is not valid for the given month.
    pub fn from_month_day(month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        let max_day = DAYS_PER_MONTH[month as usize];
        if !(1..=max_day).contains(&day) {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        Ok(Self(MONTH_START_DOY[month as usize] + day as u16 - 1))
    }

    /// Folds any calendar date onto its reference slot.
    ///
    /// Feb 29 is folded forward onto Mar 1, so leap and non-leap years both
    /// cover exactly 365 slots.
    pub fn fold<D: Datelike>(date: &D) -> Self {
        let month = date.month() as usize;
        let day = date.day() as u16;
        if month == 2 && day == 29 {
            return Self(MONTH_START_DOY[3]);
        }
        Self(MONTH_START_DOY[month] + day - 1)
    }

    /// Returns the inner day-of-year value (1..=365).
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based slot suitable for array indexing (0..=364).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the `(month, day)` pair for this day-of-year.
    pub fn month_day(self) -> (u8, u8) {
        let month = (1..=12u8)
            .rev()
            .find(|&m| MONTH_START_DOY[m as usize] <= self.0)
            .unwrap_or(1);
        let day = (self.0 - MONTH_START_DOY[month as usize] + 1) as u8;
        (month, day)
    }
}

/// Shorthand for `Doy::fold(date).index()`.
pub fn slot<D: Datelike>(date: &D) -> usize {
    Doy::fold(date).index()
}
