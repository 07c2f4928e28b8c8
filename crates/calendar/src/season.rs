//! Month-set season windows.

use chrono::Datelike;

use crate::error::CalendarError;

/// A set of calendar months treated as "in season".
///
/// Stored as a bitmask where bit `m` marks month `m` (1..=12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Season {
    mask: u16,
}

impl Season {
    /// Builds a season from a list of months.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if any month is outside 1..=12.
    pub fn from_months(months: &[u8]) -> Result<Self, CalendarError> {
        let mut mask = 0u16;
        for &month in months {
            if !(1..=12).contains(&month) {
                return Err(CalendarError::InvalidMonth { month });
            }
            mask |= 1 << month;
        }
        Ok(Self { mask })
    }

    /// Austral summer, October through May.
    pub fn austral_summer() -> Self {
        Self {
            mask: [10u8, 11, 12, 1, 2, 3, 4, 5]
                .iter()
                .fold(0, |acc, &m| acc | (1 << m)),
        }
    }

    /// Every month of the year.
    pub fn all_year() -> Self {
        Self {
            mask: (1..=12u8).fold(0, |acc, m| acc | (1 << m)),
        }
    }

    /// Returns `true` if `month` (1..=12) is in this season.
    pub fn contains_month(self, month: u8) -> bool {
        (1..=12).contains(&month) && self.mask & (1 << month) != 0
    }

    /// Returns `true` if the date's month is in this season.
    pub fn contains<D: Datelike>(self, date: &D) -> bool {
        self.contains_month(date.month() as u8)
    }

    /// Returns the months of this season in ascending order.
    pub fn months(self) -> Vec<u8> {
        (1..=12u8).filter(|&m| self.contains_month(m)).collect()
    }
}

impl Default for Season {
    fn default() -> Self {
        Self::all_year()
    }
}
