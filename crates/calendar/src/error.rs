//! Error types for the ttt-calendar crate.

/// Error type for all fallible operations in the ttt-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside 1..=365.
    #[error("invalid day of year: {doy} (must be 1..=365)")]
    InvalidDoy {
        /// The rejected day-of-year.
        doy: u16,
    },

    /// Returned when a month number is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The rejected month.
        month: u8,
    },

    /// Returned when a day exceeds the length of its month in the reference year.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The rejected day.
        day: u8,
        /// Month the day was checked against.
        month: u8,
        /// Last valid day of that month.
        max_day: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CalendarError::InvalidDoy { doy: 0 }.to_string(),
            "invalid day of year: 0 (must be 1..=365)"
        );
        assert_eq!(
            CalendarError::InvalidMonth { month: 13 }.to_string(),
            "invalid month: 13 (must be 1..=12)"
        );
        assert_eq!(
            CalendarError::InvalidDay {
                day: 29,
                month: 2,
                max_day: 28,
            }
            .to_string(),
            "invalid day: 29 for month 2 (max 28)"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<CalendarError>();
    }
}
