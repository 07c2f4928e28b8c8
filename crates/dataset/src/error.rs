//! Error types for ttt-dataset.

/// Error type for all fallible operations in the ttt-dataset crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Returned when aligned inputs differ in length.
    #[error("{field}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// Name of the mismatched input.
        field: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a series' dates are not strictly ascending.
    #[error("{field}: dates not strictly ascending at position {position}")]
    UnsortedDates {
        /// Name of the offending series.
        field: String,
        /// Position of the first out-of-order date.
        position: usize,
    },

    /// Returned when two predictors share a name.
    #[error("duplicate predictor '{name}'")]
    DuplicatePredictor {
        /// The repeated name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsorted() {
        let e = DatasetError::UnsortedDates {
            field: "q850".into(),
            position: 3,
        };
        assert_eq!(
            e.to_string(),
            "q850: dates not strictly ascending at position 3"
        );
    }

    #[test]
    fn display_duplicate() {
        let e = DatasetError::DuplicatePredictor { name: "u850".into() };
        assert_eq!(e.to_string(), "duplicate predictor 'u850'");
    }
}
