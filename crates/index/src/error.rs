//! Error types for ttt-index.

/// Error type for all fallible operations in the ttt-index crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// Returned when a formula references a series that was not supplied.
    #[error("missing input series '{name}'")]
    MissingSeries {
        /// Name of the absent series.
        name: String,
    },

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

    /// Returned when a formula has no terms or a term has no series.
    #[error("invalid formula: {reason}")]
    InvalidFormula {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when event detection parameters are unusable.
    #[error("invalid event configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Grid error raised while reducing boxes.
    #[error(transparent)]
    Grid(#[from] ttt_grid::GridError),
}
