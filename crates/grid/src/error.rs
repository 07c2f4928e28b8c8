//! Error types for ttt-grid.

/// Error type for all fallible operations in the ttt-grid crate.
///
/// Every variant is a configuration or contract violation detected before
/// any arithmetic runs; missing data inside a grid is never an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when a box bound is not an exact member of a coordinate axis.
    #[error("coordinate {value} not found on {axis} axis")]
    CoordinateNotFound {
        /// Axis name (`"lat"` or `"lon"`).
        axis: &'static str,
        /// The value that was looked up.
        value: f64,
    },

    /// Returned when a coordinate axis has no values.
    #[error("{axis} axis is empty")]
    EmptyAxis {
        /// Axis name.
        axis: &'static str,
    },

    /// Returned when a coordinate axis is not strictly monotonic.
    #[error("{axis} axis is not strictly monotonic at position {position}")]
    NonMonotonic {
        /// Axis name.
        axis: &'static str,
        /// First position at which monotonicity breaks.
        position: usize,
    },

    /// Returned when two aligned sequences differ in length.
    #[error("{field}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// Name of the mismatched input.
        field: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a grid does not have the expected (lat, lon) shape.
    #[error("{field}: expected grid shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Name of the mismatched input.
        field: &'static str,
        /// Expected `(n_lat, n_lon)`.
        expected: (usize, usize),
        /// Actual `(n_lat, n_lon)`.
        got: (usize, usize),
    },

    /// Returned when timestamps are not strictly ascending.
    #[error("timestamps not strictly ascending at position {position}")]
    UnsortedDates {
        /// Position of the first out-of-order timestamp.
        position: usize,
    },

    /// Returned when a climatology slot without contributions is looked up.
    #[error("climatology slot for day of year {doy} has no contributing data")]
    EmptySlot {
        /// 1-based day of year of the empty slot.
        doy: u16,
    },

    /// Returned when a precomputed climatology does not have 365 slots.
    #[error("climatology must have 365 slots, got {got}")]
    SlotCount {
        /// Number of slots supplied.
        got: usize,
    },

    /// Returned when a box selects no grid cells.
    #[error("box '{name}' selects no grid cells")]
    EmptyBox {
        /// Box name.
        name: String,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] ttt_calendar::CalendarError),
}
