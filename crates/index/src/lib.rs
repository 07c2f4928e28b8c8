//! # ttt-index
//!
//! Turns anomaly box means into the TTT activity index and finds its event
//! days.
//!
//! 1. [`box_index`] reduces the E1, E2, W1 and W2 boxes and evaluates
//!    [`IndexFormula::ttt`], `0.4 * mean(E1, E2) - 0.6 * mean(W1, W2)`.
//! 2. [`seasonal_stats`] takes the mean and population standard deviation
//!    over Oct-May.
//! 3. [`detect_events`] flags days above `mean + 2 * std` anywhere in the
//!    series and collapses each cluster within 5 days onto its peak.

mod combine;
mod error;
mod events;
mod seasonal;

pub use combine::{IndexFormula, Term, box_index, ttt_boxes};
pub use error::IndexError;
pub use events::{
    EventConfig, EventSummary, consolidate, detect_events, find_events, mark_candidates,
};
pub use seasonal::{SeasonalStats, seasonal_stats};
