//! Threshold exceedance detection and peak-day consolidation.

use chrono::NaiveDate;
use tracing::{debug, info};
use ttt_calendar::Season;
use ttt_stats::argmax_first;

use crate::error::IndexError;
use crate::seasonal::{SeasonalStats, seasonal_stats};

/// Parameters for event detection.
///
/// Defaults: threshold of 2 standard deviations, 5-day half window,
/// statistics over austral summer (Oct-May).
#[derive(Debug, Clone, PartialEq)]
pub struct EventConfig {
    threshold_sd: f64,
    half_window: usize,
    season: Season,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            threshold_sd: 2.0,
            half_window: 5,
            season: Season::austral_summer(),
        }
    }
}

impl EventConfig {
    /// Sets the threshold multiplier `k` in `mean + k * std`.
    pub fn with_threshold_sd(mut self, k: f64) -> Self {
        self.threshold_sd = k;
        self
    }

    /// Sets the consolidation half window in days.
    pub fn with_half_window(mut self, w: usize) -> Self {
        self.half_window = w;
        self
    }

    /// Sets the season the statistics are computed over.
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    /// Threshold multiplier.
    pub fn threshold_sd(&self) -> f64 {
        self.threshold_sd
    }

    /// Consolidation half window.
    pub fn half_window(&self) -> usize {
        self.half_window
    }

    /// Statistics season.
    pub fn season(&self) -> Season {
        self.season
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if the threshold multiplier is
    /// not finite.
    pub fn validate(&self) -> Result<(), IndexError> {
        if !self.threshold_sd.is_finite() {
            return Err(IndexError::InvalidConfig {
                reason: format!("threshold_sd must be finite, got {}", self.threshold_sd),
            });
        }
        Ok(())
    }
}

/// Flags every day whose value exceeds `threshold`. NaN is never flagged.
pub fn mark_candidates(index: &[f64], threshold: f64) -> Vec<u8> {
    index.iter().map(|&v| u8::from(v > threshold)).collect()
}

/// Collapses clusters of flagged days into single peak days.
///
/// Days are visited in ascending order. A flagged day with another flagged
/// day within `half_window` on either side opens the window
/// `[i - w, i + w]` (clipped to the series). The largest value in that
/// window wins, NaN counting as negative infinity and ties going to the
/// earliest day. If `i` wins, every other flag in the window is cleared;
/// otherwise only `i` is cleared.
///
/// Afterwards no two flags are within `half_window` days of each other.
pub fn consolidate(index: &[f64], flags: &mut [u8], half_window: usize) {
    let n = flags.len().min(index.len());
    for i in 0..n {
        if flags[i] == 0 {
            continue;
        }
        let lo = i.saturating_sub(half_window);
        let hi = i.saturating_add(half_window).min(n - 1);
        let clustered = (lo..=hi).any(|j| j != i && flags[j] != 0);
        if !clustered {
            continue;
        }
        let winner = argmax_first(&index[lo..=hi]).map_or(i, |k| lo + k);
        if winner == i {
            for j in (lo..=hi).filter(|&j| j != i) {
                flags[j] = 0;
            }
        } else {
            flags[i] = 0;
        }
    }
}

/// Marks candidates against `stats` and consolidates them.
///
/// Detection runs over every day; only the statistics are season-restricted.
/// Never fails: non-finite statistics produce no events.
pub fn detect_events(index: &[f64], stats: &SeasonalStats, config: &EventConfig) -> Vec<u8> {
    let threshold = stats.threshold(config.threshold_sd);
    let mut flags = mark_candidates(index, threshold);
    let n_candidates = flags.iter().filter(|&&f| f != 0).count();
    consolidate(index, &mut flags, config.half_window);
    debug!(
        threshold,
        n_candidates,
        n_events = flags.iter().filter(|&&f| f != 0).count(),
        "event detection"
    );
    flags
}

/// Summary of a detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    /// Statistics the threshold was derived from.
    pub stats: SeasonalStats,
    /// Threshold that candidates had to exceed.
    pub threshold: f64,
    /// Peak days, ascending.
    pub peaks: Vec<NaiveDate>,
}

/// Runs seasonal statistics and event detection on a dated index series.
///
/// # Errors
///
/// Returns [`IndexError::LengthMismatch`] if `dates` is not aligned with
/// `index`, or [`IndexError::InvalidConfig`] for an invalid `config`.
pub fn find_events(
    index: &[f64],
    dates: &[NaiveDate],
    config: &EventConfig,
) -> Result<(Vec<u8>, EventSummary), IndexError> {
    config.validate()?;
    let stats = seasonal_stats(index, dates, config.season)?;
    let flags = detect_events(index, &stats, config);
    let peaks: Vec<NaiveDate> = flags
        .iter()
        .zip(dates)
        .filter(|&(&f, _)| f != 0)
        .map(|(_, &d)| d)
        .collect();
    info!(
        mean = stats.mean,
        std = stats.std,
        n_events = peaks.len(),
        "events detected"
    );
    Ok((
        flags,
        EventSummary {
            stats,
            threshold: stats.threshold(config.threshold_sd),
            peaks,
        },
    ))
}
