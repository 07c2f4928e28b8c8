//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use ttt_calendar::Season;
use ttt_grid::BoundingBox;
use ttt_index::EventConfig;
use ttt_io::FieldReaderConfig;

use crate::config::{EventsToml, OlrToml, PredictorToml};

/// Builds the OLR [`FieldReaderConfig`], including the optional crop region.
pub fn build_olr_reader_config(olr: &OlrToml) -> FieldReaderConfig {
    FieldReaderConfig::default()
        .with_var(&olr.var)
        .with_crop(olr.crop.map(|b| BoundingBox::from_bounds("olr crop", b)))
}

/// Builds a [`FieldReaderConfig`] for one predictor file; the whole grid is read.
pub fn build_predictor_reader_config(p: &PredictorToml) -> FieldReaderConfig {
    FieldReaderConfig::default().with_var(&p.var)
}

/// Builds an [`EventConfig`] from the TOML events configuration.
///
/// Statistics are always taken over austral summer.
pub fn build_event_config(events: &EventsToml) -> Result<EventConfig> {
    let cfg = EventConfig::default()
        .with_threshold_sd(events.threshold_sd)
        .with_half_window(events.half_window)
        .with_season(Season::austral_summer());
    cfg.validate().context("invalid [events] configuration")?;
    Ok(cfg)
}

/// The box a predictor column is averaged over, named after the column.
pub fn predictor_box(p: &PredictorToml) -> BoundingBox {
    BoundingBox::from_bounds(p.name.as_str(), p.bbox)
}

/// Season a predictor's climatology and anomalies are restricted to.
pub fn predictor_season(p: &PredictorToml) -> Season {
    if p.season_only {
        Season::austral_summer()
    } else {
        Season::all_year()
    }
}
