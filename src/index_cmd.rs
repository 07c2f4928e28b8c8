//! Index command: OLR anomalies -> TTT index -> event days -> CSV.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use ttt_grid::{Climatology, TimestampedField};
use ttt_index::{IndexFormula, box_index, find_events, ttt_boxes};
use ttt_io::{IndexTable, read_climatology, read_field, write_index_csv};

use crate::cli::IndexArgs;
use crate::config::{OlrToml, TttConfig};
use crate::convert;

/// Run the index pipeline.
pub fn run(args: IndexArgs) -> Result<()> {
    let _cmd = info_span!("index").entered();
    let config = TttConfig::load(&args.config)?;
    let event_cfg = convert::build_event_config(&config.events)?;

    // 1. Read OLR
    let reader_cfg = convert::build_olr_reader_config(&config.olr);
    let olr = read_field(&config.olr.path, &reader_cfg)
        .with_context(|| format!("failed to read OLR: {}", config.olr.path.display()))?;

    // 2. Anomalies against the day-of-year climatology
    let anomalies = olr_anomalies(&config.olr, &olr)?;

    // 3. Index and events
    let index = box_index(&anomalies, &ttt_boxes(), &IndexFormula::ttt())
        .context("failed to compute TTT index")?;
    let (flags, summary) =
        find_events(&index, anomalies.dates(), &event_cfg).context("event detection failed")?;
    info!(
        n_days = index.len(),
        n_undefined = index.iter().filter(|v| v.is_nan()).count(),
        threshold = summary.threshold,
        n_events = summary.peaks.len(),
        "TTT index computed"
    );
    if summary.peaks.is_empty() {
        warn!("no TTT events detected");
    }

    // 4. Write
    let output = args.output.unwrap_or(config.output.index_csv);
    let table = IndexTable {
        dates: anomalies.dates().to_vec(),
        index,
        flags,
    };
    write_index_csv(&output, &table)
        .with_context(|| format!("failed to write index: {}", output.display()))?;

    Ok(())
}

/// Anomalies of `olr` against a precomputed long-term mean if configured,
/// otherwise against a climatology built from `olr` itself.
fn olr_anomalies(olr_cfg: &OlrToml, olr: &TimestampedField) -> Result<TimestampedField> {
    let clim = match &olr_cfg.climatology_path {
        Some(path) => {
            let reader_cfg = convert::build_olr_reader_config(olr_cfg);
            let (grid, clim) = read_climatology(path, &reader_cfg)
                .with_context(|| format!("failed to read climatology: {}", path.display()))?;
            if &grid != olr.grid() {
                bail!(
                    "climatology grid in {} does not match the OLR grid",
                    path.display()
                );
            }
            clim
        }
        None => {
            info!("building OLR climatology from data");
            Climatology::build(olr)
        }
    };
    clim.anomalies(olr).context("failed to compute OLR anomalies")
}
