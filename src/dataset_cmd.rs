//! Dataset command: join the index with MJO state and predictor anomalies.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use ttt_dataset::{DatasetBuilder, DatedSeries};
use ttt_grid::{Climatology, box_mean};
use ttt_io::{read_field, read_index_csv, read_omi, write_dataset_csv};

use crate::cli::DatasetArgs;
use crate::config::{PredictorToml, TttConfig};
use crate::convert;

/// Run the dataset assembly pipeline.
pub fn run(args: DatasetArgs) -> Result<()> {
    let _cmd = info_span!("dataset").entered();
    let config = TttConfig::load(&args.config)?;

    // 1. Index written by `ttt index`
    let index_path = &config.output.index_csv;
    let table = read_index_csv(index_path).with_context(|| {
        format!(
            "failed to read index: {} (run `ttt index` first)",
            index_path.display()
        )
    })?;

    // 2. MJO
    let mjo_path = &config
        .mjo
        .as_ref()
        .ok_or_else(|| anyhow!("no MJO index: set [mjo].path in config"))?
        .path;
    let mjo = read_omi(mjo_path)
        .with_context(|| format!("failed to read OMI: {}", mjo_path.display()))?;

    // 3. Predictors, one file pipeline per thread
    let columns = predictor_columns(&config.predictors)?;

    // 4. Join
    let mut builder = DatasetBuilder::new(table.dates, table.index, table.flags, mjo)
        .context("index file is inconsistent")?;
    for (name, series) in columns {
        builder = builder.with_predictor(name, series)?;
    }
    if config.noise_column {
        let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
        debug!(seed, "noise column seed");
        builder = builder.with_noise_seed(seed);
    }
    let dataset = builder.assemble();

    // 5. Write
    let output = args.output.unwrap_or(config.output.dataset_csv);
    write_dataset_csv(&output, &dataset)
        .with_context(|| format!("failed to write dataset: {}", output.display()))?;

    Ok(())
}

/// Computes every predictor column, in config order.
///
/// Predictors sharing a file, variable and season are reduced from one
/// anomaly field; distinct files are processed in parallel.
fn predictor_columns(predictors: &[PredictorToml]) -> Result<Vec<(String, DatedSeries)>> {
    let mut groups: BTreeMap<(PathBuf, String, bool), Vec<usize>> = BTreeMap::new();
    for (i, p) in predictors.iter().enumerate() {
        groups
            .entry((p.path.clone(), p.var.clone(), p.season_only))
            .or_default()
            .push(i);
    }
    info!(
        n_predictors = predictors.len(),
        n_files = groups.len(),
        "processing predictors"
    );

    let computed: Vec<Vec<(usize, DatedSeries)>> = groups
        .into_par_iter()
        .map(|(_, members)| predictor_group(predictors, &members))
        .collect::<Result<_>>()?;

    let mut columns: Vec<(usize, DatedSeries)> = computed.into_iter().flatten().collect();
    columns.sort_by_key(|(i, _)| *i);
    Ok(columns
        .into_iter()
        .map(|(i, s)| (predictors[i].name.clone(), s))
        .collect())
}

/// Reads one predictor file and reduces each member's box over its anomalies.
fn predictor_group(
    predictors: &[PredictorToml],
    members: &[usize],
) -> Result<Vec<(usize, DatedSeries)>> {
    let first = &predictors[members[0]];
    let _span = info_span!("predictor", path = %first.path.display(), var = %first.var).entered();

    let season = convert::predictor_season(first);
    let field = read_field(&first.path, &convert::build_predictor_reader_config(first))
        .with_context(|| format!("failed to read predictor: {}", first.path.display()))?
        .in_season(season);
    let anomalies = Climatology::build_in_season(&field, season)
        .anomalies(&field)
        .with_context(|| format!("failed to compute anomalies for {}", first.var))?;

    members
        .iter()
        .map(|&i| {
            let p = &predictors[i];
            let values = box_mean(&anomalies, &convert::predictor_box(p))
                .with_context(|| format!("predictor '{}': box lookup failed", p.name))?;
            let series = DatedSeries::new(&p.name, anomalies.dates().to_vec(), values)?;
            Ok((i, series))
        })
        .collect()
}
