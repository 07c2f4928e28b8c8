use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tropical-temperate-trough index and predictor dataset builder.
#[derive(Parser)]
#[command(
    name = "ttt",
    version,
    about = "Tropical-temperate-trough activity index, events and predictor dataset"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the TTT index from OLR and flag event days.
    Index(IndexArgs),
    /// Join the index with MJO state and predictor anomalies into one CSV.
    Dataset(DatasetArgs),
}

/// Arguments for the `index` subcommand.
#[derive(clap::Args)]
pub struct IndexArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "ttt.toml")]
    pub config: PathBuf,

    /// Override output index CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `dataset` subcommand.
#[derive(clap::Args)]
pub struct DatasetArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "ttt.toml")]
    pub config: PathBuf,

    /// Override output dataset CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override noise column RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
