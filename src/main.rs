mod cli;
mod config;
mod convert;
mod dataset_cmd;
mod index_cmd;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Index(args) => index_cmd::run(args),
        Command::Dataset(args) => dataset_cmd::run(args),
    }
}
