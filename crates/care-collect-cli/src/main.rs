//! `care-collect`: command-line front end for the clinic records store.

use anyhow::Result;
use clap::Parser;

use care_collect_cli::cli::CliArgs;
use care_collect_cli::commands;

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    commands::run(args)
}
