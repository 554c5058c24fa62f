//! `amplitude` command-line tool
//!
//! - `markets`: list the market registry
//! - `align`: align two index files on their common dates
//! - `analyze`: compute and write the indicator tables of one or more markets
//! - `update`: merge freshly downloaded rows into the stored files
//! - `config`: print the effective configuration as JSON

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("amplitude=warn"))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let cfg = cli.global.load()?;

    match cli.command {
        Commands::Markets(args) => cli::markets::execute(&args),
        Commands::Align(args) => cli::align::execute(&args, &cfg),
        Commands::Analyze(args) => cli::analyze::execute(&args, cfg),
        Commands::Update(args) => cli::update::execute(&args, &cfg),
        Commands::Config => {
            println!("{}", amplitude::config_to_json(&cfg)?);
            Ok(())
        }
    }
}
