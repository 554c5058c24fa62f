//! Argument definitions shared by the subcommands.

pub mod align;
pub mod analyze;
pub mod markets;
pub mod update;

use std::path::PathBuf;

use amplitude::{AmplitudeConfig, MarketDetails, default_markets, find_market};
use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};

/// Market breadth analysis over persisted index and component files
#[derive(Parser)]
#[command(name = "amplitude")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the known markets
    Markets(markets::MarketsArgs),
    /// Align two index files on their common dates
    Align(align::AlignArgs),
    /// Compute indicator tables for markets
    Analyze(analyze::AnalyzeArgs),
    /// Merge fresh rows into a market's stored files
    Update(update::UpdateArgs),
    /// Print the effective configuration as JSON
    Config,
}

/// Options accepted before any subcommand.
#[derive(Args)]
pub struct GlobalArgs {
    /// JSON configuration file; folders inside it resolve against its directory
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data folder (INDEX_*.csv and EOD_*.csv)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
}

impl GlobalArgs {
    /// Configuration from `--config` (or defaults) with flag overrides applied.
    pub fn load(&self) -> Result<AmplitudeConfig> {
        let mut cfg = match &self.config {
            Some(path) => amplitude::load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AmplitudeConfig::default(),
        };
        if let Some(data) = &self.data {
            cfg.locations.data_folder.clone_from(data);
        }
        Ok(cfg)
    }
}

/// Resolve a market by registry number or name.
pub fn market(needle: &str) -> Result<MarketDetails> {
    find_market(&default_markets(), needle)
        .ok_or_else(|| anyhow!("unknown market '{needle}'; see `amplitude markets`"))
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_day(raw: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("{raw}: {e}"))
}
