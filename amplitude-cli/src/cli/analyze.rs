use std::path::PathBuf;

use amplitude::{Amplitude, AmplitudeConfig, MarketDetails, default_markets};
use anyhow::{Context, Result, bail};
use clap::Args;

/// Arguments for the analyze command
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Markets by registry number or name
    #[arg(required_unless_present = "all")]
    pub markets: Vec<String>,

    /// Analyse every market in the registry
    #[arg(long, conflicts_with = "markets")]
    pub all: bool,

    /// Keep only the last N rows of each table
    #[arg(long)]
    pub lookback: Option<usize>,

    /// Output folder (defaults to the configured one)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: &AnalyzeArgs, mut cfg: AmplitudeConfig) -> Result<()> {
    let markets: Vec<MarketDetails> = if args.all {
        default_markets().into_values().collect()
    } else {
        args.markets
            .iter()
            .map(|m| super::market(m))
            .collect::<Result<_>>()?
    };
    if args.lookback.is_some() {
        cfg.analysis.graph_lookback = args.lookback;
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| cfg.locations.output_folder.clone());

    let amp = Amplitude::from_config(&cfg)?;
    let batch = amp.analyze_many(&markets)?;

    for report in &batch.reports {
        let written = report
            .write_csv(&output)
            .with_context(|| format!("writing tables of {}", report.market.market))?;
        let rows = report.moving_averages.len();
        println!(
            "{}: {rows} rows, {} tables in {}",
            report.market.market,
            written.len(),
            output.display()
        );
    }
    for (market, err) in &batch.skipped {
        println!("{market}: skipped ({err})");
    }
    for (market, err) in &batch.failed {
        eprintln!("{market}: failed ({err})");
    }
    if !batch.is_clean() {
        bail!("{} market(s) failed", batch.failed.len());
    }
    Ok(())
}
