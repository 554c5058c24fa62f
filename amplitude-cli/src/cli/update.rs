use std::path::{Path, PathBuf};

use amplitude::{AmplitudeConfig, DataLayout, UpdateStatus};
use amplitude_store::{
    clean_index, clean_panel, read_eod_csv, read_index_csv, update_components_file,
    update_index_file,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the update command
#[derive(Args)]
pub struct UpdateArgs {
    /// Market by registry number or name
    pub market: String,

    /// Freshly downloaded index rows (index CSV layout)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Freshly downloaded component rows (EOD CSV layout)
    #[arg(long)]
    pub components: Option<PathBuf>,

    /// Last date requested from the provider (YYYY-MM-DD)
    #[arg(long, value_parser = super::parse_day)]
    pub end: NaiveDate,

    /// Last date the provider has data for; defaults to --end
    #[arg(long, value_parser = super::parse_day)]
    pub provider_end: Option<NaiveDate>,
}

fn report(path: &Path, status: UpdateStatus) {
    let name = path.display();
    match status {
        UpdateStatus::UpToDate { last } => println!("{name}: up to date (last {last})"),
        UpdateStatus::NoNewData => println!("{name}: no new data"),
        UpdateStatus::Unchanged => println!("{name}: unchanged"),
        UpdateStatus::Written { rows } => println!("{name}: written ({rows} rows)"),
    }
}

pub fn execute(args: &UpdateArgs, cfg: &AmplitudeConfig) -> Result<()> {
    if args.index.is_none() && args.components.is_none() {
        bail!("nothing to update; pass --index and/or --components");
    }
    let market = super::market(&args.market)?;
    let layout = DataLayout::from_locations(&cfg.locations);
    let policy = cfg.analysis.duplicate_policy;
    let provider_end = args.provider_end.unwrap_or(args.end);

    if let Some(fresh) = &args.index {
        let label = fresh.display().to_string();
        let rows = read_index_csv(fresh).with_context(|| format!("reading {label}"))?;
        let fresh = clean_index(rows, policy, &label)?;
        let target = layout.index_path(&market.idx_code);
        let status = update_index_file(&target, fresh, args.end, provider_end)
            .with_context(|| format!("updating {}", target.display()))?;
        report(&target, status);
    }

    if let Some(fresh) = &args.components {
        if !market.has_components() {
            bail!("{} has no component list", market.market);
        }
        let label = fresh.display().to_string();
        let raw = read_eod_csv(fresh).with_context(|| format!("reading {label}"))?;
        let fresh = clean_panel(raw, policy, &label)?;
        let target = layout.eod_path(&market.market);
        let status = update_components_file(&target, &fresh, args.end, provider_end)
            .with_context(|| format!("updating {}", target.display()))?;
        report(&target, status);
    }
    Ok(())
}
