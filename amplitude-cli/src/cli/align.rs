//! Align two index files and emit their prices on the common dates.

use std::path::{Path, PathBuf};

use amplitude::{AmplitudeConfig, IndexSeries, IndicatorTable, align};
use amplitude_store::codec::render_table;
use amplitude_store::{clean_index, read_index_csv, write_table_csv};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// First index file (Date, Adj Close, ... columns)
    pub left: PathBuf,

    /// Second index file
    pub right: PathBuf,

    /// Write the aligned prices here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

fn load(path: &Path, cfg: &AmplitudeConfig) -> Result<IndexSeries> {
    let label = path.display().to_string();
    let rows = read_index_csv(path).with_context(|| format!("reading {label}"))?;
    Ok(clean_index(rows, cfg.analysis.duplicate_policy, &label)?)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

pub fn execute(args: &AlignArgs, cfg: &AmplitudeConfig) -> Result<()> {
    let left = load(&args.left, cfg)?;
    let right = load(&args.right, cfg)?;
    let (left_rows, right_rows) = (left.len(), right.len());
    let (left, right) = align(left, right);
    tracing::info!(left_rows, right_rows, common = left.len(), "aligned index files");

    let (left_name, mut right_name) = (stem(&args.left), stem(&args.right));
    if right_name == left_name {
        right_name.push_str("_2");
    }
    let mut table = IndicatorTable::new(left.keys().copied().collect());
    table.push_column(left_name, left.values().map(|b| Some(b.price())).collect())?;
    table.push_column(right_name, right.values().map(|b| Some(b.price())).collect())?;

    eprintln!(
        "{left_rows} + {right_rows} rows, {} common dates",
        table.len()
    );
    match &args.output {
        Some(path) => write_table_csv(path, &table)
            .with_context(|| format!("writing {}", path.display()))?,
        None => render_table(std::io::stdout().lock(), &table)?,
    }
    Ok(())
}
