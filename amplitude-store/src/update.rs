//! Incremental updates of persisted files.
//!
//! Fresh rows overwrite stored rows on the same date, rows after the
//! requested end date are dropped, and the file is only rewritten when the
//! merged content differs from what was stored.

use std::collections::BTreeMap;
use std::path::Path;

use amplitude_core::{
    AmplitudeError, IndexSeries, Panel, PanelRow, TimeSeries, merge_update, should_skip_update,
};
use amplitude_types::DuplicatePolicy;
use chrono::NaiveDate;

use crate::codec::{read_eod_csv, read_index_csv, write_eod_csv, write_index_csv};
use crate::store::{clean_index, clean_panel};

/// What an update did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Stored data already reaches the requested or the provider end date.
    UpToDate {
        /// Last date with data in the file.
        last: NaiveDate,
    },
    /// The fresh batch was empty.
    NoNewData,
    /// Merging produced the stored content again; nothing was written.
    Unchanged,
    /// The merged content was written.
    Written {
        /// Rows in the rewritten file.
        rows: usize,
    },
}

impl UpdateStatus {
    /// True when the file was rewritten.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Merge `fresh` bars into the index file at `path`.
///
/// # Errors
/// `AmplitudeError::NotFound` when the file does not exist; `Csv` or `Io`
/// when it cannot be read or rewritten.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "amplitude_store::update_index_file",
        skip_all,
        fields(path = %path.display(), fresh = fresh.len()),
        err
    )
)]
pub fn update_index_file(
    path: &Path,
    fresh: IndexSeries,
    requested_end: NaiveDate,
    provider_end: NaiveDate,
) -> Result<UpdateStatus, AmplitudeError> {
    let label = path.display().to_string();
    let stored = clean_index(read_index_csv(path)?, DuplicatePolicy::KeepFirst, &label)?;

    if let Some(last) = stored.last_key().copied()
        && should_skip_update(Some(&last), &requested_end, &provider_end)
    {
        return Ok(UpdateStatus::UpToDate { last });
    }
    if fresh.is_empty() {
        return Ok(UpdateStatus::NoNewData);
    }

    let outcome = merge_update(stored, fresh, Some(&requested_end));
    if !outcome.changed {
        return Ok(UpdateStatus::Unchanged);
    }
    write_index_csv(path, &outcome.series)?;
    Ok(UpdateStatus::Written {
        rows: outcome.series.len(),
    })
}

/// Merge a fresh component panel into the EOD file at `path`.
///
/// Tickers only present in `fresh` are appended after the stored ones. A
/// fresh row replaces the stored row of that date as a whole.
///
/// # Errors
/// `AmplitudeError::NotFound` when the file does not exist; `Csv`, `Data` or
/// `Io` when it cannot be read, merged or rewritten.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "amplitude_store::update_components_file",
        skip_all,
        fields(path = %path.display(), fresh = fresh.len()),
        err
    )
)]
pub fn update_components_file(
    path: &Path,
    fresh: &Panel,
    requested_end: NaiveDate,
    provider_end: NaiveDate,
) -> Result<UpdateStatus, AmplitudeError> {
    let label = path.display().to_string();
    let stored = clean_panel(read_eod_csv(path)?, DuplicatePolicy::KeepFirst, &label)?;

    let last = stored
        .rows()
        .last_key_where(|row| row.iter().any(Option::is_some))
        .copied();
    if let Some(last) = last
        && should_skip_update(Some(&last), &requested_end, &provider_end)
    {
        return Ok(UpdateStatus::UpToDate { last });
    }
    if fresh.is_empty() {
        return Ok(UpdateStatus::NoNewData);
    }

    let mut tickers: Vec<String> = stored.tickers().to_vec();
    for t in fresh.tickers() {
        if !tickers.contains(t) {
            tickers.push(t.clone());
        }
    }
    let stored_rows = rebase(&stored, &tickers);
    let outcome = merge_update(stored_rows, rebase(fresh, &tickers), Some(&requested_end));
    if !outcome.changed {
        return Ok(UpdateStatus::Unchanged);
    }
    let merged = Panel::new(tickers, outcome.series)?;
    write_eod_csv(path, &merged)?;
    Ok(UpdateStatus::Written { rows: merged.len() })
}

/// Rows of `panel` laid out on `tickers` (a superset of the panel's tickers).
fn rebase(panel: &Panel, tickers: &[String]) -> TimeSeries<NaiveDate, PanelRow> {
    let slot_of: BTreeMap<&str, usize> = panel
        .tickers()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let slots: Vec<Option<usize>> = tickers
        .iter()
        .map(|t| slot_of.get(t.as_str()).copied())
        .collect();
    panel
        .rows()
        .clone()
        .map_values(|row| slots.iter().map(|s| s.and_then(|i| row[i])).collect())
}
