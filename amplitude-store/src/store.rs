use amplitude_core::{AmplitudeError, Bar, IndexSeries, MarketSource, Panel, PanelRow, TimeSeries};
use amplitude_types::{DuplicatePolicy, FileLocations, MarketDetails};
use chrono::NaiveDate;

use crate::codec::{EodRows, read_eod_csv, read_index_csv, read_ticker_codes};
use crate::layout::DataLayout;

/// `MarketSource` reading the index and EOD CSV files of a [`DataLayout`].
///
/// Loaded data is cleaned the same way for every caller: rows are sorted by
/// date, repeated dates are reduced with the configured policy (keep-first by
/// default) and a trailing index row with zero volume is dropped because it
/// marks a session that was still open when the file was written.
///
/// When the market's ticker list exists in the codes folder, the component
/// panel is cut down to the listed tickers in list order. Without the list
/// every ticker of the EOD file is kept.
#[derive(Debug, Clone)]
pub struct CsvStore {
    layout: DataLayout,
    policy: DuplicatePolicy,
}

impl CsvStore {
    /// Store over `layout` with the keep-first duplicate policy.
    #[must_use]
    pub const fn new(layout: DataLayout) -> Self {
        Self {
            layout,
            policy: DuplicatePolicy::KeepFirst,
        }
    }

    /// Store over the folders of a configuration.
    #[must_use]
    pub fn from_locations(locations: &FileLocations) -> Self {
        Self::new(DataLayout::from_locations(locations))
    }

    /// Override the duplicate policy applied on load.
    #[must_use]
    pub const fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// File layout of this store.
    #[must_use]
    pub const fn layout(&self) -> &DataLayout {
        &self.layout
    }
}

fn relabel(err: AmplitudeError, label: &str) -> AmplitudeError {
    match err {
        AmplitudeError::DuplicateKey { key, .. } => AmplitudeError::DuplicateKey {
            series: label.to_string(),
            key,
        },
        other => other,
    }
}

/// Sort, de-duplicate and trim raw index rows.
///
/// # Errors
/// Returns `AmplitudeError::DuplicateKey` under `DuplicatePolicy::Reject`.
pub fn clean_index(
    rows: Vec<(NaiveDate, Bar)>,
    policy: DuplicatePolicy,
    label: &str,
) -> Result<IndexSeries, AmplitudeError> {
    let series = TimeSeries::from_entries_dedup(rows, policy).map_err(|e| relabel(e, label))?;
    let before = series.len();
    let series = series.drop_last_if(|bar| bar.volume == 0.0);
    if series.len() < before {
        #[cfg(feature = "tracing")]
        tracing::debug!(file = label, "dropped trailing zero-volume row");
    }
    Ok(series)
}

/// Sort and de-duplicate raw EOD rows into a panel.
///
/// # Errors
/// Returns `AmplitudeError::DuplicateKey` under `DuplicatePolicy::Reject`, or
/// `AmplitudeError::Data` if a row's width does not match the tickers.
pub fn clean_panel(
    raw: EodRows,
    policy: DuplicatePolicy,
    label: &str,
) -> Result<Panel, AmplitudeError> {
    let rows: TimeSeries<NaiveDate, PanelRow> =
        TimeSeries::from_entries_dedup(raw.rows, policy).map_err(|e| relabel(e, label))?;
    Panel::new(raw.tickers, rows)
}

/// Keep the tickers of `codes` that `panel` holds, in the order of `codes`.
///
/// Listed tickers absent from the panel are skipped.
///
/// # Errors
/// Returns `AmplitudeError::Data` only if the rebuilt panel is inconsistent.
pub fn restrict_to_codes(panel: &Panel, codes: &[String]) -> Result<Panel, AmplitudeError> {
    let (slots, tickers): (Vec<usize>, Vec<String>) = codes
        .iter()
        .filter_map(|code| {
            let slot = panel.tickers().iter().position(|t| t == code);
            slot.map(|i| (i, code.clone()))
        })
        .unzip();
    let rows = panel
        .rows()
        .clone()
        .map_values(|row| slots.iter().map(|&i| row[i]).collect());
    Panel::new(tickers, rows)
}

impl MarketSource for CsvStore {
    fn name(&self) -> &'static str {
        "csv-store"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "amplitude_store::load_index", skip(self), err)
    )]
    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError> {
        let path = self.layout.index_path(idx_code);
        let label = path.display().to_string();
        let series = clean_index(read_index_csv(&path)?, self.policy, &label)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(file = %label, rows = series.len(), "loaded index");
        Ok(series)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplitude_store::load_components",
            skip(self, market),
            fields(market = %market.market),
            err
        )
    )]
    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError> {
        if !market.has_components() {
            return Err(AmplitudeError::not_found(format!(
                "component list for {}",
                market.market
            )));
        }
        let path = self.layout.eod_path(&market.market);
        let label = path.display().to_string();
        let mut panel = clean_panel(read_eod_csv(&path)?, self.policy, &label)?;
        match self.layout.codes_path(market) {
            Some(codes) if codes.is_file() => {
                let codes = read_ticker_codes(&codes)?;
                panel = restrict_to_codes(&panel, &codes)?;
                if panel.width() < codes.len() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        file = %label,
                        missing = codes.len() - panel.width(),
                        "listed tickers without EOD data"
                    );
                }
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(market = %market.market, "no ticker list, keeping every EOD ticker");
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            file = %label,
            rows = panel.len(),
            tickers = panel.width(),
            "loaded components"
        );
        Ok(panel)
    }
}
