//! Price rows, the index series alias and the component panel.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AmplitudeError;
use crate::timeseries::series::TimeSeries;

/// One daily OHLCV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Raw close.
    pub close: f64,
    /// Split/dividend adjusted close.
    pub adj_close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Build a bar from its six fields.
    #[must_use]
    pub const fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        }
    }

    /// Bar whose prices all equal `price`.
    #[must_use]
    pub const fn flat(price: f64, volume: f64) -> Self {
        Self::new(price, price, price, price, price, volume)
    }

    /// Price used by every indicator: the adjusted close.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.adj_close
    }

    /// `(high + low + adj_close) / 3`.
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.adj_close) / 3.0
    }
}

/// Daily bars of a single instrument.
pub type IndexSeries = TimeSeries<NaiveDate, Bar>;

/// Row type of a panel: one optional bar per ticker.
pub type PanelRow = Vec<Option<Bar>>;

/// End-of-day bars of many tickers on a shared date axis.
///
/// Rows are kept sorted by date and every row holds exactly one slot per
/// ticker; `None` marks a ticker without data on that date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    tickers: Vec<String>,
    rows: TimeSeries<NaiveDate, PanelRow>,
}

impl Panel {
    /// Build a panel from tickers and rows.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` if a ticker repeats or a row's width
    /// differs from the ticker count.
    pub fn new(
        tickers: Vec<String>,
        rows: TimeSeries<NaiveDate, PanelRow>,
    ) -> Result<Self, AmplitudeError> {
        let distinct: BTreeSet<&str> = tickers.iter().map(String::as_str).collect();
        if distinct.len() != tickers.len() {
            return Err(AmplitudeError::Data("panel tickers repeat".into()));
        }
        if let Some((date, row)) = rows.iter().find(|(_, r)| r.len() != tickers.len()) {
            return Err(AmplitudeError::Data(format!(
                "panel row {date} has {} slots for {} tickers",
                row.len(),
                tickers.len()
            )));
        }
        Ok(Self {
            tickers,
            rows: rows.sorted(),
        })
    }

    /// Outer-join per-ticker series on the union of their dates.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` if a ticker repeats.
    pub fn from_series(series: Vec<(String, IndexSeries)>) -> Result<Self, AmplitudeError> {
        let width = series.len();
        let mut by_date: BTreeMap<NaiveDate, PanelRow> = BTreeMap::new();
        let mut tickers = Vec::with_capacity(width);
        for (slot, (ticker, s)) in series.into_iter().enumerate() {
            tickers.push(ticker);
            for (date, bar) in s {
                by_date.entry(date).or_insert_with(|| vec![None; width])[slot] = Some(bar);
            }
        }
        Self::new(
            tickers,
            TimeSeries::from_sorted_unique(by_date.into_iter().collect()),
        )
    }

    /// Same tickers over a different set of rows (e.g. after alignment).
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` on a row width mismatch.
    pub fn with_rows(
        &self,
        rows: TimeSeries<NaiveDate, PanelRow>,
    ) -> Result<Self, AmplitudeError> {
        Self::new(self.tickers.clone(), rows)
    }

    /// Ticker symbols in slot order.
    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of tickers.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tickers.len()
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the panel has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the row series.
    #[must_use]
    pub const fn rows(&self) -> &TimeSeries<NaiveDate, PanelRow> {
        &self.rows
    }

    /// Consume the panel and return its row series.
    #[must_use]
    pub fn into_rows(self) -> TimeSeries<NaiveDate, PanelRow> {
        self.rows
    }

    /// Dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.keys().copied().collect()
    }

    /// Bar of `ticker` on `date`, if present.
    #[must_use]
    pub fn bar(&self, date: NaiveDate, ticker: &str) -> Option<&Bar> {
        let slot = self.tickers.iter().position(|t| t == ticker)?;
        self.rows.get(&date)?.get(slot)?.as_ref()
    }

    /// Single-ticker series, skipping dates without data.
    #[must_use]
    pub fn ticker_series(&self, ticker: &str) -> Option<IndexSeries> {
        let slot = self.tickers.iter().position(|t| t == ticker)?;
        let entries = self
            .rows
            .iter()
            .filter_map(|(d, row)| row[slot].map(|b| (*d, b)))
            .collect();
        Some(TimeSeries::from_sorted_unique(entries))
    }

    /// One column per ticker, extracting `field` from each present bar.
    pub fn columns(&self, field: impl Fn(&Bar) -> f64) -> Vec<Vec<Option<f64>>> {
        (0..self.width())
            .map(|slot| {
                self.rows
                    .values()
                    .map(|row| row[slot].as_ref().map(&field))
                    .collect()
            })
            .collect()
    }

    /// Adjusted closes per ticker.
    #[must_use]
    pub fn prices(&self) -> Vec<Vec<Option<f64>>> {
        self.columns(Bar::price)
    }

    /// Volumes per ticker.
    #[must_use]
    pub fn volumes(&self) -> Vec<Vec<Option<f64>>> {
        self.columns(|b| b.volume)
    }

    /// Typical prices per ticker.
    #[must_use]
    pub fn typical_prices(&self) -> Vec<Vec<Option<f64>>> {
        self.columns(Bar::typical_price)
    }
}
