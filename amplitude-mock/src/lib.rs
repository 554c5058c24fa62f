//! amplitude-mock
//!
//! In-memory [`MarketSource`] implementations for tests and demos. No file or
//! network access is involved and every load is deterministic.
//!
//! - [`MockSource`] synthesises smooth daily bars for any code.
//! - [`DynamicMockSource`] returns whatever a test scripted through its
//!   [`MockController`].

use amplitude_core::{AmplitudeError, IndexSeries, MarketSource, Panel, TimeSeries};
use amplitude_types::MarketDetails;

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockSource, MockBehavior, MockController};
pub use fixtures::history::{seed, sessions};

/// Number of sessions generated when no length is configured (about a year).
pub const DEFAULT_SESSIONS: usize = 260;

/// Fixture source with deterministic data.
///
/// Special codes: an index or market named `FAIL` returns a data error and
/// one named `EMPTY` returns no rows.
#[derive(Debug, Clone, Copy)]
pub struct MockSource {
    sessions: usize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Source generating [`DEFAULT_SESSIONS`] sessions per series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sessions: DEFAULT_SESSIONS,
        }
    }

    /// Source generating `sessions` sessions per series.
    #[must_use]
    pub const fn with_sessions(sessions: usize) -> Self {
        Self { sessions }
    }

    /// Component tickers the source reports for `market`.
    #[must_use]
    pub fn tickers(market: &MarketDetails) -> Vec<String> {
        fixtures::markets::tickers(&market.market)
    }

    fn maybe_fail(code: &str, what: &str) -> Result<(), AmplitudeError> {
        match code {
            "FAIL" => Err(AmplitudeError::Data(format!("forced failure: {what}"))),
            _ => Ok(()),
        }
    }
}

impl MarketSource for MockSource {
    fn name(&self) -> &'static str {
        "amplitude-mock"
    }

    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError> {
        Self::maybe_fail(idx_code, "load_index")?;
        if idx_code == "EMPTY" {
            return Ok(TimeSeries::new());
        }
        Ok(fixtures::history::series(idx_code, self.sessions, |_| false))
    }

    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError> {
        Self::maybe_fail(&market.market, "load_components")?;
        if !market.has_components() {
            return Err(AmplitudeError::not_found(format!(
                "component list for {}",
                market.market
            )));
        }
        if market.market == "EMPTY" {
            return Ok(Panel::default());
        }
        let series = Self::tickers(market)
            .into_iter()
            .enumerate()
            .map(|(slot, ticker)| {
                let s = fixtures::history::series(&ticker, self.sessions, |i| {
                    fixtures::markets::has_gap(slot, i)
                });
                (ticker, s)
            })
            .collect();
        Panel::from_series(series)
    }
}
