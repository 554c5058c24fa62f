use chrono::NaiveDate;

use crate::AmplitudeError;
use crate::indicators::rolling::Values;
use crate::types::{Bar, IndexSeries, Panel};

/// Column-oriented view of an aligned index and panel.
///
/// Every column has one slot per date. Index columns are dense; panel
/// columns carry `None` where a ticker had no bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BreadthFrame {
    /// Shared date axis, ascending.
    pub dates: Vec<NaiveDate>,
    /// Index adjusted closes.
    pub index_price: Values,
    /// Index volumes.
    pub index_volume: Values,
    /// Index typical prices.
    pub index_typical: Values,
    /// Ticker symbols in column order.
    pub tickers: Vec<String>,
    /// Adjusted closes per ticker.
    pub prices: Vec<Values>,
    /// Volumes per ticker.
    pub volumes: Vec<Values>,
    /// Typical prices per ticker.
    pub typical: Vec<Values>,
}

impl BreadthFrame {
    /// Build the frame from an index series and a panel over the same dates.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` when the two date axes differ; align
    /// them first.
    pub fn from_aligned(index: &IndexSeries, panel: &Panel) -> Result<Self, AmplitudeError> {
        let index = index.clone().sorted();
        let dates: Vec<NaiveDate> = index.keys().copied().collect();
        if dates != panel.dates() {
            return Err(AmplitudeError::Data(format!(
                "index has {} dates and panel {}; series are not aligned",
                dates.len(),
                panel.len()
            )));
        }
        let col = |f: fn(&Bar) -> f64| index.values().map(|b| Some(f(b))).collect::<Values>();
        Ok(Self {
            index_price: col(Bar::price),
            index_volume: col(|b| b.volume),
            index_typical: col(Bar::typical_price),
            dates,
            tickers: panel.tickers().to_vec(),
            prices: panel.prices(),
            volumes: panel.volumes(),
            typical: panel.typical_prices(),
        })
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when there are no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of component tickers.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tickers.len()
    }

    /// `count / width * 100`, or `None` for a panel without tickers.
    #[must_use]
    pub fn percent_of_width(&self, count: f64) -> Option<f64> {
        (self.width() > 0).then(|| count / self.width() as f64 * 100.0)
    }
}
