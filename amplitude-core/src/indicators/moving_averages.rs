use std::fmt;

use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::rolling::{Values, rolling_mean, rolling_sum, zip_with};
use crate::table::IndicatorTable;

/// Which average a column refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AverageKind {
    /// Simple moving average of the adjusted close.
    Ma,
    /// Volume-weighted moving average.
    Vwma,
}

impl AverageKind {
    /// Both kinds, in column order.
    pub const ALL: [Self; 2] = [Self::Ma, Self::Vwma];

    /// Column prefix ("MA" / "VWMA").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ma => "MA",
            Self::Vwma => "VWMA",
        }
    }
}

impl fmt::Display for AverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Simple moving average; needs a full window.
#[must_use]
pub fn sma(prices: &[Option<f64>], period: usize) -> Values {
    rolling_mean(prices, period, period)
}

/// Volume-weighted moving average; `None` when the window's volume sums to zero.
#[must_use]
pub fn vwma(prices: &[Option<f64>], volumes: &[Option<f64>], period: usize) -> Values {
    let pv = zip_with(prices, volumes, |p, v| p * v);
    let num = rolling_sum(&pv, period, period);
    let den = rolling_sum(volumes, period, period);
    zip_with(&num, &den, |n, d| n / d)
}

/// MA and VWMA columns of one instrument for a list of periods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovingAverages {
    periods: Vec<usize>,
    ma: Vec<Values>,
    vwma: Vec<Values>,
}

impl MovingAverages {
    /// Compute both averages for every period.
    #[must_use]
    pub fn compute(prices: &[Option<f64>], volumes: &[Option<f64>], periods: &[usize]) -> Self {
        Self {
            periods: periods.to_vec(),
            ma: periods.iter().map(|&p| sma(prices, p)).collect(),
            vwma: periods.iter().map(|&p| vwma(prices, volumes, p)).collect(),
        }
    }

    /// Periods in column order.
    #[must_use]
    pub fn periods(&self) -> &[usize] {
        &self.periods
    }

    /// Column for `kind` at `period`.
    #[must_use]
    pub fn get(&self, kind: AverageKind, period: usize) -> Option<&[Option<f64>]> {
        let i = self.periods.iter().position(|&p| p == period)?;
        let cols = match kind {
            AverageKind::Ma => &self.ma,
            AverageKind::Vwma => &self.vwma,
        };
        cols.get(i).map(Vec::as_slice)
    }

    /// Every column of `kind`, in period order.
    #[must_use]
    pub fn all(&self, kind: AverageKind) -> &[Values] {
        match kind {
            AverageKind::Ma => &self.ma,
            AverageKind::Vwma => &self.vwma,
        }
    }
}

/// Averages of the index and of each ticker in a frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketAverages {
    /// Index averages.
    pub index: MovingAverages,
    /// One entry per ticker, in frame order.
    pub tickers: Vec<MovingAverages>,
}

impl MarketAverages {
    /// Compute averages for the index and every ticker.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplitude_core::indicators::averages",
            skip(frame),
            fields(dates = frame.len(), tickers = frame.width()),
        )
    )]
    #[must_use]
    pub fn compute(frame: &BreadthFrame, periods: &[usize]) -> Self {
        let index = MovingAverages::compute(&frame.index_price, &frame.index_volume, periods);
        let tickers = frame
            .prices
            .iter()
            .zip(&frame.volumes)
            .map(|(p, v)| MovingAverages::compute(p, v, periods))
            .collect();
        Self { index, tickers }
    }
}

/// Index price followed by `MA{p}` and `VWMA{p}` for every period.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
pub fn moving_average_table(
    frame: &BreadthFrame,
    averages: &MarketAverages,
) -> Result<IndicatorTable, AmplitudeError> {
    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_column("Adj Close", frame.index_price.clone())?;
    table.push_column("Volume", frame.index_volume.clone())?;
    for &p in averages.index.periods() {
        for kind in AverageKind::ALL {
            let values = averages.index.get(kind, p).unwrap_or_default().to_vec();
            table.push_column(format!("{kind}{p}"), values)?;
        }
    }
    Ok(table)
}
