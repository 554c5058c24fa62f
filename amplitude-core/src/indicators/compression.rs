use amplitude_types::MaGroup;

use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::moving_averages::{AverageKind, MarketAverages};
use crate::indicators::rolling::{Values, zip_with};
use crate::table::IndicatorTable;

/// Per-ticker distance from an average, relative to price: `(price - avg) / price`.
#[must_use]
pub fn relative_distance(prices: &[Option<f64>], average: &[Option<f64>]) -> Values {
    zip_with(prices, average, |p, a| (p - a) / p)
}

/// Compression and dispersion of the panel around its averages.
///
/// `Abs_C-{kind}{p}` sums the absolute relative distances across tickers and
/// `Dir_C-{kind}{p}` the signed ones. Each group adds `Abs_VWMA_{group}_sum`
/// and `Dir_VWMA_{group}_sum` over its periods.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::compression", skip_all)
)]
pub fn compression_table(
    frame: &BreadthFrame,
    averages: &MarketAverages,
    groups: &[MaGroup],
) -> Result<IndicatorTable, AmplitudeError> {
    let n = frame.len();
    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_column("Adj Close", frame.index_price.clone())?;

    for &p in averages.index.periods() {
        for kind in AverageKind::ALL {
            let mut abs = vec![0.0; n];
            let mut dir = vec![0.0; n];
            for (prices, avgs) in frame.prices.iter().zip(&averages.tickers) {
                let Some(avg) = avgs.get(kind, p) else { continue };
                for (i, d) in relative_distance(prices, avg).into_iter().enumerate() {
                    if let Some(d) = d {
                        abs[i] += d.abs();
                        dir[i] += d;
                    }
                }
            }
            table.push_dense(format!("Abs_C-{kind}{p}"), abs)?;
            table.push_dense(format!("Dir_C-{kind}{p}"), dir)?;
        }
    }

    for group in groups {
        for prefix in ["Abs", "Dir"] {
            let mut total = vec![0.0; n];
            let mut any = false;
            for p in &group.periods {
                if let Some(col) = table.column(&format!("{prefix}_C-VWMA{p}")) {
                    any = true;
                    for (t, v) in total.iter_mut().zip(col) {
                        *t += v.unwrap_or(0.0);
                    }
                }
            }
            if any {
                table.push_dense(format!("{prefix}_VWMA_{}_sum", group.name), total)?;
            }
        }
    }
    Ok(table)
}
