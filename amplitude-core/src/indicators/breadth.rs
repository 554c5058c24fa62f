//! Counts of component tickers trading above or below their own averages.

use amplitude_types::{AnalysisConfig, MaGroup};

use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::moving_averages::{AverageKind, MarketAverages};
use crate::indicators::rolling::rolling_mean;
use crate::table::IndicatorTable;

const EPS: f64 = 1e-9;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    Below,
}

// Per date: number of tickers whose price is strictly on `side` of every listed average.
fn count_beyond(
    frame: &BreadthFrame,
    averages: &MarketAverages,
    kind: AverageKind,
    periods: &[usize],
    side: Side,
) -> Vec<f64> {
    let mut counts = vec![0.0; frame.len()];
    for (prices, avgs) in frame.prices.iter().zip(&averages.tickers) {
        let cols: Vec<&[Option<f64>]> =
            periods.iter().filter_map(|&p| avgs.get(kind, p)).collect();
        if cols.len() != periods.len() {
            continue;
        }
        for (i, count) in counts.iter_mut().enumerate() {
            let Some(price) = prices[i] else { continue };
            let beyond = cols.iter().all(|c| match (c[i], side) {
                (Some(a), Side::Above) => price > a,
                (Some(a), Side::Below) => price < a,
                (None, _) => false,
            });
            if beyond {
                *count += 1.0;
            }
        }
    }
    counts
}

fn percents(frame: &BreadthFrame, counts: &[f64]) -> Vec<Option<f64>> {
    counts.iter().map(|&c| frame.percent_of_width(c)).collect()
}

fn dense(values: Vec<f64>) -> Vec<Option<f64>> {
    values.into_iter().map(Some).collect()
}

// Per date: tickers clearly above and clearly below one average. A ticker
// within `band` of its average, or without a price or average, is neutral.
fn classify_band(
    frame: &BreadthFrame,
    averages: &MarketAverages,
    kind: AverageKind,
    period: usize,
    band: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut above = vec![0.0; frame.len()];
    let mut below = vec![0.0; frame.len()];
    for (prices, avgs) in frame.prices.iter().zip(&averages.tickers) {
        let Some(avg) = avgs.get(kind, period) else {
            continue;
        };
        for i in 0..frame.len() {
            let (Some(price), Some(a)) = (prices[i], avg[i]) else {
                continue;
            };
            let diff = (price - a) / (price + EPS);
            if diff > band {
                above[i] += 1.0;
            } else if diff < -band {
                below[i] += 1.0;
            }
        }
    }
    (above, below)
}

/// Over/under breadth for every period and kind.
///
/// For each `{kind}{p}` the table holds the index average, then the count of
/// tickers above, below and within `neutral_band_pct` of their own average
/// (`Nº>`, `Nº<`, `Nº≈`), then the same as percentages of the panel width
/// (`%>`, `%<`, `%≈`) smoothed by a trailing mean of `smooth_window` rows.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::over_under", skip_all)
)]
pub fn over_under_table(
    frame: &BreadthFrame,
    averages: &MarketAverages,
    cfg: &AnalysisConfig,
) -> Result<IndicatorTable, AmplitudeError> {
    let width = frame.width() as f64;
    let smooth = |counts: &[f64]| {
        let pct = percents(frame, counts);
        if cfg.smooth_window > 1 {
            rolling_mean(&pct, cfg.smooth_window, 1)
        } else {
            pct
        }
    };

    let mut table = IndicatorTable::new(frame.dates.clone());
    for &p in averages.index.periods() {
        for kind in AverageKind::ALL {
            let label = format!("{kind}{p}");
            let (above, below) = classify_band(frame, averages, kind, p, cfg.neutral_band_pct);
            let neutral: Vec<f64> =
                above.iter().zip(&below).map(|(a, b)| width - a - b).collect();

            let index_avg = averages.index.get(kind, p).unwrap_or_default().to_vec();
            table.push_column(label.clone(), index_avg)?;
            table.push_column(format!("%>{label}"), smooth(&above))?;
            table.push_column(format!("%<{label}"), smooth(&below))?;
            table.push_column(format!("%≈{label}"), smooth(&neutral))?;
            table.push_column(format!("Nº>{label}"), dense(above))?;
            table.push_column(format!("Nº<{label}"), dense(below))?;
            table.push_column(format!("Nº≈{label}"), dense(neutral))?;
        }
    }
    Ok(table)
}

/// Label of a ladder rung, e.g. `VWMA5&12&25`.
#[must_use]
pub fn ladder_label(kind: AverageKind, periods: &[usize]) -> String {
    let joined: Vec<String> = periods.iter().map(ToString::to_string).collect();
    format!("{kind}{}", joined.join("&"))
}

/// Trend ladders: tickers above (or below) all averages of each group prefix.
///
/// For a group `[5, 12, 25]` the rungs are `[5]`, `[5, 12]` and `[5, 12, 25]`.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::trend_ladders", skip_all)
)]
pub fn trend_ladder_table(
    frame: &BreadthFrame,
    averages: &MarketAverages,
    groups: &[MaGroup],
) -> Result<IndicatorTable, AmplitudeError> {
    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_column("Adj Close", frame.index_price.clone())?;
    for group in groups {
        for kind in AverageKind::ALL {
            for end in 1..=group.periods.len() {
                let rung = &group.periods[..end];
                let label = ladder_label(kind, rung);
                // two groups can open with the same rung
                if table.column(&format!("Nº>{label}")).is_some() {
                    continue;
                }
                let above = count_beyond(frame, averages, kind, rung, Side::Above);
                let below = count_beyond(frame, averages, kind, rung, Side::Below);
                table.push_column(format!("%>{label}"), percents(frame, &above))?;
                table.push_column(format!("%<{label}"), percents(frame, &below))?;
                table.push_column(format!("Nº>{label}"), dense(above))?;
                table.push_column(format!("Nº<{label}"), dense(below))?;
            }
        }
    }
    Ok(table)
}
