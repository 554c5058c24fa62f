use amplitude_types::HiLoWindows;

use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::rolling::{Values, expanding_max, expanding_min, rolling_max, rolling_min};
use crate::table::IndicatorTable;

// Adds +1 (or -1) to `acc` wherever the price touches its reference extreme.
fn mark(acc: &mut [f64], prices: &[Option<f64>], reference: &Values, high: bool, sign: f64) {
    for ((a, p), r) in acc.iter_mut().zip(prices).zip(reference) {
        if let (Some(p), Some(r)) = (p, r) {
            let touched = if high { p >= r } else { p <= r };
            if touched {
                *a += sign;
            }
        }
    }
}

/// New highs and lows across the panel.
///
/// Per ticker a date scores `+1` when the price is at its all-time, yearly,
/// quarterly or monthly high and `-1` at the matching low; rolling windows
/// need to be full. Columns `ATH, ATL, 12MH, 12ML, 3MH, 3ML, 1MH, 1ML` sum the
/// scores across tickers and `ATH-ATL` and friends add each pair.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::hi_lo", skip_all)
)]
pub fn hi_lo_table(
    frame: &BreadthFrame,
    windows: HiLoWindows,
) -> Result<IndicatorTable, AmplitudeError> {
    let n = frame.len();
    let spans: [(&str, Option<usize>); 4] = [
        ("AT", None),
        ("12M", Some(windows.year)),
        ("3M", Some(windows.quarter)),
        ("1M", Some(windows.month)),
    ];

    let mut highs = vec![vec![0.0; n]; spans.len()];
    let mut lows = vec![vec![0.0; n]; spans.len()];
    for prices in &frame.prices {
        for (k, (_, window)) in spans.iter().enumerate() {
            let (hi, lo) = match window {
                None => (expanding_max(prices), expanding_min(prices)),
                Some(w) => (rolling_max(prices, *w, *w), rolling_min(prices, *w, *w)),
            };
            mark(&mut highs[k], prices, &hi, true, 1.0);
            mark(&mut lows[k], prices, &lo, false, -1.0);
        }
    }

    let mut table = IndicatorTable::new(frame.dates.clone());
    for (k, (tag, _)) in spans.iter().enumerate() {
        table.push_dense(format!("{tag}H"), highs[k].clone())?;
        table.push_dense(format!("{tag}L"), lows[k].clone())?;
    }
    for (k, (tag, _)) in spans.iter().enumerate() {
        let net = highs[k].iter().zip(&lows[k]).map(|(h, l)| h + l).collect();
        table.push_dense(format!("{tag}H-{tag}L"), net)?;
    }
    Ok(table)
}
