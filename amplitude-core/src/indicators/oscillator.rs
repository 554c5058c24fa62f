use amplitude_types::{AnalysisConfig, OscillatorKind, ZScoreParams};

use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::moving_averages::{AverageKind, MovingAverages};
use crate::indicators::rolling::{
    Values, max_across, min_across, rolling_max, rolling_mean, rolling_min, rolling_std, zip_with,
};
use crate::indicators::zscore::rolling_robust_zscore;
use crate::table::IndicatorTable;

const EPS: f64 = 1e-9;

/// Row-wise max, min and range of a set of average columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Highest average per date.
    pub max: Values,
    /// Lowest average per date.
    pub min: Values,
    /// `max - min`.
    pub range: Values,
}

impl Envelope {
    /// Envelope of `columns` over `len` dates.
    #[must_use]
    pub fn of(columns: &[&[Option<f64>]], len: usize) -> Self {
        let max = max_across(columns, len);
        let min = min_across(columns, len);
        let range = zip_with(&max, &min, |a, b| a - b);
        Self { max, min, range }
    }
}

/// Normalise `series` into an oscillator over a trailing `lookback`.
///
/// - `MinMax`: position within the rolling min/max, clipped to `[0, 1]`.
/// - `ZScore`: distance from the rolling mean in rolling standard deviations.
/// - `RobustZScore`: [`rolling_robust_zscore`] with `robust`.
///
/// Windows need a single observation. Undefined values (flat window, zero
/// deviation, missing input) become `0.0`.
#[must_use]
pub fn oscillate(
    series: &[Option<f64>],
    kind: OscillatorKind,
    lookback: usize,
    robust: ZScoreParams,
) -> Vec<f64> {
    match kind {
        OscillatorKind::MinMax => {
            let lo = rolling_min(series, lookback, 1);
            let hi = rolling_max(series, lookback, 1);
            series
                .iter()
                .zip(lo.iter().zip(&hi))
                .map(|(v, (lo, hi))| match (v, lo, hi) {
                    (Some(v), Some(lo), Some(hi)) if hi > lo => {
                        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
                    }
                    _ => 0.0,
                })
                .collect()
        }
        OscillatorKind::ZScore => {
            let mean = rolling_mean(series, lookback, 1);
            let std = rolling_std(series, lookback, 1);
            series
                .iter()
                .zip(mean.iter().zip(&std))
                .map(|(v, (m, s))| match (v, m, s) {
                    (Some(v), Some(m), Some(s)) if *s != 0.0 => (v - m) / s,
                    _ => 0.0,
                })
                .collect()
        }
        OscillatorKind::RobustZScore => rolling_robust_zscore(series, robust),
    }
}

/// MA range oscillator of the index.
///
/// Envelopes over all index MAs and VWMAs, and over the same without the
/// configured long period (`MA_no{p}_*`). The reduced VWMA and MA ranges are
/// divided by price and fed to [`oscillate`].
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::ma_range", skip_all)
)]
pub fn ma_range_table(
    frame: &BreadthFrame,
    index: &MovingAverages,
    cfg: &AnalysisConfig,
) -> Result<IndicatorTable, AmplitudeError> {
    let n = frame.len();
    let excluded = cfg.range_excluded_period;
    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_column("Adj Close", frame.index_price.clone())?;

    for kind in AverageKind::ALL {
        let all: Vec<&[Option<f64>]> = index.all(kind).iter().map(Vec::as_slice).collect();
        let reduced: Vec<&[Option<f64>]> = index
            .periods()
            .iter()
            .filter(|&&p| p != excluded)
            .filter_map(|&p| index.get(kind, p))
            .collect();

        if !all.is_empty() {
            let env = Envelope::of(&all, n);
            table.push_column(format!("{kind}_max"), env.max)?;
            table.push_column(format!("{kind}_min"), env.min)?;
            table.push_column(format!("{kind}_range"), env.range)?;
        }
        if reduced.is_empty() {
            continue;
        }
        let env = Envelope::of(&reduced, n);
        let pct = zip_with(&env.range, &frame.index_price, |r, p| r / (p + EPS));
        let osc = oscillate(
            &pct,
            cfg.oscillator,
            cfg.oscillator_lookback,
            cfg.zscore_mode.params(),
        );
        table.push_column(format!("{kind}_no{excluded}_max"), env.max)?;
        table.push_column(format!("{kind}_no{excluded}_min"), env.min)?;
        table.push_column(format!("{kind}_no{excluded}_range"), env.range)?;
        table.push_column(format!("{kind}_no{excluded}_range_pct"), pct)?;
        table.push_dense(format!("{kind}_no{excluded}_osc"), osc)?;
    }
    Ok(table)
}
