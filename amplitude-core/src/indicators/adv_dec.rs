use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::rolling::{diff, ema, zip_with};
use crate::table::IndicatorTable;

/// Daily advancing/declining issue and volume totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvanceDecline {
    /// Tickers whose price rose.
    pub advancing: Vec<f64>,
    /// Tickers whose price fell.
    pub declining: Vec<f64>,
    /// Volume of advancing tickers.
    pub advancing_volume: Vec<f64>,
    /// Volume of declining tickers.
    pub declining_volume: Vec<f64>,
}

impl AdvanceDecline {
    /// Count advances and declines from each ticker's day-over-day change.
    ///
    /// The first date, and any date where a ticker lacks today's or
    /// yesterday's price, counts as neither.
    #[must_use]
    pub fn compute(frame: &BreadthFrame) -> Self {
        let n = frame.len();
        let mut out = Self {
            advancing: vec![0.0; n],
            declining: vec![0.0; n],
            advancing_volume: vec![0.0; n],
            declining_volume: vec![0.0; n],
        };
        for (prices, volumes) in frame.prices.iter().zip(&frame.volumes) {
            for (i, change) in diff(prices).into_iter().enumerate() {
                let Some(change) = change else { continue };
                let volume = volumes[i].unwrap_or(0.0);
                if change > 0.0 {
                    out.advancing[i] += 1.0;
                    out.advancing_volume[i] += volume;
                } else if change < 0.0 {
                    out.declining[i] += 1.0;
                    out.declining_volume[i] += volume;
                }
            }
        }
        out
    }

    /// Arms index `(adv / dec) / (adv_vol / dec_vol)`; `None` when any term is zero.
    #[must_use]
    pub fn trin(&self) -> Vec<Option<f64>> {
        (0..self.advancing.len())
            .map(|i| {
                let parts = [
                    self.advancing[i],
                    self.declining[i],
                    self.advancing_volume[i],
                    self.declining_volume[i],
                ];
                if parts.contains(&0.0) {
                    return None;
                }
                let [a, d, av, dv] = parts;
                Some((a / d) / (av / dv))
            })
            .collect()
    }

    /// Advancing minus declining issues.
    #[must_use]
    pub fn net(&self) -> Vec<f64> {
        self.advancing
            .iter()
            .zip(&self.declining)
            .map(|(a, d)| a - d)
            .collect()
    }
}

/// Advance/decline table with TRIN, cumulative A/D line and McClellan oscillator.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::adv_dec", skip_all)
)]
pub fn adv_dec_table(
    frame: &BreadthFrame,
    fast: usize,
    slow: usize,
) -> Result<IndicatorTable, AmplitudeError> {
    let ad = AdvanceDecline::compute(frame);
    let net = ad.net();
    let cumulative: Vec<f64> = net
        .iter()
        .scan(0.0, |acc, d| {
            *acc += d;
            Some(*acc)
        })
        .collect();

    let diff_fast = ema(&net, fast);
    let diff_slow = ema(&net, slow);
    let mcclellan = zip_with(&diff_fast, &diff_slow, |f, s| f - s);

    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_dense("Advancing", ad.advancing.clone())?;
    table.push_dense("Declining", ad.declining.clone())?;
    table.push_dense("Advancing_Volume", ad.advancing_volume.clone())?;
    table.push_dense("Declining_Volume", ad.declining_volume.clone())?;
    table.push_column("TRIN", ad.trin())?;
    table.push_column("idx_close", frame.index_price.clone())?;
    table.push_dense("A/D_diff", net)?;
    table.push_dense("A/D_cum_diff", cumulative)?;
    table.push_column(format!("Advancing_EMA_{fast}"), ema(&ad.advancing, fast))?;
    table.push_column(format!("Advancing_EMA_{slow}"), ema(&ad.advancing, slow))?;
    table.push_column(format!("Declining_EMA_{fast}"), ema(&ad.declining, fast))?;
    table.push_column(format!("Declining_EMA_{slow}"), ema(&ad.declining, slow))?;
    table.push_column(format!("A/D_diff_EMA_{fast}"), diff_fast)?;
    table.push_column(format!("A/D_diff_EMA_{slow}"), diff_slow)?;
    table.push_column("McClellan_Oscillator", mcclellan)?;
    Ok(table)
}
