use crate::AmplitudeError;
use crate::indicators::frame::BreadthFrame;
use crate::indicators::rolling::{Values, cumsum, diff, mean_across, min_max_normalize};
use crate::table::IndicatorTable;

/// Cumulative on-balance volume weighted by price.
///
/// A day's flow is `volume * price`, signed `+1` when the price rose and `-1`
/// otherwise (the first day counts as unchanged, hence `-1`).
#[must_use]
pub fn on_balance_volume(prices: &[Option<f64>], volumes: &[Option<f64>]) -> Values {
    let changes = diff(prices);
    let flow: Values = prices
        .iter()
        .zip(volumes)
        .zip(&changes)
        .map(|((p, v), ch)| {
            let sign = if ch.unwrap_or(0.0) > 0.0 { 1.0 } else { -1.0 };
            p.zip(*v).map(|(p, v)| sign * v * p)
        })
        .collect();
    cumsum(&flow)
}

/// Cumulative net money flow from typical price.
///
/// A day's money flow `typical * volume` counts positive when the typical
/// price rose, negative when it fell, and zero otherwise.
#[must_use]
pub fn net_money_flow(typical: &[Option<f64>], volumes: &[Option<f64>]) -> Values {
    let changes = diff(typical);
    let flow: Values = typical
        .iter()
        .zip(volumes)
        .zip(&changes)
        .map(|((t, v), ch)| {
            let mf = t.zip(*v).map(|(t, v)| t * v);
            match ch {
                Some(c) if *c > 0.0 => mf,
                Some(c) if *c < 0.0 => mf.map(|m| -m),
                _ => Some(0.0),
            }
        })
        .collect();
    cumsum(&flow)
}

/// Bullish/bearish flags and strengths from two normalised series.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSignals {
    /// `1` when both series fell, else `0`.
    pub bearish: Vec<f64>,
    /// `1` when both series rose, else `0`.
    pub bullish: Vec<f64>,
    /// Sum of the two declines (magnitudes).
    pub bear_strength: Values,
    /// Sum of the two rises.
    pub bull_strength: Values,
}

impl FlowSignals {
    /// Derive signals from the day-over-day change of `obv` and `nmf`.
    #[must_use]
    pub fn from_normalized(obv: &[Option<f64>], nmf: &[Option<f64>]) -> Self {
        let obv_ch = diff(obv);
        let nmf_ch = diff(nmf);
        let both = |pred: fn(f64) -> bool| -> Vec<f64> {
            obv_ch
                .iter()
                .zip(&nmf_ch)
                .map(|(o, m)| match (o, m) {
                    (Some(o), Some(m)) if pred(*o) && pred(*m) => 1.0,
                    _ => 0.0,
                })
                .collect()
        };
        let strength = |part: fn(f64) -> f64| -> Values {
            obv_ch
                .iter()
                .zip(&nmf_ch)
                .map(|(o, m)| o.zip(*m).map(|(o, m)| part(o) + part(m)))
                .collect()
        };
        Self {
            bearish: both(|x| x < 0.0),
            bullish: both(|x| x > 0.0),
            bear_strength: strength(|x| -x.min(0.0)),
            bull_strength: strength(|x| x.max(0.0)),
        }
    }
}

fn push_signals(
    table: &mut IndicatorTable,
    prefix: &str,
    signals: FlowSignals,
) -> Result<(), AmplitudeError> {
    table.push_dense(format!("{prefix}Bearish"), signals.bearish)?;
    table.push_dense(format!("{prefix}Bullish"), signals.bullish)?;
    table.push_column(format!("{prefix}BearStrength"), signals.bear_strength)?;
    table.push_column(format!("{prefix}BullStrength"), signals.bull_strength)?;
    Ok(())
}

/// Close, volume, OBV and money-flow table for the index and the panel.
///
/// Component series are normalised per ticker so every ticker weighs the
/// same, then averaged across tickers per date.
///
/// # Errors
/// Returns `AmplitudeError::Data` if a column does not match the date axis.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "amplitude_core::indicators::obv", skip_all)
)]
pub fn close_volume_obv_table(frame: &BreadthFrame) -> Result<IndicatorTable, AmplitudeError> {
    let n = frame.len();
    let obv = on_balance_volume(&frame.index_price, &frame.index_volume);
    let nmf = net_money_flow(&frame.index_typical, &frame.index_volume);
    let obv_norm = min_max_normalize(&obv);
    let nmf_norm = min_max_normalize(&nmf);
    let signals = FlowSignals::from_normalized(&obv_norm, &nmf_norm);

    let mut comp_obv = Vec::with_capacity(frame.width());
    let mut comp_nmf = Vec::with_capacity(frame.width());
    for ((prices, volumes), typical) in frame
        .prices
        .iter()
        .zip(&frame.volumes)
        .zip(&frame.typical)
    {
        comp_obv.push(min_max_normalize(&on_balance_volume(prices, volumes)));
        comp_nmf.push(min_max_normalize(&net_money_flow(typical, volumes)));
    }
    let comp_obv_mean = mean_across(&comp_obv, n);
    let comp_nmf_mean = mean_across(&comp_nmf, n);
    let comp_signals = FlowSignals::from_normalized(&comp_obv_mean, &comp_nmf_mean);

    let mut table = IndicatorTable::new(frame.dates.clone());
    table.push_column("Adj Close", frame.index_price.clone())?;
    table.push_column("Volume", frame.index_volume.clone())?;
    table.push_column("OBV", obv)?;
    table.push_column("NMF_cum", nmf)?;
    table.push_column("OBV_norm", obv_norm)?;
    table.push_column("NMF_norm", nmf_norm)?;
    push_signals(&mut table, "", signals)?;
    table.push_column("Comp_OBV_norm_mean", comp_obv_mean)?;
    table.push_column("Comp_NMF_norm_mean", comp_nmf_mean)?;
    push_signals(&mut table, "Comp_", comp_signals)?;
    Ok(table)
}
