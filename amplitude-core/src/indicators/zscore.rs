use amplitude_types::ZScoreParams;

use crate::indicators::rolling::{Values, rolling_median};

/// Scale factor making the MAD comparable to a standard deviation under normality.
pub const MAD_SCALE: f64 = 1.4826;

/// Rolling robust z-score: distance from the rolling median in units of the
/// rolling median absolute deviation.
///
/// Undefined scores (missing input, zero MAD) become `0.0`. Scores are
/// clipped to `±clip` when the preset has one.
#[must_use]
pub fn rolling_robust_zscore(values: &[Option<f64>], params: ZScoreParams) -> Vec<f64> {
    let ZScoreParams {
        window,
        min_periods,
        clip,
    } = params;

    let median = rolling_median(values, window, min_periods);
    let deviation: Values = values
        .iter()
        .zip(&median)
        .map(|(v, m)| v.zip(*m).map(|(v, m)| (v - m).abs()))
        .collect();
    let mad = rolling_median(&deviation, window, min_periods);

    values
        .iter()
        .zip(median.iter().zip(&mad))
        .map(|(v, (m, d))| {
            let z = match (v, m, d) {
                (Some(v), Some(m), Some(d)) if *d != 0.0 => (v - m) / (d * MAD_SCALE),
                _ => 0.0,
            };
            let z = if z.is_finite() { z } else { 0.0 };
            clip.map_or(z, |c| z.clamp(-c, c))
        })
        .collect()
}
