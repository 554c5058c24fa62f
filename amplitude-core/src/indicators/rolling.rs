//! Window primitives over columns with missing values.
//!
//! A column is a `[Option<f64>]`; `None` plays the part of NaN. A window
//! emits a value once it holds at least `min_periods` present values, so
//! `min_periods == window` reproduces the "full window required" rule.

use std::collections::VecDeque;

/// A column of optional values.
pub type Values = Vec<Option<f64>>;

/// Rolling sum over present values.
#[must_use]
pub fn rolling_sum(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = *v {
            sum += v;
            count += 1;
        }
        if i >= window {
            if let Some(old) = values[i - window] {
                sum -= old;
                count -= 1;
            }
        }
        out.push((window > 0 && count >= min_periods.max(1)).then_some(sum));
    }
    out
}

/// Rolling mean over present values.
#[must_use]
pub fn rolling_mean(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    window_stat(values, window, min_periods, |w| {
        w.iter().sum::<f64>() / w.len() as f64
    })
}

/// Rolling maximum; `O(n)` via a monotonic deque of present values.
#[must_use]
pub fn rolling_max(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    rolling_extreme(values, window, min_periods, |incoming, kept| incoming >= kept)
}

/// Rolling minimum; `O(n)` via a monotonic deque of present values.
#[must_use]
pub fn rolling_min(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    rolling_extreme(values, window, min_periods, |incoming, kept| incoming <= kept)
}

fn rolling_extreme(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Values {
    let mut out = Vec::with_capacity(values.len());
    let mut deque: VecDeque<(usize, f64)> = VecDeque::new();
    let mut count = 0usize;
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = *v {
            while deque.back().is_some_and(|&(_, kept)| dominates(v, kept)) {
                deque.pop_back();
            }
            deque.push_back((i, v));
            count += 1;
        }
        if i >= window && values[i - window].is_some() {
            count -= 1;
        }
        while deque.front().is_some_and(|&(j, _)| j + window <= i) {
            deque.pop_front();
        }
        let ready = window > 0 && count >= min_periods.max(1);
        out.push(if ready { deque.front().map(|&(_, x)| x) } else { None });
    }
    out
}

/// Rolling median over present values.
#[must_use]
pub fn rolling_median(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    window_stat(values, window, min_periods, median_of)
}

/// Rolling sample standard deviation (`ddof = 1`); needs two present values.
#[must_use]
pub fn rolling_std(values: &[Option<f64>], window: usize, min_periods: usize) -> Values {
    window_stat(values, window, min_periods.max(2), |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let ss: f64 = w.iter().map(|x| (x - mean).powi(2)).sum();
        (ss / (w.len() - 1) as f64).sqrt()
    })
}

/// Running maximum of present values seen so far.
#[must_use]
pub fn expanding_max(values: &[Option<f64>]) -> Values {
    expanding(values, f64::max)
}

/// Running minimum of present values seen so far.
#[must_use]
pub fn expanding_min(values: &[Option<f64>]) -> Values {
    expanding(values, f64::min)
}

fn expanding(values: &[Option<f64>], pick: impl Fn(f64, f64) -> f64) -> Values {
    let mut acc: Option<f64> = None;
    values
        .iter()
        .map(|v| {
            if let Some(v) = *v {
                acc = Some(acc.map_or(v, |a| pick(a, v)));
            }
            acc
        })
        .collect()
}

/// Exponential moving average with multiplier `2 / (period + 1)`.
///
/// The first value, at index `period - 1`, is the simple mean of the first
/// `period` inputs; earlier slots are `None`. Too-short input or a zero
/// period gives all `None`.
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Values {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);
    for (slot, &v) in out.iter_mut().zip(values).skip(period) {
        prev = v * k + prev * (1.0 - k);
        *slot = Some(prev);
    }
    out
}

/// First difference; `None` at the start and wherever either side is missing.
#[must_use]
pub fn diff(values: &[Option<f64>]) -> Values {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for (i, v) in values.iter().enumerate() {
        out.push(if i == 0 { None } else { v.zip(prev).map(|(a, b)| a - b) });
        prev = *v;
    }
    out
}

/// Cumulative sum that skips missing values; missing slots stay `None`.
#[must_use]
pub fn cumsum(values: &[Option<f64>]) -> Values {
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            v.map(|x| {
                acc += x;
                acc
            })
        })
        .collect()
}

/// Scale into `[0, 1]` using the column's own minimum and maximum.
///
/// A flat column has no range and maps to all `None`.
#[must_use]
pub fn min_max_normalize(values: &[Option<f64>]) -> Values {
    let present = values.iter().flatten();
    let lo = present.clone().copied().fold(f64::INFINITY, f64::min);
    let hi = present.copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    values
        .iter()
        .map(|v| v.and_then(|x| (range > 0.0).then(|| (x - lo) / range)))
        .collect()
}

/// Element-wise combination; `None` if either side is missing or the result is not finite.
pub fn zip_with(a: &[Option<f64>], b: &[Option<f64>], f: impl Fn(f64, f64) -> f64) -> Values {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.zip(*y).map(|(x, y)| f(x, y)).filter(|r| r.is_finite()))
        .collect()
}

/// Row-wise sum across columns, skipping missing values (an all-missing row sums to 0).
#[must_use]
pub fn sum_across(columns: &[Values], len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    for col in columns {
        for (acc, v) in out.iter_mut().zip(col) {
            if let Some(v) = v {
                *acc += v;
            }
        }
    }
    out
}

/// Row-wise mean across columns, skipping missing values; `None` when a row has none.
#[must_use]
pub fn mean_across(columns: &[Values], len: usize) -> Values {
    (0..len)
        .map(|i| {
            let (sum, n) = columns
                .iter()
                .filter_map(|c| c.get(i).copied().flatten())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            (n > 0).then(|| sum / n as f64)
        })
        .collect()
}

/// Row-wise maximum across columns, skipping missing values.
#[must_use]
pub fn max_across(columns: &[&[Option<f64>]], len: usize) -> Values {
    fold_across(columns, len, f64::max)
}

/// Row-wise minimum across columns, skipping missing values.
#[must_use]
pub fn min_across(columns: &[&[Option<f64>]], len: usize) -> Values {
    fold_across(columns, len, f64::min)
}

fn fold_across(columns: &[&[Option<f64>]], len: usize, pick: impl Fn(f64, f64) -> f64) -> Values {
    (0..len)
        .map(|i| {
            columns
                .iter()
                .filter_map(|c| c.get(i).copied().flatten())
                .reduce(&pick)
        })
        .collect()
}

pub(crate) fn median_of(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// Gathers the present values of each trailing window and applies `stat`.
fn window_stat(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
    stat: impl Fn(&[f64]) -> f64,
) -> Values {
    let mut buf: Vec<f64> = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            if window == 0 {
                return None;
            }
            let start = (i + 1).saturating_sub(window);
            buf.clear();
            buf.extend(values[start..=i].iter().flatten());
            (buf.len() >= min_periods.max(1)).then(|| stat(&buf))
        })
        .collect()
}
