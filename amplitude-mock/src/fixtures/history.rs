use amplitude_core::{Bar, IndexSeries, TimeSeries};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// First fixture session (a Monday).
pub fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default()
}

/// `n` weekday sessions starting at [`start`].
pub fn sessions(n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(n);
    let mut day = start();
    while out.len() < n {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Stable seed of a symbol (FNV-1a).
pub fn seed(symbol: &str) -> u64 {
    symbol.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[allow(clippy::cast_precision_loss)]
fn bar(seed: u64, i: usize) -> Bar {
    let base = 50.0 + (seed % 50) as f64;
    let period = 10.0 + (seed % 7) as f64;
    let drift = if seed % 3 == 0 { -0.05 } else { 0.05 };
    let t = i as f64;
    let price = base.mul_add(0.2 * (t / period).sin(), base) + drift * t;
    let price = (price * 100.0).round() / 100.0;
    let volume = 1_000.0 + ((seed % 97) * 37 + i as u64 * 13) as f64 % 500.0;
    Bar::new(
        price * 0.995,
        price * 1.01,
        price * 0.99,
        price,
        price,
        volume,
    )
}

/// Deterministic daily bars of `symbol` on the first `days` sessions.
///
/// Sessions where `skip(i)` is true are left out.
pub fn series(symbol: &str, days: usize, skip: impl Fn(usize) -> bool) -> IndexSeries {
    let s = seed(symbol);
    let entries = sessions(days)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !skip(*i))
        .map(|(i, date)| (date, bar(s, i)))
        .collect();
    TimeSeries::from_entries(entries).unwrap_or_default()
}
