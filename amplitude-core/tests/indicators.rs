use amplitude_core::indicators::adv_dec::adv_dec_table;
use amplitude_core::indicators::breadth::{ladder_label, over_under_table, trend_ladder_table};
use amplitude_core::indicators::compression::compression_table;
use amplitude_core::indicators::hi_lo::hi_lo_table;
use amplitude_core::indicators::moving_averages::{
    AverageKind, MarketAverages, moving_average_table, vwma,
};
use amplitude_core::indicators::obv::close_volume_obv_table;
use amplitude_core::indicators::oscillator::{ma_range_table, oscillate};
use amplitude_core::{Bar, BreadthFrame, IndexSeries, Panel, TimeSeries};
use amplitude_types::{AnalysisConfig, HiLoWindows, MaGroup, OscillatorKind, ZScoreMode};
use chrono::NaiveDate;

fn d(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + chrono::Days::new(i as u64)
}

fn config() -> AnalysisConfig {
    AnalysisConfig {
        ma_groups: vec![MaGroup::new("short", [2, 3])],
        range_excluded_period: 3,
        oscillator_lookback: 5,
        hi_lo: HiLoWindows {
            month: 2,
            quarter: 3,
            year: 4,
        },
        ema_fast: 2,
        ema_slow: 3,
        ..AnalysisConfig::default()
    }
}

// A rises 1..=6, B falls 6..=1, C is flat at 5 with a gap on the third day.
fn frame() -> BreadthFrame {
    let index: IndexSeries = TimeSeries::from_entries(
        (0..6)
            .map(|i| (d(i), Bar::flat(10.0 + i as f64, 1_000.0)))
            .collect(),
    )
    .unwrap();
    let a = (0..6).map(|i| (d(i), Bar::flat(1.0 + i as f64, 100.0)));
    let b = (0..6).map(|i| (d(i), Bar::flat(6.0 - i as f64, 200.0)));
    let c = (0..6)
        .filter(|i| *i != 2)
        .map(|i| (d(i), Bar::flat(5.0, 50.0)));
    let panel = Panel::from_series(vec![
        ("A".into(), TimeSeries::from_entries(a.collect()).unwrap()),
        ("B".into(), TimeSeries::from_entries(b.collect()).unwrap()),
        ("C".into(), TimeSeries::from_entries(c.collect()).unwrap()),
    ])
    .unwrap();
    BreadthFrame::from_aligned(&index, &panel).unwrap()
}

fn averages(frame: &BreadthFrame) -> MarketAverages {
    MarketAverages::compute(frame, &config().ma_periods())
}

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn frame_requires_aligned_dates() {
    let index: IndexSeries =
        TimeSeries::from_entries(vec![(d(0), Bar::flat(1.0, 1.0))]).unwrap();
    let panel = Panel::from_series(vec![(
        "A".into(),
        TimeSeries::from_entries(vec![(d(1), Bar::flat(1.0, 1.0))]).unwrap(),
    )])
    .unwrap();
    assert!(BreadthFrame::from_aligned(&index, &panel).is_err());
}

#[test]
fn moving_average_columns() {
    let f = frame();
    let t = moving_average_table(&f, &averages(&f)).unwrap();
    let names: Vec<&str> = t.names().collect();
    assert_eq!(names, ["Adj Close", "Volume", "MA2", "VWMA2", "MA3", "VWMA3"]);
    assert_eq!(t.column("MA2").unwrap()[0], None);
    assert!(approx(t.column("MA2").unwrap()[1], 10.5));
    assert!(approx(t.column("VWMA3").unwrap()[2], 11.0));
}

#[test]
fn vwma_is_missing_without_volume() {
    let p = vec![Some(1.0), Some(2.0)];
    let v = vec![Some(0.0), Some(0.0)];
    assert_eq!(vwma(&p, &v, 2), vec![None, None]);
}

#[test]
fn over_under_counts_tickers_against_their_own_average() {
    let f = frame();
    let cfg = AnalysisConfig {
        smooth_window: 1,
        ..config()
    };
    let t = over_under_table(&f, &averages(&f), &cfg).unwrap();
    // day 2: A (3 vs 2.5) above, B (4 vs 4.5) below, C has no price
    assert_eq!(t.column("Nº>MA2").unwrap()[2], Some(1.0));
    assert_eq!(t.column("Nº<MA2").unwrap()[2], Some(1.0));
    assert_eq!(t.column("Nº≈MA2").unwrap()[2], Some(1.0));
    assert!(approx(t.column("%>MA2").unwrap()[2], 100.0 / 3.0));
    // no average yet: everyone is neutral
    assert_eq!(t.column("Nº≈MA2").unwrap()[0], Some(3.0));
    assert!(approx(t.column("%≈MA2").unwrap()[0], 100.0));
    // C sits exactly on its average once it has one
    assert_eq!(t.column("Nº>MA2").unwrap()[5], Some(1.0));
    assert_eq!(t.column("Nº≈MA2").unwrap()[5], Some(1.0));
    assert_eq!(t.column("MA2").unwrap()[5], Some(14.5));

    let names: Vec<&str> = t.names().take(7).collect();
    assert_eq!(
        names,
        ["MA2", "%>MA2", "%<MA2", "%≈MA2", "Nº>MA2", "Nº<MA2", "Nº≈MA2"]
    );
}

#[test]
fn prices_inside_the_neutral_band_are_not_above() {
    let index: IndexSeries = TimeSeries::from_entries(
        (0..3).map(|i| (d(i), Bar::flat(10.0, 1_000.0))).collect(),
    )
    .unwrap();
    let closes = [100.0, 100.0, 100.3];
    let ticker = TimeSeries::from_entries(
        (0..3).map(|i| (d(i), Bar::flat(closes[i], 100.0))).collect(),
    )
    .unwrap();
    let panel = Panel::from_series(vec![("ONE".into(), ticker)]).unwrap();
    let f = BreadthFrame::from_aligned(&index, &panel).unwrap();
    let avgs = MarketAverages::compute(&f, &[2]);

    // 100.3 is 0.15% above its 2-day average of 100.15
    let banded = AnalysisConfig {
        smooth_window: 1,
        ..config()
    };
    let t = over_under_table(&f, &avgs, &banded).unwrap();
    assert_eq!(t.column("Nº>MA2").unwrap(), [Some(0.0); 3]);
    assert_eq!(t.column("Nº≈MA2").unwrap(), [Some(1.0); 3]);

    let strict = AnalysisConfig {
        neutral_band_pct: 0.0,
        ..banded
    };
    let t = over_under_table(&f, &avgs, &strict).unwrap();
    assert_eq!(t.column("Nº>MA2").unwrap(), [Some(0.0), Some(0.0), Some(1.0)]);
    assert_eq!(t.column("Nº≈MA2").unwrap()[2], Some(0.0));
}

#[test]
fn over_under_percentages_are_smoothed_but_counts_are_not() {
    let f = frame();
    let cfg = AnalysisConfig {
        smooth_window: 3,
        ..config()
    };
    let t = over_under_table(&f, &averages(&f), &cfg).unwrap();
    // raw %>MA2 is 0, 1/3, 1/3 over the first three days
    assert!(approx(t.column("%>MA2").unwrap()[0], 0.0));
    assert!(approx(t.column("%>MA2").unwrap()[1], 100.0 / 6.0));
    assert!(approx(t.column("%>MA2").unwrap()[2], 200.0 / 9.0));
    assert_eq!(t.column("Nº>MA2").unwrap()[2], Some(1.0));
}

#[test]
fn range_oscillator_defaults_to_robust_zscore() {
    assert_eq!(AnalysisConfig::default().oscillator, OscillatorKind::RobustZScore);
    assert_eq!(OscillatorKind::default(), OscillatorKind::RobustZScore);
    assert_eq!(AnalysisConfig::default().neutral_band_pct, 0.005);
    assert_eq!(AnalysisConfig::default().smooth_window, 3);
}

#[test]
fn ladders_require_every_average_of_the_rung() {
    let f = frame();
    let cfg = config();
    let t = trend_ladder_table(&f, &averages(&f), &cfg.ma_groups).unwrap();
    assert_eq!(ladder_label(AverageKind::Vwma, &[2, 3]), "VWMA2&3");
    // MA3 is undefined on day 1, so nobody clears the two-rung ladder yet
    assert_eq!(t.column("Nº>MA2").unwrap()[1], Some(1.0));
    assert_eq!(t.column("Nº>MA2&3").unwrap()[1], Some(0.0));
    assert_eq!(t.column("Nº>MA2&3").unwrap()[5], Some(1.0));
    assert_eq!(t.column("Nº<MA2&3").unwrap()[5], Some(1.0));
}

#[test]
fn compression_sums_relative_distances() {
    let f = frame();
    let cfg = config();
    let t = compression_table(&f, &averages(&f), &cfg.ma_groups).unwrap();
    // last day, MA2: A (6-5.5)/6, B (1-1.5)/1, C 0
    let a = 0.5 / 6.0;
    let b = -0.5;
    assert!(approx(t.column("Abs_C-MA2").unwrap()[5], a - b));
    assert!(approx(t.column("Dir_C-MA2").unwrap()[5], a + b));
    let group = t.column("Abs_VWMA_short_sum").unwrap()[5].unwrap();
    let parts = t.column("Abs_C-VWMA2").unwrap()[5].unwrap()
        + t.column("Abs_C-VWMA3").unwrap()[5].unwrap();
    assert!((group - parts).abs() < 1e-12);
}

#[test]
fn highs_and_lows_score_each_ticker() {
    let f = frame();
    let t = hi_lo_table(&f, config().hi_lo).unwrap();
    // last day: A at its high, B at its low, C flat touches both
    assert_eq!(t.column("ATH").unwrap()[5], Some(2.0));
    assert_eq!(t.column("ATL").unwrap()[5], Some(-2.0));
    assert_eq!(t.column("ATH-ATL").unwrap()[5], Some(0.0));
    // a 4-day window is not full on day 2
    assert_eq!(t.column("12MH").unwrap()[2], Some(0.0));
    let names: Vec<&str> = t.names().collect();
    assert_eq!(
        names,
        [
            "ATH", "ATL", "12MH", "12ML", "3MH", "3ML", "1MH", "1ML", "ATH-ATL", "12MH-12ML",
            "3MH-3ML", "1MH-1ML"
        ]
    );
}

#[test]
fn advance_decline_and_trin() {
    let f = frame();
    let t = adv_dec_table(&f, 2, 3).unwrap();
    assert_eq!(t.column("Advancing").unwrap()[1], Some(1.0));
    assert_eq!(t.column("Declining").unwrap()[1], Some(1.0));
    assert!(approx(t.column("TRIN").unwrap()[1], 2.0));
    assert_eq!(t.column("TRIN").unwrap()[0], None);
    assert_eq!(t.column("A/D_cum_diff").unwrap()[5], Some(0.0));
    assert_eq!(t.column("McClellan_Oscillator").unwrap()[1], None);
    assert!(approx(t.column("McClellan_Oscillator").unwrap()[2], 0.0));
}

#[test]
fn obv_of_a_rising_index_is_bullish() {
    let f = frame();
    let t = close_volume_obv_table(&f).unwrap();
    assert_eq!(t.column("OBV_norm").unwrap()[5], Some(1.0));
    assert_eq!(t.column("Bullish").unwrap()[0], Some(0.0));
    assert_eq!(t.column("Bullish").unwrap()[3], Some(1.0));
    assert_eq!(t.column("Bearish").unwrap()[3], Some(0.0));
    assert!(t.column("Comp_OBV_norm_mean").unwrap()[5].is_some());
}

#[test]
fn range_oscillator_columns_follow_the_excluded_period() {
    let f = frame();
    let avgs = averages(&f);
    let cfg = AnalysisConfig {
        oscillator: OscillatorKind::MinMax,
        ..config()
    };
    let t = ma_range_table(&f, &avgs.index, &cfg).unwrap();
    for name in ["MA_max", "MA_no3_range_pct", "VWMA_no3_osc"] {
        assert!(t.column(name).is_some(), "missing {name}");
    }
    assert!(
        t.column("MA_no3_osc")
            .unwrap()
            .iter()
            .all(|v| v.is_some_and(|x| (0.0..=1.0).contains(&x)))
    );
}

#[test]
fn oscillator_kinds() {
    let series: Vec<Option<f64>> = [1.0, 2.0, 3.0, 2.0, 1.0].into_iter().map(Some).collect();
    let mm = oscillate(&series, OscillatorKind::MinMax, 3, ZScoreMode::Swing.params());
    assert_eq!(mm, vec![0.0, 1.0, 1.0, 0.0, 0.0]);

    let z = oscillate(&series, OscillatorKind::ZScore, 3, ZScoreMode::Swing.params());
    assert_eq!(z[0], 0.0);
    assert!((z[1] - 0.707_106_781_186_547_5).abs() < 1e-9);

    let flat = vec![Some(4.0); 5];
    let r = oscillate(&flat, OscillatorKind::RobustZScore, 3, ZScoreMode::Swing.params());
    assert!(r.iter().all(|x| *x == 0.0));
}
