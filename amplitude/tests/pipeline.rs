use std::sync::Arc;

use amplitude::{
    Amplitude, AmplitudeError, AnalysisConfig, Bar, CacheConfig, MarketDetails, TimeSeries,
    default_markets, find_market,
};
use amplitude_core::Panel;
use amplitude_mock::{DynamicMockSource, MockBehavior, MockSource, sessions};
use amplitude_types::MaGroup;
use chrono::NaiveDate;

fn small_config() -> AnalysisConfig {
    AnalysisConfig {
        ma_groups: vec![MaGroup::new("short", [5, 10]), MaGroup::new("long", [20])],
        range_excluded_period: 20,
        oscillator_lookback: 30,
        ..AnalysisConfig::default()
    }
}

fn mock_amplitude(sessions: usize) -> Amplitude {
    Amplitude::builder()
        .with_source(Arc::new(MockSource::with_sessions(sessions)))
        .analysis(small_config())
        .build()
        .unwrap()
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

fn flat(days: &[u32], price: f64) -> TimeSeries<NaiveDate, Bar> {
    TimeSeries::from_entries(days.iter().map(|day| (d(*day), Bar::flat(price, 10.0))).collect())
        .unwrap()
}

#[test]
fn build_requires_a_source() {
    let err = Amplitude::builder().build().err().unwrap();
    assert!(matches!(err, AmplitudeError::InvalidArg(_)));
}

#[test]
fn build_validates_the_analysis() {
    let bad = AnalysisConfig {
        ema_fast: 40,
        ema_slow: 20,
        ..AnalysisConfig::default()
    };
    let err = Amplitude::builder()
        .with_source(Arc::new(MockSource::new()))
        .analysis(bad)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, AmplitudeError::Config(_)));
}

#[test]
fn analyze_produces_every_table_on_the_common_dates() {
    let amp = mock_amplitude(120);
    let market = find_market(&default_markets(), "3 ticker test").unwrap();
    let data = amp.load_market(&market).unwrap();
    assert_eq!(data.dates(), sessions(120));
    assert_eq!(data.panel.width(), 3);

    let report = amp.compute(&data).unwrap();
    let names: Vec<&str> = report.tables().iter().map(|(n, _)| *n).collect();
    assert_eq!(
        names,
        [
            "moving_averages",
            "over_under",
            "trend_ladders",
            "compression",
            "ma_range",
            "hi_lo",
            "adv_dec",
            "close_volume_obv"
        ]
    );
    for (name, table) in report.tables() {
        assert_eq!(table.len(), 120, "{name}");
    }
    assert!(report.moving_averages.column("VWMA20").is_some());
    assert!(report.over_under.column("%>MA5").is_some());
    assert!(report.trend_ladders.column("Nº>MA5&10").is_some());
    assert!(report.ma_range.column("MA_no20_osc").is_some());
}

#[test]
fn graph_lookback_cuts_output_tables() {
    let amp = Amplitude::builder()
        .with_source(Arc::new(MockSource::with_sessions(80)))
        .analysis(AnalysisConfig {
            graph_lookback: Some(15),
            ..small_config()
        })
        .build()
        .unwrap();
    let market = MarketDetails::new("^BVSP", "Bovespa", Some("IBOV.csv"));
    let report = amp.analyze(&market).unwrap();
    for (_, table) in report.tables() {
        assert_eq!(table.len(), 15);
        assert_eq!(table.dates().last(), sessions(80).last());
    }
}

#[test]
fn index_only_markets_have_empty_breadth() {
    let amp = mock_amplitude(40);
    let gold = find_market(&default_markets(), "Gold").unwrap();
    let data = amp.load_market(&gold).unwrap();
    assert_eq!(data.panel.width(), 0);
    assert_eq!(data.panel.len(), 40);

    let report = amp.compute(&data).unwrap();
    let counts = report.over_under.column("Nº>MA5").unwrap();
    assert!(counts.iter().all(|c| *c == Some(0.0)));
    assert!(report.over_under.column("%>MA5").unwrap().iter().all(Option::is_none));
}

#[test]
fn disjoint_index_and_components_are_no_common_dates() {
    let (src, ctl) = DynamicMockSource::new_with_controller("scripted");
    ctl.set_index("^IDX", MockBehavior::Return(flat(&[1, 2, 3], 10.0)));
    ctl.set_components(
        "Mkt",
        MockBehavior::Return(
            Panel::from_series(vec![("AAA".into(), flat(&[8, 9], 1.0))]).unwrap(),
        ),
    );
    let amp = Amplitude::builder()
        .with_source(Arc::new(src))
        .analysis(small_config())
        .build()
        .unwrap();
    let market = MarketDetails::new("^IDX", "Mkt", Some("m.csv"));
    let err = amp.load_market(&market).unwrap_err();
    assert!(matches!(err, AmplitudeError::NoCommonDates { .. }));
}

#[test]
fn partial_overlap_keeps_only_common_dates() {
    let (src, ctl) = DynamicMockSource::new_with_controller("scripted");
    ctl.set_index("^IDX", MockBehavior::Return(flat(&[1, 2, 3, 5], 10.0)));
    ctl.set_components(
        "Mkt",
        MockBehavior::Return(
            Panel::from_series(vec![("AAA".into(), flat(&[2, 3, 4], 1.0))]).unwrap(),
        ),
    );
    let amp = Amplitude::builder()
        .with_source(Arc::new(src))
        .analysis(small_config())
        .build()
        .unwrap();
    let data = amp
        .load_market(&MarketDetails::new("^IDX", "Mkt", Some("m.csv")))
        .unwrap();
    assert_eq!(data.dates(), vec![d(2), d(3)]);
    assert_eq!(data.panel.dates(), vec![d(2), d(3)]);
}

#[test]
fn source_errors_propagate() {
    let amp = mock_amplitude(10);
    let failing = MarketDetails::new("FAIL", "Anything", None);
    assert!(matches!(
        amp.analyze(&failing),
        Err(AmplitudeError::Data(_))
    ));
    let empty = MarketDetails::new("EMPTY", "Nothing", None);
    assert!(amp.analyze(&empty).unwrap_err().is_missing_input());
}

#[test]
fn auxiliary_index_is_forward_filled_onto_the_timeline() {
    let (src, ctl) = DynamicMockSource::new_with_controller("scripted");
    ctl.set_index("AUX", MockBehavior::Return(flat(&[3, 6], 2.0)));
    let amp = Amplitude::builder()
        .with_source(Arc::new(src))
        .build()
        .unwrap();

    let timeline = [d(1), d(2), d(4), d(6), d(7)];
    let aux = amp.align_auxiliary("AUX", &timeline).unwrap();
    assert_eq!(aux.keys().copied().collect::<Vec<_>>(), timeline.to_vec());
    assert!(aux.values().all(|v| *v == Some(2.0)));

    ctl.set_index("VOID", MockBehavior::Return(TimeSeries::new()));
    assert!(amp.align_auxiliary("VOID", &timeline).is_err());
}

#[test]
fn batches_sort_outcomes_into_reports_skips_and_failures() {
    let amp = mock_amplitude(60);
    let markets = vec![
        MarketDetails::new("^BVSP", "Bovespa", Some("IBOV.csv")),
        MarketDetails::new("EMPTY", "Nothing", None),
        MarketDetails::new("^X", "FAIL", Some("x.csv")),
    ];
    let batch = amp.analyze_many(&markets).unwrap();
    assert_eq!(batch.reports.len(), 1);
    assert_eq!(batch.reports[0].market.market, "Bovespa");
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.failed.len(), 1);
    assert!(!batch.is_clean());

    assert!(amp.analyze_many(&[]).is_err());
    let twice = vec![markets[0].clone(), markets[0].clone()];
    assert!(matches!(
        amp.analyze_many(&twice),
        Err(AmplitudeError::InvalidArg(_))
    ));
}

#[test]
fn cached_orchestrator_loads_each_file_once() {
    let (src, ctl) = DynamicMockSource::new_with_controller("scripted");
    ctl.set_index("^IDX", MockBehavior::Return(flat(&[1, 2, 3], 10.0)));
    let amp = Amplitude::builder()
        .with_source(Arc::new(src))
        .analysis(small_config())
        .cache(CacheConfig::default())
        .build()
        .unwrap();
    let market = MarketDetails::new("^IDX", "Index only", None);
    amp.load_market(&market).unwrap();
    amp.load_market(&market).unwrap();
    amp.align_auxiliary("^IDX", &[d(1)]).unwrap();
    assert_eq!(ctl.calls("^IDX"), 1);
}
