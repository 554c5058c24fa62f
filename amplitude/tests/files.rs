use std::path::PathBuf;

use amplitude::{
    Amplitude, AmplitudeConfig, AmplitudeError, Bar, CacheConfig, MarketDetails, TimeSeries,
    config_to_json, load_config,
};
use amplitude_core::Panel;
use amplitude_store::{write_eod_csv, write_index_csv};
use chrono::{Duration, NaiveDate};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn ramp(days: usize, start: f64) -> TimeSeries<NaiveDate, Bar> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let rows = (0..days)
        .map(|i| {
            let p = start + i as f64;
            (first + Duration::days(i as i64), Bar::new(p, p + 1.0, p - 1.0, p, p, 1_000.0))
        })
        .collect();
    TimeSeries::from_entries(rows).unwrap()
}

fn seed_market(root: &std::path::Path) {
    let data = root.join("data");
    let codes = root.join("codes");
    std::fs::create_dir_all(&codes).unwrap();
    std::fs::write(codes.join("T.csv"), "Code,Name\nAAA,Alpha\nBBB,Beta\n").unwrap();
    write_index_csv(&data.join("INDEX_^T.csv"), &ramp(40, 100.0)).unwrap();
    let panel = Panel::from_series(vec![
        ("AAA".into(), ramp(40, 10.0)),
        ("BBB".into(), ramp(35, 20.0)),
    ])
    .unwrap();
    write_eod_csv(&data.join("EOD_Test.csv"), &panel).unwrap();
}

#[test]
fn config_folders_resolve_against_the_file() {
    let dir = scratch("config_resolve");
    let path = dir.join("amplitude.json");
    std::fs::write(
        &path,
        r#"{ "locations": { "data_folder": "store" }, "cache": { "max_entries": 4 } }"#,
    )
    .unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.locations.data_folder, dir.join("store"));
    assert_eq!(cfg.locations.codes_folder, dir.join("codes"));
    assert_eq!(cfg.cache.map(|c| c.max_entries), Some(4));
    assert_eq!(cfg.cache.map(|c| c.ttl_ms), Some(CacheConfig::default().ttl_ms));
}

#[test]
fn config_errors_are_classified() {
    let dir = scratch("config_errors");
    let missing = load_config(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(missing, AmplitudeError::NotFound { .. }));

    let broken = dir.join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(load_config(&broken), Err(AmplitudeError::Config(_))));

    let invalid = dir.join("invalid.json");
    std::fs::write(&invalid, r#"{ "analysis": { "ema_fast": 50, "ema_slow": 10 } }"#).unwrap();
    assert!(matches!(load_config(&invalid), Err(AmplitudeError::Config(_))));
}

#[test]
fn rendered_config_loads_back() {
    let dir = scratch("config_render");
    let path = dir.join("seed.json");
    let cfg = AmplitudeConfig {
        cache: Some(CacheConfig::default()),
        ..AmplitudeConfig::default()
    };
    std::fs::write(&path, config_to_json(&cfg).unwrap()).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.analysis, cfg.analysis);
    assert_eq!(loaded.cache, cfg.cache);
    assert_eq!(loaded.locations.output_folder, dir.join("output"));
}

#[test]
fn analysis_from_csv_files_writes_every_table() {
    let root = scratch("csv_analysis");
    seed_market(&root);
    let cfg = AmplitudeConfig {
        locations: amplitude::FileLocations::default().resolved_against(&root),
        ..AmplitudeConfig::default()
    };
    let amp = Amplitude::from_config(&cfg).unwrap();
    assert_eq!(amp.source_name(), "csv-store");

    let market = MarketDetails::new("^T", "Test", Some("T.csv"));
    let data = amp.load_market(&market).unwrap();
    assert_eq!(data.panel.tickers(), ["AAA", "BBB"]);
    assert_eq!(data.dates().len(), 40);

    let report = amp.compute(&data).unwrap();
    let written = report.write_csv(&cfg.locations.output_folder).unwrap();
    assert_eq!(written.len(), 8);
    assert!(written[0].ends_with("Test_moving_averages.csv"));

    let text = std::fs::read_to_string(&written[1]).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("Date,"));
    assert!(header.contains("%>MA5"));
    assert_eq!(text.lines().count(), 41);
}

#[test]
fn missing_market_files_surface_as_not_found() {
    let root = scratch("csv_missing");
    let cfg = AmplitudeConfig {
        locations: amplitude::FileLocations::default().resolved_against(&root),
        ..AmplitudeConfig::default()
    };
    let amp = Amplitude::from_config(&cfg).unwrap();
    let err = amp
        .analyze(&MarketDetails::new("^NONE", "None", Some("NONE.csv")))
        .unwrap_err();
    assert!(err.is_missing_input());
}
