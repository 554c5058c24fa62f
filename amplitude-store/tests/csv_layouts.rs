use std::path::PathBuf;

use amplitude_core::{AmplitudeError, Bar, IndicatorTable, MarketSource, TimeSeries};
use amplitude_store::codec::{parse_date, parse_eod, parse_index, render_eod, render_table};
use amplitude_store::{CsvStore, DataLayout, clean_index, clean_panel, read_ticker_codes};
use amplitude_types::{DuplicatePolicy, MarketDetails};
use chrono::NaiveDate;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const INDEX: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-02-01,10,12,9,11,10.5,1000
2024-02-02 00:00:00-03:00,11,13,10,12,,2000
not-a-date,1,1,1,1,1,1
2024-02-05,12,12,12,,,3000
2024-02-06,13,14,12,13,13,
";

const EOD: &str = "\
Price,Adj Close,Adj Close,Close,Close,Volume,Volume
Ticker,AAA,BBB,AAA,BBB,AAA,BBB
Date,,,,,,
2024-02-01,1.5,20,1.6,21,100,200
2024-02-02,,22,,23,,300
2024-02-01,9,9,9,9,9,9
";

#[test]
fn index_columns_are_found_by_name() {
    let rows = parse_index(INDEX.as_bytes(), "INDEX_T.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], (d(1), Bar::new(10.0, 12.0, 9.0, 11.0, 10.5, 1000.0)));
    // missing Adj Close falls back to Close
    assert_eq!(rows[1].1.adj_close, 12.0);
    // missing volume is zero
    assert_eq!(rows[2], (d(6), Bar::new(13.0, 14.0, 12.0, 13.0, 13.0, 0.0)));
}

#[test]
fn reordered_columns_and_lowercase_headers() {
    let csv = "volume,adj close,date\n5,2.5,2024-02-01\n";
    let rows = parse_index(csv.as_bytes(), "x").unwrap();
    assert_eq!(rows, vec![(d(1), Bar::new(2.5, 2.5, 2.5, 2.5, 2.5, 5.0))]);
}

#[test]
fn index_without_close_is_rejected() {
    let err = parse_index("Date,Open\n2024-02-01,1\n".as_bytes(), "bad.csv").unwrap_err();
    assert!(matches!(err, AmplitudeError::Csv { ref path, .. } if path == "bad.csv"));
}

#[test]
fn dates_accept_time_suffixes() {
    assert_eq!(parse_date("2024-02-03"), Some(d(3)));
    assert_eq!(parse_date("2024-02-03T00:00:00"), Some(d(3)));
    assert_eq!(parse_date(" 2024-02-03 00:00:00+00:00"), Some(d(3)));
    assert_eq!(parse_date("03/02/2024"), None);
}

#[test]
fn cleaning_keeps_first_duplicate_and_drops_open_session() {
    let rows = vec![
        (d(2), Bar::flat(2.0, 10.0)),
        (d(1), Bar::flat(1.0, 10.0)),
        (d(2), Bar::flat(9.0, 10.0)),
        (d(3), Bar::flat(3.0, 0.0)),
    ];
    let s = clean_index(rows, DuplicatePolicy::KeepFirst, "INDEX_X.csv").unwrap();
    assert_eq!(
        s.into_entries(),
        vec![(d(1), Bar::flat(1.0, 10.0)), (d(2), Bar::flat(2.0, 10.0))]
    );
}

#[test]
fn reject_policy_names_the_file() {
    let rows = vec![(d(1), Bar::flat(1.0, 1.0)), (d(1), Bar::flat(2.0, 1.0))];
    let err = clean_index(rows, DuplicatePolicy::Reject, "INDEX_X.csv").unwrap_err();
    assert!(matches!(err, AmplitudeError::DuplicateKey { ref series, .. } if series == "INDEX_X.csv"));
}

#[test]
fn eod_multi_header_becomes_a_panel() {
    let raw = parse_eod(EOD.as_bytes(), "EOD_T.csv").unwrap();
    assert_eq!(raw.tickers, vec!["AAA", "BBB"]);
    assert_eq!(raw.rows.len(), 3);

    let panel = clean_panel(raw, DuplicatePolicy::KeepFirst, "EOD_T.csv").unwrap();
    assert_eq!(panel.dates(), vec![d(1), d(2)]);
    let a1 = panel.bar(d(1), "AAA").unwrap();
    assert_eq!((a1.close, a1.adj_close, a1.volume), (1.6, 1.5, 100.0));
    assert!(panel.bar(d(2), "AAA").is_none());
    assert_eq!(panel.bar(d(2), "BBB").unwrap().volume, 300.0);
}

#[test]
fn eod_header_width_mismatch_is_rejected() {
    let csv = "Price,Close,Close\nTicker,AAA\n2024-02-01,1,2\n";
    assert!(matches!(
        parse_eod(csv.as_bytes(), "e"),
        Err(AmplitudeError::Csv { .. })
    ));
}

#[test]
fn eod_written_then_read_keeps_gaps() {
    let raw = parse_eod(EOD.as_bytes(), "in").unwrap();
    let panel = clean_panel(raw, DuplicatePolicy::KeepFirst, "in").unwrap();
    let mut buf = Vec::new();
    render_eod(&mut buf, &panel).unwrap();
    let back = clean_panel(
        parse_eod(buf.as_slice(), "out").unwrap(),
        DuplicatePolicy::KeepFirst,
        "out",
    )
    .unwrap();
    assert_eq!(back.tickers(), panel.tickers());
    assert_eq!(back.prices(), panel.prices());
    assert!(back.bar(d(2), "AAA").is_none());
}

#[test]
fn tables_render_missing_values_as_empty_cells() {
    let mut t = IndicatorTable::new(vec![d(1), d(2)]);
    t.push_column("MA5", vec![None, Some(1.25)]).unwrap();
    t.push_column("%>MA5", vec![Some(50.0), None]).unwrap();
    let mut buf = Vec::new();
    render_table(&mut buf, &t).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "Date,MA5,%>MA5\n2024-02-01,,50\n2024-02-02,1.25,\n"
    );
}

#[test]
fn store_loads_from_layout() {
    let dir = scratch("store_loads_from_layout");
    std::fs::write(dir.join("INDEX_^TST.csv"), INDEX).unwrap();
    std::fs::write(dir.join("EOD_Test.csv"), EOD).unwrap();
    let store = CsvStore::new(DataLayout::new(&dir, &dir));

    let index = store.load_index("^TST").unwrap();
    // the last row has zero volume and is dropped
    assert_eq!(index.keys().copied().collect::<Vec<_>>(), vec![d(1), d(2)]);

    let market = MarketDetails::new("^TST", "Test", Some("TEST.csv"));
    let panel = store.load_components(&market).unwrap();
    assert_eq!(panel.width(), 2);

    let missing = store.load_index("^NOPE").unwrap_err();
    assert!(missing.is_missing_input());

    let index_only = MarketDetails::new("^TST", "Test", None);
    assert!(store.load_components(&index_only).unwrap_err().is_missing_input());
}

#[test]
fn ticker_list_selects_and_orders_components() {
    let dir = scratch("store_ticker_list");
    let data = dir.join("data");
    let codes = dir.join("codes");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::create_dir_all(&codes).unwrap();
    std::fs::write(data.join("EOD_Test.csv"), EOD).unwrap();
    let store = CsvStore::new(DataLayout::new(&data, &codes));
    let market = MarketDetails::new("^TST", "Test", Some("TEST.csv"));

    // no list on disk: every EOD ticker
    assert_eq!(store.load_components(&market).unwrap().tickers(), ["AAA", "BBB"]);

    std::fs::write(codes.join("TEST.csv"), "Code,Name
BBB,Beta
AAA,Alpha
").unwrap();
    let panel = store.load_components(&market).unwrap();
    assert_eq!(panel.tickers(), ["BBB", "AAA"]);
    let (_, first) = panel.rows().iter().next().unwrap();
    assert_eq!(first[0].map(|b| b.close), Some(21.0));
    assert_eq!(first[1].map(|b| b.close), Some(1.6));

    // listed codes without EOD columns are skipped
    std::fs::write(codes.join("TEST.csv"), "Code
ZZZ
BBB
").unwrap();
    let panel = store.load_components(&market).unwrap();
    assert_eq!(panel.tickers(), ["BBB"]);
    assert_eq!(panel.len(), 2);
}

#[test]
fn ticker_codes_are_distinct_and_ordered() {
    let dir = scratch("ticker_codes");
    let path = dir.join("codes.csv");
    std::fs::write(&path, "Name,Code\nAlpha,AAA\nBeta,BBB\n,\nAgain,AAA\n").unwrap();
    assert_eq!(read_ticker_codes(&path).unwrap(), vec!["AAA", "BBB"]);

    std::fs::write(&path, "Name\nAlpha\n").unwrap();
    assert!(read_ticker_codes(&path).is_err());
}

#[test]
fn index_file_round_trips() {
    let dir = scratch("index_round_trip");
    let path = dir.join("INDEX_RT.csv");
    let series = TimeSeries::from_entries(vec![
        (d(1), Bar::new(1.0, 2.0, 0.5, 1.5, 1.25, 10.0)),
        (d(2), Bar::new(1.5, 2.5, 1.0, 2.0, 1.75, 20.0)),
    ])
    .unwrap();
    amplitude_store::write_index_csv(&path, &series).unwrap();
    let back = amplitude_store::read_index_csv(&path).unwrap();
    assert_eq!(back, series.into_entries());
    assert!(!path.with_extension("csv.tmp").exists());
}
