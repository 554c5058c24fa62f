use std::path::{Path, PathBuf};
use std::process::Command;

use amplitude::{Bar, IndexSeries, Panel, TimeSeries};
use amplitude_store::{read_index_csv, write_eod_csv, write_index_csv};
use assert_cmd::prelude::*;
use chrono::{Duration, NaiveDate};
use predicates::prelude::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap() + Duration::days(offset)
}

fn ramp(range: std::ops::Range<i64>, base: f64) -> IndexSeries {
    let rows = range
        .map(|i| (day(i), Bar::flat(base + i as f64, 500.0)))
        .collect();
    TimeSeries::from_entries(rows).unwrap()
}

fn amplitude(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("amplitude").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn seed_test_market(dir: &Path) {
    write_index_csv(&dir.join("data/INDEX_^BVSP.csv"), &ramp(0..30, 100.0)).unwrap();
    let panel = Panel::from_series(vec![
        ("PETR4.SA".into(), ramp(0..30, 30.0)),
        ("VALE3.SA".into(), ramp(2..30, 60.0)),
    ])
    .unwrap();
    write_eod_csv(&dir.join("data/EOD_3 ticker test.csv"), &panel).unwrap();
}

#[test]
fn markets_lists_the_registry() {
    let dir = scratch("cli_markets");
    amplitude(&dir)
        .arg("markets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bovespa").and(predicate::str::contains("IBOV.csv")));

    amplitude(&dir)
        .args(["markets", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"idx_code\": \"GC=F\""));
}

#[test]
fn align_prints_common_dates() {
    let dir = scratch("cli_align");
    write_index_csv(&dir.join("a.csv"), &ramp(0..5, 10.0)).unwrap();
    write_index_csv(&dir.join("b.csv"), &ramp(3..9, 20.0)).unwrap();

    amplitude(&dir)
        .args(["align", "a.csv", "b.csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Date,a,b"))
        .stdout(predicate::str::contains("2024-02-04,13,23"))
        .stdout(predicate::str::contains("2024-02-06").not())
        .stderr(predicate::str::contains("2 common dates"));
}

#[test]
fn align_reports_missing_files() {
    let dir = scratch("cli_align_missing");
    amplitude(&dir)
        .args(["align", "nope.csv", "nada.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn analyze_writes_tables_and_skips_missing_markets() {
    let dir = scratch("cli_analyze");
    seed_test_market(&dir);

    amplitude(&dir)
        .args(["analyze", "3 ticker test", "Gold", "--lookback", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 ticker test: 10 rows, 8 tables"))
        .stdout(predicate::str::contains("Gold: skipped"));

    let table = dir.join("output/3 ticker test_adv_dec.csv");
    let text = std::fs::read_to_string(table).unwrap();
    assert_eq!(text.lines().count(), 11);
}

#[test]
fn analyze_rejects_unknown_markets() {
    let dir = scratch("cli_analyze_unknown");
    amplitude(&dir)
        .args(["analyze", "Atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown market 'Atlantis'"));
}

#[test]
fn config_flag_resolves_folders() {
    let dir = scratch("cli_config");
    seed_test_market(&dir.join("store"));
    std::fs::write(
        dir.join("amp.json"),
        r#"{ "locations": { "data_folder": "store/data", "output_folder": "out" } }"#,
    )
    .unwrap();

    let elsewhere = scratch("cli_config_cwd");
    amplitude(&elsewhere)
        .args(["--config"])
        .arg(dir.join("amp.json"))
        .args(["analyze", "13"])
        .assert()
        .success();
    assert!(dir.join("out/3 ticker test_hi_lo.csv").exists());

    amplitude(&elsewhere)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ema_slow\": 39"));
}

#[test]
fn update_merges_fresh_index_rows() {
    let dir = scratch("cli_update");
    seed_test_market(&dir);
    write_index_csv(&dir.join("fresh.csv"), &ramp(28..35, 200.0)).unwrap();

    amplitude(&dir)
        .args(["update", "Bovespa", "--index", "fresh.csv", "--end", "2024-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("written (32 rows)"));

    let stored = read_index_csv(&dir.join("data/INDEX_^BVSP.csv")).unwrap();
    assert_eq!(stored.len(), 32);
    assert_eq!(stored.last().map(|(d, b)| (*d, b.close)), Some((day(31), 231.0)));

    amplitude(&dir)
        .args(["update", "1", "--index", "fresh.csv", "--end", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn update_needs_something_to_merge() {
    let dir = scratch("cli_update_nothing");
    amplitude(&dir)
        .args(["update", "Bovespa", "--end", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));

    amplitude(&dir)
        .args(["update", "Bovespa", "--index", "x.csv", "--end", "March"])
        .assert()
        .failure();
}
