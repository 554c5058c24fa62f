//! Readers and writers for the persisted CSV layouts.
//!
//! Two shapes are supported:
//!
//! - Index files: one header row (`Date,Open,High,Low,Close,Adj Close,Volume`)
//!   followed by one row per session. Columns are matched by name so files
//!   written by other tools with extra or reordered columns still load.
//! - EOD files: the multi-level layout written for many tickers at once. Row 1
//!   holds the field of every column (`Price` label first), row 2 the ticker
//!   (`Ticker` label), an optional row 3 carries the `Date` index label.
//!
//! Parsers return raw rows in file order; duplicate reduction and sorting is
//! the caller's concern.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use amplitude_core::{AmplitudeError, Bar, IndexSeries, IndicatorTable, Panel, PanelRow};
use chrono::NaiveDate;

const INDEX_HEADER: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Field order of the EOD writer; matches what the download tooling emits.
const EOD_FIELDS: [Field; 6] = [
    Field::AdjClose,
    Field::Close,
    Field::High,
    Field::Low,
    Field::Open,
    Field::Volume,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "close" => Some(Self::Close),
            "adj close" | "adj_close" | "adjclose" => Some(Self::AdjClose),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::AdjClose => "Adj Close",
            Self::Volume => "Volume",
        }
    }

    const fn get(self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::AdjClose => bar.adj_close,
            Self::Volume => bar.volume,
        }
    }
}

/// Column positions of the six bar fields inside one record.
#[derive(Debug, Default, Clone, Copy)]
struct FieldSlots {
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    adj_close: Option<usize>,
    volume: Option<usize>,
}

impl FieldSlots {
    fn set(&mut self, field: Field, idx: usize) {
        let slot = match field {
            Field::Open => &mut self.open,
            Field::High => &mut self.high,
            Field::Low => &mut self.low,
            Field::Close => &mut self.close,
            Field::AdjClose => &mut self.adj_close,
            Field::Volume => &mut self.volume,
        };
        slot.get_or_insert(idx);
    }

    const fn has_close(&self) -> bool {
        self.close.is_some() || self.adj_close.is_some()
    }

    /// Build a bar from `record`; `None` when neither close is present.
    fn bar(&self, record: &csv::StringRecord) -> Option<Bar> {
        let num = |slot: Option<usize>| slot.and_then(|i| record.get(i)).and_then(parse_number);
        let adj = num(self.adj_close);
        let close = num(self.close).or(adj)?;
        Some(Bar::new(
            num(self.open).unwrap_or(close),
            num(self.high).unwrap_or(close),
            num(self.low).unwrap_or(close),
            close,
            adj.unwrap_or(close),
            num(self.volume).unwrap_or(0.0),
        ))
    }
}

/// Raw rows of an EOD file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EodRows {
    /// Tickers in order of first appearance in the header.
    pub tickers: Vec<String>,
    /// One row per data line, in file order.
    pub rows: Vec<(NaiveDate, PanelRow)>,
}

/// Parse a session date. Accepts `YYYY-MM-DD` with an optional time suffix.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split([' ', 'T']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn csv_err(label: &str, err: &csv::Error) -> AmplitudeError {
    AmplitudeError::csv(label, err.to_string())
}

fn open(path: &Path) -> Result<File, AmplitudeError> {
    File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AmplitudeError::not_found(path.display().to_string())
        } else {
            AmplitudeError::io(path, e)
        }
    })
}

/// Write through a sibling temporary file so a failed write leaves the old file intact.
fn write_atomically(
    path: &Path,
    render: impl FnOnce(&mut dyn Write) -> Result<(), AmplitudeError>,
) -> Result<(), AmplitudeError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| AmplitudeError::io(dir, e))?;
    }
    let tmp = path.with_extension("csv.tmp");
    let written = File::create(&tmp)
        .map_err(|e| AmplitudeError::io(&tmp, e))
        .and_then(|mut file| {
            render(&mut file)?;
            file.flush().map_err(|e| AmplitudeError::io(&tmp, e))
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path).map_err(|e| AmplitudeError::io(path, e))
}

/// Parse an index file from any reader.
///
/// # Errors
/// Returns `AmplitudeError::Csv` when the header has no close column or a
/// record cannot be read.
pub fn parse_index<R: Read>(reader: R, label: &str) -> Result<Vec<(NaiveDate, Bar)>, AmplitudeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(|e| csv_err(label, &e))?.clone();

    let date_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .unwrap_or(0);
    let mut slots = FieldSlots::default();
    for (i, h) in headers.iter().enumerate() {
        if let Some(field) = Field::parse(h) {
            slots.set(field, i);
        }
    }
    if !slots.has_close() {
        return Err(AmplitudeError::csv(label, "no Close or Adj Close column"));
    }

    let mut out = Vec::new();
    let mut bad_dates = 0usize;
    for record in rdr.records() {
        let record = record.map_err(|e| csv_err(label, &e))?;
        let Some(date) = record.get(date_col).and_then(parse_date) else {
            bad_dates += 1;
            continue;
        };
        if let Some(bar) = slots.bar(&record) {
            out.push((date, bar));
        }
    }
    if bad_dates > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(file = label, rows = bad_dates, "dropped rows with unparsable dates");
    }
    Ok(out)
}

/// Parse an EOD file from any reader.
///
/// # Errors
/// Returns `AmplitudeError::Csv` when the two header rows are missing or
/// disagree in width, or a record cannot be read.
pub fn parse_eod<R: Read>(reader: R, label: &str) -> Result<EodRows, AmplitudeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = rdr.records();
    let mut next_header = |what: &str| -> Result<csv::StringRecord, AmplitudeError> {
        records
            .next()
            .ok_or_else(|| AmplitudeError::csv(label, format!("missing {what} header row")))?
            .map_err(|e| csv_err(label, &e))
    };
    let fields = next_header("field")?;
    let tickers_row = next_header("ticker")?;
    if fields.len() != tickers_row.len() {
        return Err(AmplitudeError::csv(
            label,
            format!(
                "header rows disagree: {} fields, {} tickers",
                fields.len(),
                tickers_row.len()
            ),
        ));
    }

    let mut tickers: Vec<String> = Vec::new();
    let mut slot_of: BTreeMap<&str, usize> = BTreeMap::new();
    let mut slots: Vec<FieldSlots> = Vec::new();
    for (col, (field, ticker)) in fields.iter().zip(tickers_row.iter()).enumerate().skip(1) {
        let Some(field) = Field::parse(field) else {
            continue;
        };
        if ticker.is_empty() {
            continue;
        }
        let slot = *slot_of.entry(ticker).or_insert_with(|| {
            tickers.push(ticker.to_string());
            slots.push(FieldSlots::default());
            tickers.len() - 1
        });
        slots[slot].set(field, col);
    }
    if tickers.is_empty() {
        return Err(AmplitudeError::csv(label, "no ticker columns"));
    }

    let mut rows = Vec::new();
    let mut bad_dates = 0usize;
    for record in records {
        let record = record.map_err(|e| csv_err(label, &e))?;
        let first = record.get(0).unwrap_or_default();
        if rows.is_empty() && first.eq_ignore_ascii_case("date") {
            continue;
        }
        let Some(date) = parse_date(first) else {
            bad_dates += 1;
            continue;
        };
        let row: PanelRow = slots.iter().map(|s| s.bar(&record)).collect();
        rows.push((date, row));
    }
    if bad_dates > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(file = label, rows = bad_dates, "dropped rows with unparsable dates");
    }
    Ok(EodRows { tickers, rows })
}

/// Read an index file.
///
/// # Errors
/// `AmplitudeError::NotFound` if the file does not exist, `Io` or `Csv` otherwise.
pub fn read_index_csv(path: &Path) -> Result<Vec<(NaiveDate, Bar)>, AmplitudeError> {
    parse_index(open(path)?, &path.display().to_string())
}

/// Read an EOD file.
///
/// # Errors
/// `AmplitudeError::NotFound` if the file does not exist, `Io` or `Csv` otherwise.
pub fn read_eod_csv(path: &Path) -> Result<EodRows, AmplitudeError> {
    parse_eod(open(path)?, &path.display().to_string())
}

/// Read the distinct values of the `Code` column of a ticker list.
///
/// # Errors
/// `AmplitudeError::NotFound` if the file does not exist, `Csv` when there is
/// no `Code` column.
pub fn read_ticker_codes(path: &Path) -> Result<Vec<String>, AmplitudeError> {
    let label = path.display().to_string();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(open(path)?);
    let headers = rdr.headers().map_err(|e| csv_err(&label, &e))?;
    let col = headers
        .iter()
        .position(|h| h == "Code")
        .ok_or_else(|| AmplitudeError::csv(&label, "no Code column"))?;

    let mut codes: Vec<String> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| csv_err(&label, &e))?;
        match record.get(col) {
            Some(code) if !code.is_empty() && !codes.iter().any(|c| c == code) => {
                codes.push(code.to_string());
            }
            _ => {}
        }
    }
    Ok(codes)
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Render an index series in the index layout.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the writer fails.
pub fn render_index<W: Write>(writer: W, series: &IndexSeries) -> Result<(), AmplitudeError> {
    let mut w = csv::Writer::from_writer(writer);
    let fail = |e: csv::Error| AmplitudeError::io("index csv", e);
    w.write_record(INDEX_HEADER).map_err(fail)?;
    for (date, bar) in series.iter() {
        let mut record = vec![date.to_string()];
        record.extend(
            [Field::Open, Field::High, Field::Low, Field::Close, Field::AdjClose, Field::Volume]
                .map(|f| f.get(bar).to_string()),
        );
        w.write_record(&record).map_err(fail)?;
    }
    w.flush().map_err(|e| AmplitudeError::io("index csv", e))
}

/// Render a panel in the multi-level EOD layout.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the writer fails.
pub fn render_eod<W: Write>(writer: W, panel: &Panel) -> Result<(), AmplitudeError> {
    let mut w = csv::Writer::from_writer(writer);
    let fail = |e: csv::Error| AmplitudeError::io("eod csv", e);
    let width = panel.width();

    let mut fields = vec!["Price".to_string()];
    let mut tickers = vec!["Ticker".to_string()];
    for f in EOD_FIELDS {
        fields.extend(std::iter::repeat_n(f.label().to_string(), width));
        tickers.extend(panel.tickers().iter().cloned());
    }
    let mut date_row = vec![String::from("Date")];
    date_row.extend(std::iter::repeat_n(String::new(), width * EOD_FIELDS.len()));
    w.write_record(&fields).map_err(fail)?;
    w.write_record(&tickers).map_err(fail)?;
    w.write_record(&date_row).map_err(fail)?;

    for (date, row) in panel.rows().iter() {
        let mut record = vec![date.to_string()];
        for f in EOD_FIELDS {
            record.extend(row.iter().map(|b| fmt_opt(b.as_ref().map(|b| f.get(b)))));
        }
        w.write_record(&record).map_err(fail)?;
    }
    w.flush().map_err(|e| AmplitudeError::io("eod csv", e))
}

/// Render an indicator table: a `Date` column then one column per indicator.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the writer fails.
pub fn render_table<W: Write>(writer: W, table: &IndicatorTable) -> Result<(), AmplitudeError> {
    let mut w = csv::Writer::from_writer(writer);
    let fail = |e: csv::Error| AmplitudeError::io("table csv", e);
    let mut header = vec!["Date"];
    header.extend(table.names());
    w.write_record(&header).map_err(fail)?;
    for (row, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(table.columns().iter().map(|c| fmt_opt(c.values[row])));
        w.write_record(&record).map_err(fail)?;
    }
    w.flush().map_err(|e| AmplitudeError::io("table csv", e))
}

/// Write an index series to `path`, replacing any existing file.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the file cannot be written.
pub fn write_index_csv(path: &Path, series: &IndexSeries) -> Result<(), AmplitudeError> {
    write_atomically(path, |w| render_index(w, series))
}

/// Write a panel to `path` in the EOD layout, replacing any existing file.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the file cannot be written.
pub fn write_eod_csv(path: &Path, panel: &Panel) -> Result<(), AmplitudeError> {
    write_atomically(path, |w| render_eod(w, panel))
}

/// Write an indicator table to `path`.
///
/// # Errors
/// Returns `AmplitudeError::Io` when the file cannot be written.
pub fn write_table_csv(path: &Path, table: &IndicatorTable) -> Result<(), AmplitudeError> {
    write_atomically(path, |w| render_table(w, table))
}
