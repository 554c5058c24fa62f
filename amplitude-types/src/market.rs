//! Registry of known markets and their persisted file names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One analysable market: an index plus, optionally, its component list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDetails {
    /// Index ticker as stored in `INDEX_{idx_code}.csv` (e.g. "^BVSP").
    pub idx_code: String,
    /// Market label as stored in `EOD_{market}.csv` (e.g. "Bovespa").
    pub market: String,
    /// File in the codes folder listing the component tickers, if any.
    pub codes_csv: Option<String>,
}

impl MarketDetails {
    /// Build a market entry.
    pub fn new(
        idx_code: impl Into<String>,
        market: impl Into<String>,
        codes_csv: Option<&str>,
    ) -> Self {
        Self {
            idx_code: idx_code.into(),
            market: market.into(),
            codes_csv: codes_csv.map(str::to_string),
        }
    }

    /// True when the market has a component panel (breadth can be computed).
    #[must_use]
    pub const fn has_components(&self) -> bool {
        self.codes_csv.is_some()
    }
}

/// The built-in market registry keyed by menu number.
#[must_use]
pub fn default_markets() -> BTreeMap<u32, MarketDetails> {
    let rows: [(u32, &str, &str, Option<&str>); 14] = [
        (1, "^BVSP", "Bovespa", Some("IBOV.csv")),
        (2, "^IXIC", "NASDAQ", Some("NASDAQ.csv")),
        (3, "^FTLC", "FTSE350", Some("FTSE350.csv")),
        (4, "^GSPC", "SP500", Some("SP500.csv")),
        (5, "^DJI", "Dow30", Some("DOW.csv")),
        (6, "GC=F", "Gold", None),
        (7, "BTC-USD", "Bitcoin", None),
        (8, "BRL=X", "USDollar", None),
        (9, "CL=F", "Crude", None),
        (10, "ZN=F", "10yrT-note", None),
        (11, "ZT=F", "2yrT-note", None),
        (12, "^VIX", "VIX", None),
        (13, "^BVSP", "3 ticker test", Some("TEST.csv")),
        (14, "^IGCX", "iGov", Some("IGCX.csv")),
    ];
    rows.into_iter()
        .map(|(key, idx, market, codes)| (key, MarketDetails::new(idx, market, codes)))
        .collect()
}

/// Look up a market by menu number or by (case-insensitive) market label.
#[must_use]
pub fn find_market(markets: &BTreeMap<u32, MarketDetails>, needle: &str) -> Option<MarketDetails> {
    if let Ok(key) = needle.trim().parse::<u32>() {
        return markets.get(&key).cloned();
    }
    markets
        .values()
        .find(|m| m.market.eq_ignore_ascii_case(needle.trim()))
        .cloned()
}
