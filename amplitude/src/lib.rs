//! Amplitude computes market-breadth indicators for an index and its components.
//!
//! Overview
//! - Loads an index series and its component panel from a [`MarketSource`]
//!   (usually the CSV-backed [`CsvStore`]).
//! - Aligns both on their common dates; disjoint data is reported as
//!   `NoCommonDates` rather than producing empty tables.
//! - Computes moving averages, over/under breadth, trend ladders, compression,
//!   the MA range oscillator, highs/lows, advance/decline and OBV/money flow.
//! - Projects auxiliary indexes onto the study timeline with forward fill.
//!
//! Key behaviors and trade-offs
//! - Loading is synchronous; batches fan out over scoped threads, one per market.
//! - The optional read cache keeps parsed files in memory for a TTL, which
//!   helps when several markets share an index at the cost of holding copies.
//! - Output tables can be cut to the last `graph_lookback` rows; indicators
//!   are always computed over the full history so windows stay warm.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use amplitude::{Amplitude, CsvStore, DataLayout, default_markets, find_market};
//!
//! let amp = Amplitude::builder()
//!     .with_source(Arc::new(CsvStore::new(DataLayout::new("data", "codes"))))
//!     .build()?;
//! let market = find_market(&default_markets(), "Bovespa").unwrap();
//! let report = amp.analyze(&market)?;
//! for (name, table) in report.tables() {
//!     println!("{name}: {} rows", table.len());
//! }
//! ```
//!
//! See `amplitude/examples/` for runnable demonstrations against the mock source.
#![warn(missing_docs)]

mod batch;
mod config;
pub(crate) mod core;
mod pipeline;

pub use batch::BatchReport;
pub use config::{config_to_json, load_config};
pub use core::{Amplitude, AmplitudeBuilder};
pub use pipeline::{IndicatorReport, MarketData};

pub use amplitude_core::{
    AmplitudeError, Bar, IndexSeries, IndicatorTable, MarketSource, Panel, TimeSeries, align,
};
pub use amplitude_store::{CachingSource, CsvStore, DataLayout, UpdateStatus};
pub use amplitude_types::{
    AmplitudeConfig, AnalysisConfig, CacheConfig, FileLocations, MarketDetails, default_markets,
    find_market,
};
