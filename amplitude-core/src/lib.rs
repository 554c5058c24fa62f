//! amplitude-core
//!
//! Data model, alignment and indicators shared across the amplitude workspace.
//!
//! - `timeseries`: the key-unique `TimeSeries`, intersection alignment,
//!   duplicate reduction, update merges and forward-fill reindexing.
//! - `types`: daily `Bar`s, the `IndexSeries` alias and the component `Panel`.
//! - `source`: the `MarketSource` trait implemented by storage backends.
//! - `table`: `IndicatorTable`, the date-indexed output of every indicator.
//! - `indicators`: moving averages, breadth, compression, highs/lows,
//!   advance/decline, OBV/money flow and z-scores.
//!
//! Tracing
//! -------
//! With the `tracing` feature enabled, indicator entry points emit spans.
//! The `dataframe` feature adds `IndicatorTable::to_dataframe` (polars).
#![warn(missing_docs)]

pub mod indicators;
/// The `MarketSource` trait.
pub mod source;
/// Indicator output tables.
pub mod table;
/// Time-series container and operations.
pub mod timeseries;
pub mod types;

pub use amplitude_types::AmplitudeError;
pub use indicators::BreadthFrame;
pub use source::MarketSource;
pub use table::{Column, IndicatorTable};
pub use timeseries::align::{align, common_keys};
pub use timeseries::merge::{MergeOutcome, dedup_entries, merge_update, should_skip_update};
pub use timeseries::reindex::{backfill_leading, reindex_forward_fill};
pub use timeseries::series::TimeSeries;
pub use types::{Bar, IndexSeries, Panel, PanelRow};
