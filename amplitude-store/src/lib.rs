//! amplitude-store
//!
//! CSV-backed [`MarketSource`](amplitude_core::MarketSource) for the files
//! persisted by the download tooling:
//!
//! - `INDEX_{idx_code}.csv`: daily bars of one index or instrument.
//! - `EOD_{market}.csv`: multi-level end-of-day bars of a market's components.
//! - `{codes_folder}/{codes_csv}`: the component ticker list (`Code` column).
//!
//! Also provides incremental file updates, a read-through LRU cache and the
//! writer used for indicator tables.
#![warn(missing_docs)]

mod cache;
pub mod codec;
mod layout;
mod store;
pub mod update;

pub use cache::CachingSource;
pub use codec::{
    EodRows, read_eod_csv, read_index_csv, read_ticker_codes, write_eod_csv, write_index_csv,
    write_table_csv,
};
pub use layout::DataLayout;
pub use store::{CsvStore, clean_index, clean_panel, restrict_to_codes};
pub use update::{UpdateStatus, update_components_file, update_index_file};
