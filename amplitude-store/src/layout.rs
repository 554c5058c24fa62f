use std::path::{Path, PathBuf};

use amplitude_types::{FileLocations, MarketDetails};

/// File naming convention of the persisted market data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_folder: PathBuf,
    codes_folder: PathBuf,
}

impl DataLayout {
    /// Layout rooted at explicit data and codes folders.
    pub fn new(data_folder: impl Into<PathBuf>, codes_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            codes_folder: codes_folder.into(),
        }
    }

    /// Layout of the folders named in a configuration.
    #[must_use]
    pub fn from_locations(locations: &FileLocations) -> Self {
        Self::new(&locations.data_folder, &locations.codes_folder)
    }

    /// Folder holding index and EOD files.
    #[must_use]
    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }

    /// `{data}/INDEX_{idx_code}.csv`
    #[must_use]
    pub fn index_path(&self, idx_code: &str) -> PathBuf {
        self.data_folder.join(format!("INDEX_{idx_code}.csv"))
    }

    /// `{data}/EOD_{market}.csv`
    #[must_use]
    pub fn eod_path(&self, market: &str) -> PathBuf {
        self.data_folder.join(format!("EOD_{market}.csv"))
    }

    /// Ticker list of `market`, if it has one.
    #[must_use]
    pub fn codes_path(&self, market: &MarketDetails) -> Option<PathBuf> {
        market
            .codes_csv
            .as_deref()
            .map(|f| self.codes_folder.join(f))
    }
}
