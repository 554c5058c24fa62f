use amplitude_types::MarketDetails;

use crate::AmplitudeError;
use crate::types::{IndexSeries, Panel};

/// A provider of persisted market data.
///
/// Implementations return cleaned data: sorted by date with repeated dates
/// reduced keep-first. A missing file is `AmplitudeError::NotFound`; a file
/// that exists but cannot be parsed is `AmplitudeError::Csv`.
pub trait MarketSource: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Daily bars of the index `idx_code`.
    ///
    /// # Errors
    /// Returns `AmplitudeError::NotFound` when no data exists for the code.
    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError>;

    /// End-of-day panel of the market's component tickers.
    ///
    /// # Errors
    /// Returns `AmplitudeError::NotFound` when the market has no component data.
    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError>;
}

impl<S: MarketSource + ?Sized> MarketSource for std::sync::Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError> {
        (**self).load_index(idx_code)
    }

    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError> {
        (**self).load_components(market)
    }
}
