//! Amplitude-specific error, configuration and market registry types.
#![warn(missing_docs)]

mod config;
mod error;
mod market;

pub use config::{
    AmplitudeConfig, AnalysisConfig, CacheConfig, DuplicatePolicy, FileLocations, HiLoWindows,
    MaGroup, OscillatorKind, ZScoreMode, ZScoreParams,
};
pub use error::AmplitudeError;
pub use market::{MarketDetails, default_markets, find_market};
