//! Breadth indicators computed over an aligned index and component panel.
//!
//! Every indicator reads a [`BreadthFrame`] and produces an
//! [`IndicatorTable`](crate::table::IndicatorTable) on the frame's dates.
/// Advance/decline, TRIN and McClellan oscillator.
pub mod adv_dec;
/// Over/under counts and trend ladders.
pub mod breadth;
/// Compression and dispersion around the averages.
pub mod compression;
mod frame;
/// New highs and lows across windows.
pub mod hi_lo;
/// MA and VWMA columns for the index and each ticker.
pub mod moving_averages;
/// On-balance volume and net money flow.
pub mod obv;
/// MA range envelope and its oscillator.
pub mod oscillator;
/// Window primitives over columns with missing values.
pub mod rolling;
/// Rolling robust z-score.
pub mod zscore;

pub use frame::BreadthFrame;
