//! Configuration types shared by the loader, the indicator pipeline and the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AmplitudeError;

/// How repeated keys are reduced when a series is built from raw rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the first row seen for a key (the loader's default).
    #[default]
    KeepFirst,
    /// Keep the last row seen for a key; fresh data overwrites stored data.
    KeepLast,
    /// Fail with `AmplitudeError::DuplicateKey`.
    Reject,
}

/// Normalisation used for the moving-average range oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorKind {
    /// Rolling min-max scaling into `[0, 1]`.
    MinMax,
    /// Rolling mean / standard deviation z-score.
    ZScore,
    /// Rolling median / MAD z-score using the configured [`ZScoreMode`].
    #[default]
    RobustZScore,
}

/// Parameter presets for the rolling robust z-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZScoreMode {
    /// Short swings: 20-day window, clipped at 3.5.
    #[default]
    Swing,
    /// Long-term regime: 50-day window, clipped at 4.0.
    LongTerm,
    /// Outlier hunting: 30-day window, no clipping.
    Anomalies,
}

/// Window parameters behind a [`ZScoreMode`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreParams {
    /// Rolling window length in rows.
    pub window: usize,
    /// Minimum number of observations in the window to emit a value.
    pub min_periods: usize,
    /// Symmetric clip bound; `None` leaves scores unclipped.
    pub clip: Option<f64>,
}

impl ZScoreMode {
    /// Parameters for this mode.
    #[must_use]
    pub const fn params(self) -> ZScoreParams {
        match self {
            Self::Swing => ZScoreParams {
                window: 20,
                min_periods: 10,
                clip: Some(3.5),
            },
            Self::LongTerm => ZScoreParams {
                window: 50,
                min_periods: 30,
                clip: Some(4.0),
            },
            Self::Anomalies => ZScoreParams {
                window: 30,
                min_periods: 15,
                clip: None,
            },
        }
    }
}

/// A named set of moving-average periods analysed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaGroup {
    /// Group name used in column labels (e.g. "short").
    pub name: String,
    /// Periods in ascending order; ladders are built from prefixes of this list.
    pub periods: Vec<usize>,
}

impl MaGroup {
    /// Build a group from a name and its periods.
    pub fn new(name: impl Into<String>, periods: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            periods: periods.into(),
        }
    }
}

/// Rolling windows used by the highs/lows indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiLoWindows {
    /// One trading month.
    pub month: usize,
    /// One trading quarter.
    pub quarter: usize,
    /// One trading year.
    pub year: usize,
}

impl Default for HiLoWindows {
    fn default() -> Self {
        Self {
            month: 21,
            quarter: 63,
            year: 252,
        }
    }
}

/// Parameters of the indicator pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Moving-average groups; the analysed periods are their sorted union.
    pub ma_groups: Vec<MaGroup>,
    /// Period excluded from the "short range" MA spread (the slow 200-day line).
    pub range_excluded_period: usize,
    /// Lookback of the MA range oscillator.
    pub oscillator_lookback: usize,
    /// Oscillator normalisation.
    pub oscillator: OscillatorKind,
    /// Robust z-score preset used when `oscillator` is `RobustZScore`.
    pub zscore_mode: ZScoreMode,
    /// Relative distance from an average inside which a ticker counts as
    /// neither above nor below it (0.005 = 0.5%).
    pub neutral_band_pct: f64,
    /// Trailing window of the simple mean applied to the over/under
    /// percentages; 0 or 1 leaves them raw.
    pub smooth_window: usize,
    /// Windows of the highs/lows indicator.
    pub hi_lo: HiLoWindows,
    /// Fast EMA period of the McClellan oscillator.
    pub ema_fast: usize,
    /// Slow EMA period of the McClellan oscillator.
    pub ema_slow: usize,
    /// Number of trailing rows kept in output tables; `None` keeps everything.
    pub graph_lookback: Option<usize>,
    /// Duplicate reduction applied when loading persisted files.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_groups: vec![
                MaGroup::new("short", [5, 12, 25]),
                MaGroup::new("mid", [40, 80]),
                MaGroup::new("long", [50, 100, 200]),
            ],
            range_excluded_period: 200,
            oscillator_lookback: 252,
            oscillator: OscillatorKind::RobustZScore,
            zscore_mode: ZScoreMode::Swing,
            neutral_band_pct: 0.005,
            smooth_window: 3,
            hi_lo: HiLoWindows::default(),
            ema_fast: 19,
            ema_slow: 39,
            graph_lookback: None,
            duplicate_policy: DuplicatePolicy::KeepFirst,
        }
    }
}

impl AnalysisConfig {
    /// Sorted, de-duplicated union of every group's periods.
    #[must_use]
    pub fn ma_periods(&self) -> Vec<usize> {
        let mut periods: Vec<usize> = self
            .ma_groups
            .iter()
            .flat_map(|g| g.periods.iter().copied())
            .collect();
        periods.sort_unstable();
        periods.dedup();
        periods
    }

    /// Check the configuration for values the pipeline cannot work with.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Config` when a window or period is zero, a
    /// group is empty or unnamed, the neutral band is negative, or the EMA
    /// periods are not fast < slow.
    pub fn validate(&self) -> Result<(), AmplitudeError> {
        if self.ma_groups.is_empty() {
            return Err(AmplitudeError::Config("no moving-average groups".into()));
        }
        for g in &self.ma_groups {
            if g.name.trim().is_empty() {
                return Err(AmplitudeError::Config("unnamed moving-average group".into()));
            }
            if g.periods.is_empty() {
                return Err(AmplitudeError::Config(format!(
                    "moving-average group '{}' has no periods",
                    g.name
                )));
            }
            if g.periods.contains(&0) {
                return Err(AmplitudeError::Config(format!(
                    "moving-average group '{}' contains a zero period",
                    g.name
                )));
            }
        }
        if !self.neutral_band_pct.is_finite() || self.neutral_band_pct < 0.0 {
            return Err(AmplitudeError::Config(format!(
                "neutral_band_pct must be a non-negative number (got {})",
                self.neutral_band_pct
            )));
        }
        if self.oscillator_lookback == 0 {
            return Err(AmplitudeError::Config("oscillator_lookback must be > 0".into()));
        }
        let HiLoWindows {
            month,
            quarter,
            year,
        } = self.hi_lo;
        if month == 0 || quarter == 0 || year == 0 {
            return Err(AmplitudeError::Config("high/low windows must be > 0".into()));
        }
        if self.ema_fast == 0 || self.ema_fast >= self.ema_slow {
            return Err(AmplitudeError::Config(format!(
                "ema periods must satisfy 0 < fast < slow (got {} / {})",
                self.ema_fast, self.ema_slow
            )));
        }
        if self.graph_lookback == Some(0) {
            return Err(AmplitudeError::Config("graph_lookback must be > 0".into()));
        }
        Ok(())
    }
}

/// Folders holding persisted market data and generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocations {
    /// Folder with `INDEX_*.csv` and `EOD_*.csv` files.
    pub data_folder: PathBuf,
    /// Folder with the per-market ticker code lists.
    pub codes_folder: PathBuf,
    /// Folder where indicator tables are written.
    pub output_folder: PathBuf,
}

impl Default for FileLocations {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            codes_folder: PathBuf::from("codes"),
            output_folder: PathBuf::from("output"),
        }
    }
}

impl FileLocations {
    /// Resolve relative folders against `base` (usually the config file's directory).
    #[must_use]
    pub fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            data_folder: resolve(self.data_folder),
            codes_folder: resolve(self.codes_folder),
            output_folder: resolve(self.output_folder),
        }
    }
}

/// Read-cache settings for parsed market files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of parsed loads retained.
    pub max_entries: usize,
    /// Time-to-live of a cached load in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 32,
            ttl_ms: 300_000,
        }
    }
}

impl CacheConfig {
    /// Time-to-live as a `Duration`.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeConfig {
    /// Data and output folders.
    pub locations: FileLocations,
    /// Indicator pipeline parameters.
    pub analysis: AnalysisConfig,
    /// Optional read cache; `None` disables caching.
    pub cache: Option<CacheConfig>,
}
