use std::sync::Arc;

use amplitude_core::{AmplitudeError, MarketSource};
use amplitude_store::{CachingSource, CsvStore};
use amplitude_types::{AmplitudeConfig, AnalysisConfig, CacheConfig};

/// Orchestrator that loads markets from a source and computes indicator reports.
pub struct Amplitude {
    pub(crate) source: Arc<dyn MarketSource>,
    pub(crate) analysis: AnalysisConfig,
}

/// Builder for constructing an [`Amplitude`] orchestrator.
pub struct AmplitudeBuilder {
    source: Option<Arc<dyn MarketSource>>,
    analysis: AnalysisConfig,
    cache: Option<CacheConfig>,
}

impl Default for AmplitudeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeBuilder {
    /// Create a builder with the default analysis parameters and no cache.
    ///
    /// A source must be registered via [`with_source`](Self::with_source)
    /// before calling [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            analysis: AnalysisConfig::default(),
            cache: None,
        }
    }

    /// Register the market source. A later call replaces an earlier one.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn MarketSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the indicator pipeline parameters.
    #[must_use]
    pub fn analysis(mut self, cfg: AnalysisConfig) -> Self {
        self.analysis = cfg;
        self
    }

    /// Put a read-through LRU cache in front of the source.
    ///
    /// Worth it when several markets share an index or a market is loaded
    /// more than once per run; every cached load holds a full copy of the
    /// parsed data.
    #[must_use]
    pub const fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cache = Some(cfg);
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no source was registered and `Config` if the
    /// analysis parameters do not validate.
    pub fn build(self) -> Result<Amplitude, AmplitudeError> {
        let source = self.source.ok_or_else(|| {
            AmplitudeError::InvalidArg(
                "no market source registered; add one via with_source(...)".to_string(),
            )
        })?;
        self.analysis.validate()?;

        let source: Arc<dyn MarketSource> = match self.cache {
            Some(cfg) => Arc::new(CachingSource::new(source, &cfg)),
            None => source,
        };
        Ok(Amplitude {
            source,
            analysis: self.analysis,
        })
    }
}

impl Amplitude {
    /// Start building a new `Amplitude` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use amplitude::{Amplitude, CsvStore, DataLayout};
    ///
    /// let store = CsvStore::new(DataLayout::new("data", "codes"));
    /// let amp = Amplitude::builder()
    ///     .with_source(Arc::new(store))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> AmplitudeBuilder {
        AmplitudeBuilder::new()
    }

    /// Orchestrator over the CSV files named in `cfg`.
    ///
    /// # Errors
    /// Returns `Config` if the analysis parameters do not validate.
    pub fn from_config(cfg: &AmplitudeConfig) -> Result<Self, AmplitudeError> {
        let store =
            CsvStore::from_locations(&cfg.locations).with_policy(cfg.analysis.duplicate_policy);
        let mut builder = Self::builder()
            .with_source(Arc::new(store))
            .analysis(cfg.analysis.clone());
        if let Some(cache) = cfg.cache {
            builder = builder.cache(cache);
        }
        builder.build()
    }

    /// Analysis parameters in use.
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Name of the underlying source.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }
}
