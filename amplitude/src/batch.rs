use std::collections::HashSet;

use amplitude_core::AmplitudeError;
use amplitude_types::MarketDetails;

use crate::core::Amplitude;
use crate::pipeline::IndicatorReport;

/// Outcome of analysing several markets at once.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Reports of the markets that succeeded, in request order.
    pub reports: Vec<IndicatorReport>,
    /// Markets skipped because their files were never produced.
    pub skipped: Vec<(String, AmplitudeError)>,
    /// Markets whose data exists but could not be analysed.
    pub failed: Vec<(String, AmplitudeError)>,
}

impl BatchReport {
    /// True when no market failed for a reason other than missing input.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Amplitude {
    /// Analyse `markets` concurrently, one scoped thread per market.
    ///
    /// - Missing input (`NotFound`, `NoCommonDates`) lands in `skipped`.
    /// - Other errors land in `failed` without aborting the batch.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `markets` is empty or names a market twice.
    pub fn analyze_many(&self, markets: &[MarketDetails]) -> Result<BatchReport, AmplitudeError> {
        if markets.is_empty() {
            return Err(AmplitudeError::InvalidArg("no markets to analyse".into()));
        }
        let mut seen = HashSet::new();
        for m in markets {
            if !seen.insert(m.market.as_str()) {
                return Err(AmplitudeError::InvalidArg(format!(
                    "market '{}' requested twice",
                    m.market
                )));
            }
        }

        let results: Vec<(String, Result<IndicatorReport, AmplitudeError>)> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = markets
                    .iter()
                    .map(|m| (m.market.clone(), scope.spawn(move || self.analyze(m))))
                    .collect();
                handles
                    .into_iter()
                    .map(|(name, h)| {
                        let res = h.join().unwrap_or_else(|_| {
                            Err(AmplitudeError::Data(format!("analysis of {name} panicked")))
                        });
                        (name, res)
                    })
                    .collect()
            });

        let mut report = BatchReport::default();
        for (name, res) in results {
            match res {
                Ok(r) => report.reports.push(r),
                Err(e) if e.is_missing_input() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(market = %name, error = %e, "skipping market");
                    report.skipped.push((name, e));
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(market = %name, error = %e, "market analysis failed");
                    report.failed.push((name, e));
                }
            }
        }
        Ok(report)
    }
}
