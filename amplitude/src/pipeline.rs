use std::path::{Path, PathBuf};

use amplitude_core::indicators::adv_dec::adv_dec_table;
use amplitude_core::indicators::breadth::{over_under_table, trend_ladder_table};
use amplitude_core::indicators::compression::compression_table;
use amplitude_core::indicators::hi_lo::hi_lo_table;
use amplitude_core::indicators::moving_averages::{MarketAverages, moving_average_table};
use amplitude_core::indicators::obv::close_volume_obv_table;
use amplitude_core::indicators::oscillator::ma_range_table;
use amplitude_core::{
    AmplitudeError, BreadthFrame, IndexSeries, IndicatorTable, Panel, TimeSeries, align,
    backfill_leading, reindex_forward_fill,
};
use amplitude_store::write_table_csv;
use amplitude_types::MarketDetails;
use chrono::NaiveDate;

use crate::core::Amplitude;

/// An index and its component panel, aligned on their common dates.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    /// Market the data belongs to.
    pub market: MarketDetails,
    /// Index bars on the common dates.
    pub index: IndexSeries,
    /// Component bars on the same dates; width 0 for index-only markets.
    pub panel: Panel,
}

impl MarketData {
    /// Common dates, ascending.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.index.keys().copied().collect()
    }

    /// Column view used by the indicators.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` if index and panel dates disagree.
    pub fn frame(&self) -> Result<BreadthFrame, AmplitudeError> {
        BreadthFrame::from_aligned(&self.index, &self.panel)
    }
}

/// Every indicator table computed for one market.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReport {
    /// Market the report describes.
    pub market: MarketDetails,
    /// Index price, volume and its moving averages.
    pub moving_averages: IndicatorTable,
    /// Share of tickers above/below each of their averages.
    pub over_under: IndicatorTable,
    /// Share of tickers stacked above/below growing sets of averages.
    pub trend_ladders: IndicatorTable,
    /// Summed distance of tickers from their averages.
    pub compression: IndicatorTable,
    /// Spread of the index averages and its oscillator.
    pub ma_range: IndicatorTable,
    /// New highs and lows over several windows.
    pub hi_lo: IndicatorTable,
    /// Advancing/declining counts, TRIN and the McClellan oscillator.
    pub adv_dec: IndicatorTable,
    /// Index and component on-balance volume and money flow.
    pub close_volume_obv: IndicatorTable,
}

impl IndicatorReport {
    /// Tables with their file stems, always in the same order.
    #[must_use]
    pub fn tables(&self) -> [(&'static str, &IndicatorTable); 8] {
        [
            ("moving_averages", &self.moving_averages),
            ("over_under", &self.over_under),
            ("trend_ladders", &self.trend_ladders),
            ("compression", &self.compression),
            ("ma_range", &self.ma_range),
            ("hi_lo", &self.hi_lo),
            ("adv_dec", &self.adv_dec),
            ("close_volume_obv", &self.close_volume_obv),
        ]
    }

    /// Write every table to `{folder}/{market}_{table}.csv`.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Io` when a file cannot be written.
    pub fn write_csv(&self, folder: &Path) -> Result<Vec<PathBuf>, AmplitudeError> {
        self.tables()
            .into_iter()
            .map(|(name, table)| {
                let path = folder.join(format!("{}_{name}.csv", self.market.market));
                write_table_csv(&path, table)?;
                Ok(path)
            })
            .collect()
    }
}

impl Amplitude {
    /// Load a market's index and components and align them.
    ///
    /// Markets without a component list get a width-0 panel on the index
    /// dates, so the breadth tables come out with zero counts.
    ///
    /// # Errors
    /// Propagates source errors; returns `NoCommonDates` when index and
    /// components share no date.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplitude::load_market",
            skip(self, market),
            fields(idx_code = %market.idx_code, market = %market.market),
            err
        )
    )]
    pub fn load_market(&self, market: &MarketDetails) -> Result<MarketData, AmplitudeError> {
        let index = self.source.load_index(&market.idx_code)?;
        let panel = if market.has_components() {
            self.source.load_components(market)?
        } else {
            Panel::new(Vec::new(), index.clone().map_values(|_| Vec::new()))?
        };

        #[cfg(feature = "tracing")]
        let (index_rows, panel_rows) = (index.len(), panel.len());
        let tickers = panel.tickers().to_vec();
        let (index, rows) = align(index, panel.into_rows());
        if index.is_empty() {
            return Err(AmplitudeError::no_common_dates(
                format!("index {}", market.idx_code),
                format!("components of {}", market.market),
            ));
        }
        let panel = Panel::new(tickers, rows)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            index_rows,
            panel_rows,
            common = index.len(),
            tickers = panel.width(),
            "aligned market data"
        );
        Ok(MarketData {
            market: market.clone(),
            index,
            panel,
        })
    }

    /// Compute every indicator table for aligned market data.
    ///
    /// Tables are cut to the last `graph_lookback` rows when configured;
    /// the indicators themselves always see the full history.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` if the data is not aligned.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplitude::compute",
            skip_all,
            fields(market = %data.market.market, dates = data.index.len()),
            err
        )
    )]
    pub fn compute(&self, data: &MarketData) -> Result<IndicatorReport, AmplitudeError> {
        let cfg = &self.analysis;
        let frame = data.frame()?;
        let averages = MarketAverages::compute(&frame, &cfg.ma_periods());
        let view = |t: IndicatorTable| match cfg.graph_lookback {
            Some(n) => t.tail(n),
            None => t,
        };
        Ok(IndicatorReport {
            market: data.market.clone(),
            moving_averages: view(moving_average_table(&frame, &averages)?),
            over_under: view(over_under_table(&frame, &averages, cfg)?),
            trend_ladders: view(trend_ladder_table(&frame, &averages, &cfg.ma_groups)?),
            compression: view(compression_table(&frame, &averages, &cfg.ma_groups)?),
            ma_range: view(ma_range_table(&frame, &averages.index, cfg)?),
            hi_lo: view(hi_lo_table(&frame, cfg.hi_lo)?),
            adv_dec: view(adv_dec_table(&frame, cfg.ema_fast, cfg.ema_slow)?),
            close_volume_obv: view(close_volume_obv_table(&frame)?),
        })
    }

    /// Load, align and compute in one call.
    ///
    /// # Errors
    /// See [`load_market`](Self::load_market) and [`compute`](Self::compute).
    pub fn analyze(&self, market: &MarketDetails) -> Result<IndicatorReport, AmplitudeError> {
        let data = self.load_market(market)?;
        self.compute(&data)
    }

    /// Project another index's price onto `timeline`.
    ///
    /// Each date takes the latest price at or before it; dates before the
    /// first observation take the first observed price.
    ///
    /// # Errors
    /// Propagates source errors; returns `NoCommonDates` when the index has
    /// no data at all.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplitude::align_auxiliary",
            skip(self, timeline),
            fields(timeline = timeline.len()),
            err
        )
    )]
    pub fn align_auxiliary(
        &self,
        idx_code: &str,
        timeline: &[NaiveDate],
    ) -> Result<TimeSeries<NaiveDate, Option<f64>>, AmplitudeError> {
        let aux = self.source.load_index(idx_code)?;
        if aux.is_empty() && !timeline.is_empty() {
            return Err(AmplitudeError::no_common_dates(
                format!("index {idx_code}"),
                "study timeline",
            ));
        }
        let prices = aux.map_values(|bar| bar.price());
        Ok(backfill_leading(reindex_forward_fill(&prices, timeline)))
    }
}
