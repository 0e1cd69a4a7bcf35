//! Stage Orchestration

use crate::{PipelineConfig, PipelineDiagnostics, PipelineError};
use anomaly_detector::AnomalyDetector;
use data_cleaner::{Normalizer, RawRecord};
use indicator_engine::IndicatorEngine;
use param_store::ParamStore;
use price_series::{group_ranges, DerivedRow};
use seasonal_summary::SeasonalSummarizer;
use tracing::{info, warn};
use trend_forecast::TrendForecaster;

/// Rows and counters from one run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Sorted by (product, city, capture_date)
    pub rows: Vec<DerivedRow>,
    pub diagnostics: PipelineDiagnostics,
}

/// The analytics stages, configured once
pub struct Pipeline {
    normalizer: Normalizer,
    indicators: IndicatorEngine,
    anomaly: AnomalyDetector,
    seasonal: SeasonalSummarizer,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.cleaner.clone()),
            indicators: IndicatorEngine::new(config.indicators.clone()),
            anomaly: AnomalyDetector::new(config.anomaly.clone()),
            seasonal: SeasonalSummarizer::new(),
        }
    }

    /// Run every stage over `records`.
    ///
    /// Each series is processed on its own slice, so nothing computed for one
    /// (product, city) pair can reach another.
    pub fn run<I>(&self, records: I, store: &ParamStore) -> PipelineOutput
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let cleaned = self.normalizer.clean(records);
        let mut rows: Vec<DerivedRow> = cleaned
            .observations
            .into_iter()
            .map(DerivedRow::from)
            .collect();

        let mut diagnostics = PipelineDiagnostics {
            cleaning: cleaned.report,
            orders: store.load_report().clone(),
            rows: rows.len(),
            ..Default::default()
        };

        let forecaster = TrendForecaster::new(store);
        for range in group_ranges(&rows) {
            let series = &mut rows[range];
            self.indicators.apply(series);
            diagnostics.anomalies += self.anomaly.apply(series);
            let outcome = forecaster.apply(series);
            diagnostics.forecast.record(&outcome);
            diagnostics.price_drops += self.seasonal.apply(series);
            diagnostics.groups += 1;
        }

        if diagnostics.groups > 0 && diagnostics.forecast.forecast_ok == 0 {
            warn!("No series received a trend forecast");
        }
        diagnostics.log_summary();

        PipelineOutput { rows, diagnostics }
    }
}

/// Load the configured files, run, and write the enriched rows
pub fn run_files(config: &PipelineConfig) -> Result<PipelineDiagnostics, PipelineError> {
    let store = match &config.orders_path {
        Some(path) => ParamStore::from_path(path)?,
        None => {
            info!("No order table configured; trend slopes will be empty");
            ParamStore::new()
        }
    };
    let records = storage::read_raw_records(&config.input_path)?;

    let output = Pipeline::new(config).run(records, &store);
    storage::write_derived(&config.output_path, &output.rows)?;

    Ok(output.diagnostics)
}
