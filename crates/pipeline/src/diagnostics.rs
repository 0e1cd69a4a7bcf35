//! Run Diagnostics

use data_cleaner::CleaningReport;
use param_store::LoadReport;
use serde::Serialize;
use tracing::info;
use trend_forecast::ForecastSummary;

/// Everything a run counted, returned instead of kept in globals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineDiagnostics {
    pub cleaning: CleaningReport,
    /// ARIMA orders available to the run
    pub orders: LoadReport,
    /// Series processed
    pub groups: usize,
    pub rows: usize,
    pub anomalies: usize,
    pub price_drops: usize,
    pub forecast: ForecastSummary,
}

impl PipelineDiagnostics {
    /// Log a one-line summary of the run
    pub fn log_summary(&self) {
        info!(
            "Run complete: {} rows in, {} out ({} dropped), {} series, {} anomalies, {} drops",
            self.cleaning.rows_in,
            self.rows,
            self.cleaning.dropped(),
            self.groups,
            self.anomalies,
            self.price_drops
        );
        info!(
            "Forecasts: {} ok, {} without order, {} too short, {} failed",
            self.forecast.forecast_ok,
            self.forecast.missing_order,
            self.forecast.insufficient_history,
            self.forecast.fit_failed
        );
    }
}
