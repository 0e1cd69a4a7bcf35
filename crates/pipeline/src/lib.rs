//! Price Analytics Pipeline
//!
//! Runs the stages in order over one dataset: cleaning, per-series indicators,
//! anomaly flags, ARIMA trend slopes and seasonal summaries.

mod config;
mod diagnostics;
mod orders;
mod runner;

pub use crate::config::{PipelineConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use diagnostics::PipelineDiagnostics;
pub use orders::{search_orders, write_orders, write_orders_to, OrderRow};
pub use runner::{run_files, Pipeline, PipelineOutput};

use param_store::ParamStoreError;
use storage::StorageError;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Errors that abort a run before any output is written
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ParamStore(#[from] ParamStoreError),
    #[error("Failed to write orders: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Initialize logging. `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: &str) -> Result<(), PipelineError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PipelineError::Logging(e.to_string()))
}
