//! Offline ARIMA order selection
//!
//! Usage: `order-search [config.toml]`
//!
//! Cleans the configured input, searches an order for every series and writes
//! the table the pipeline reads from `orders_path`.

use anyhow::{Context, Result};
use data_cleaner::Normalizer;
use pipeline::{init_logging, search_orders, write_orders, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        PipelineConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.log_level)?;

    let orders_path = config
        .orders_path
        .clone()
        .context("orders_path must be set to write the order table")?;

    info!(
        "Searching ARIMA orders up to ({}, {}, {})",
        config.search.max_p, config.search.max_d, config.search.max_q
    );

    let records = storage::read_raw_records(&config.input_path)?;
    let cleaned = Normalizer::new(config.cleaner.clone()).clean(records);
    let (rows, summary) = search_orders(&cleaned.observations, &config.search);

    write_orders(&orders_path, &rows)?;
    info!("Wrote {} orders to {}", rows.len(), orders_path.display());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
