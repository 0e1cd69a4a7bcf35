//! Price Analytics Pipeline - Main Entry Point
//!
//! Usage: `price-pipeline [config.toml]`

use anyhow::{Context, Result};
use pipeline::{init_logging, run_files, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        PipelineConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.log_level)?;

    info!("=== Price Analytics Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Input {}, output {}",
        config.input_path.display(),
        config.output_path.display()
    );

    let diagnostics = run_files(&config)?;
    println!("{}", serde_json::to_string_pretty(&diagnostics)?);

    Ok(())
}
