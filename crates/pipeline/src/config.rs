//! Pipeline Configuration

use crate::PipelineError;
use anomaly_detector::AnomalyConfig;
use data_cleaner::CleanerConfig;
use indicator_engine::IndicatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trend_forecast::search::SearchConfig;

/// Config file read when no path is given; optional
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

/// Prefix of environment overrides, e.g. `PRICE_PIPELINE_INPUT_PATH` or
/// `PRICE_PIPELINE_ANOMALY__WINDOW`
pub const ENV_PREFIX: &str = "PRICE_PIPELINE";

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw observations (CSV)
    pub input_path: PathBuf,
    /// Enriched rows (CSV)
    pub output_path: PathBuf,
    /// ARIMA order table (CSV). Without one no series gets a trend slope.
    pub orders_path: Option<PathBuf>,
    /// Default log filter
    pub log_level: String,
    pub cleaner: CleanerConfig,
    pub indicators: IndicatorConfig,
    pub anomaly: AnomalyConfig,
    pub search: SearchConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/prices.csv"),
            output_path: PathBuf::from("data/derived.csv"),
            orders_path: Some(PathBuf::from("data/model_orders.csv")),
            log_level: "info".to_string(),
            cleaner: CleanerConfig::default(),
            indicators: IndicatorConfig::default(),
            anomaly: AnomalyConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, a TOML file and environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(path.is_some()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject window sizes no stage can work with
    pub fn validate(&self) -> Result<(), PipelineError> {
        let windows = [
            ("indicators.short_window", self.indicators.short_window),
            ("indicators.long_window", self.indicators.long_window),
            ("indicators.volatility_window", self.indicators.volatility_window),
            ("indicators.rsi_window", self.indicators.rsi_window),
            ("anomaly.window", self.anomaly.window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(PipelineError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        if self.anomaly.min_periods > self.anomaly.window {
            return Err(PipelineError::InvalidConfig(format!(
                "anomaly.min_periods ({}) exceeds anomaly.window ({})",
                self.anomaly.min_periods, self.anomaly.window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_cleaner::FillScope;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.indicators.short_window, 10);
        assert_eq!(config.indicators.long_window, 50);
        assert_eq!(config.anomaly.window, 50);
        assert_eq!(config.anomaly.min_periods, 10);
        assert_eq!(config.search.max_p, 10);
        assert_eq!(config.cleaner.fill_scope, FillScope::Dataset);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let path = std::env::temp_dir().join(format!("pipeline-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "input_path = \"in.csv\"\n\n[cleaner]\nfill_scope = \"group\"\n\n[indicators]\nshort_window = 5"
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.cleaner.fill_scope, FillScope::Group);
        assert_eq!(config.indicators.short_window, 5);
        assert_eq!(config.indicators.long_window, 50);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = PipelineConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = PipelineConfig::default();
        config.anomaly.window = 0;
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }
}
