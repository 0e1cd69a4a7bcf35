//! Price Anomaly Detection
//!
//! Flags observations that sit more than two trailing standard deviations away
//! from their trailing mean within the same series.

mod detector;

pub use detector::{rolling_z_scores, AnomalyConfig, AnomalyDetector, Z_SCORE_THRESHOLD};
