//! Trailing Windows
//!
//! Provides a bounded trailing window over a price series and causal rolling
//! statistics (mean, standard deviation) computed on top of it.

mod stats;
mod window;

pub use stats::{rolling_mean, rolling_std, Ddof};
pub use window::RollingWindow;
