//! Bounded Trailing Window

use std::collections::VecDeque;

/// Trailing window over the most recent `capacity` values.
///
/// Pushing into a full window evicts the oldest value, so the window only ever
/// sees the past: statistics read after pushing index `i` depend on values at
/// indices `<= i` alone.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    /// Values currently in the window, oldest first
    values: VecDeque<f64>,
    /// Maximum number of values held
    capacity: usize,
}

impl RollingWindow {
    /// Create a new window holding at most `capacity` values
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, returning the evicted one if the window was full
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the window, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Variance with `ddof` delta degrees of freedom.
    ///
    /// Two-pass (mean first, then squared deviations) to avoid the
    /// cancellation of the running sum-of-squares form on large prices.
    /// `None` when the window holds `ddof` values or fewer.
    pub fn variance(&self, ddof: usize) -> Option<f64> {
        let n = self.values.len();
        if n <= ddof {
            return None;
        }
        let mean = self.mean()?;
        let m2: f64 = self
            .values
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum();
        Some(m2 / (n - ddof) as f64)
    }

    /// Standard deviation with `ddof` delta degrees of freedom
    pub fn std_dev(&self, ddof: usize) -> Option<f64> {
        self.variance(ddof).map(f64::sqrt)
    }
}
