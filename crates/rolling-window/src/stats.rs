//! Causal Rolling Statistics

use crate::RollingWindow;

/// Delta degrees of freedom for a standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ddof {
    /// Divide by n
    Population,
    /// Divide by n - 1
    Sample,
}

impl Ddof {
    fn value(self) -> usize {
        match self {
            Ddof::Population => 0,
            Ddof::Sample => 1,
        }
    }
}

/// Trailing mean over `window` values.
///
/// Output index `i` is `None` until at least `min_periods` values (clamped to
/// at least 1) have been seen; the window shrinks at the start of the series.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    let mut win = RollingWindow::new(window);

    values
        .iter()
        .map(|&v| {
            win.push(v);
            if win.len() >= min_periods {
                win.mean()
            } else {
                None
            }
        })
        .collect()
}

/// Trailing standard deviation over `window` values.
///
/// `None` until `min_periods` values have been seen and whenever the window
/// holds too few values for the requested `ddof`.
pub fn rolling_std(
    values: &[f64],
    window: usize,
    min_periods: usize,
    ddof: Ddof,
) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    let mut win = RollingWindow::new(window);

    values
        .iter()
        .map(|&v| {
            win.push(v);
            if win.len() >= min_periods {
                win.std_dev(ddof.value())
            } else {
                None
            }
        })
        .collect()
}
