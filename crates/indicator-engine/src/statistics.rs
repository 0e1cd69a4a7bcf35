//! Per-Series Indicator Computation

use rolling_window::rolling_mean;

/// Percent change from the previous price; `None` for the first price
pub fn daily_inflation(prices: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        if i == 0 {
            out.push(None);
        } else {
            out.push(Some((prices[i] - prices[i - 1]) / prices[i - 1] * 100.0));
        }
    }
    out
}

/// signal[i] - signal[i-1]; `None` at the series start
pub fn crossovers(signals: &[u8]) -> Vec<Option<i8>> {
    let mut out = Vec::with_capacity(signals.len());
    for i in 0..signals.len() {
        if i == 0 {
            out.push(None);
        } else {
            out.push(Some(signals[i] as i8 - signals[i - 1] as i8));
        }
    }
    out
}

/// Relative strength index over trailing mean gains and losses.
///
/// The first observation has no change and contributes a zero gain and loss.
/// `None` when both averages are zero (flat window); 100 when only losses are.
pub fn rsi(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());

    for i in 0..prices.len() {
        let delta = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let avg_gain = rolling_mean(&gains, window, 1);
    let avg_loss = rolling_mean(&losses, window, 1);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) if l > 0.0 => Some(100.0 - 100.0 / (1.0 + g / l)),
            (Some(g), Some(_)) if g > 0.0 => Some(100.0),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_inflation() {
        let inflation = daily_inflation(&[100.0, 102.0, 104.0]);
        assert_eq!(inflation[0], None);
        assert!((inflation[1].unwrap() - 2.0).abs() < 1e-12);
        assert!((inflation[2].unwrap() - 1.9607843137254901).abs() < 1e-12);
    }

    #[test]
    fn test_daily_inflation_empty() {
        assert!(daily_inflation(&[]).is_empty());
    }

    #[test]
    fn test_crossovers() {
        let cross = crossovers(&[0, 0, 1, 1, 0]);
        assert_eq!(cross, vec![None, Some(0), Some(1), Some(0), Some(-1)]);
    }

    #[test]
    fn test_rsi_monotonic_up_is_100() {
        let values = rsi(&[1.0, 2.0, 3.0, 4.0], 14);
        assert_eq!(values[0], None);
        assert_eq!(values[3], Some(100.0));
    }

    #[test]
    fn test_rsi_balanced() {
        // Gains 2, losses 2 over the window: RS = 1 -> RSI = 50
        let values = rsi(&[10.0, 12.0, 10.0], 14);
        assert!((values[2].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_falling_is_zero() {
        let values = rsi(&[10.0, 9.0, 8.0], 14);
        assert!((values[2].unwrap() - 0.0).abs() < 1e-9);
    }
}
