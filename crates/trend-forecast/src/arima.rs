//! ARIMA(p, d, q) by Conditional Least Squares
//!
//! The series is differenced `d` times; the stationary part is estimated by
//! ordinary least squares when `q = 0` and by the two-step Hannan-Rissanen
//! regression otherwise (a long autoregression supplies innovation estimates,
//! then the series is regressed on its own lags and lagged innovations).
//! A constant is only estimated when `d = 0`.
//!
//! Every estimate is closed-form, so a fit either succeeds or fails at once:
//! there is no iteration that can stall.

use crate::ArimaError;
use nalgebra::{DMatrix, DVector};
use price_series::ArimaOrder;

/// Largest singular value ratio of X'X accepted before calling it singular
const MAX_CONDITION: f64 = 1e12;

/// Floor for the residual variance inside the log-likelihood
const MIN_VARIANCE: f64 = 1e-12;

/// Difference a series `d` times
pub fn difference(data: &[f64], d: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Solve min ||X b - y|| through the normal equations
fn least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, ArimaError> {
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;

    let singular = xtx.singular_values();
    let max = singular.iter().cloned().fold(0.0, f64::max);
    let min = singular.iter().cloned().fold(f64::INFINITY, f64::min);
    if !(max > 0.0) || !(min > max / MAX_CONDITION) {
        return Err(ArimaError::Singular);
    }

    let beta = xtx.cholesky().ok_or(ArimaError::Singular)?.solve(&xty);
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(ArimaError::NonFinite);
    }
    Ok(beta)
}

/// Fitted ARIMA model for a single series
#[derive(Debug, Clone)]
pub struct ArimaModel {
    order: ArimaOrder,
    /// Constant of the differenced model (zero when d > 0)
    constant: f64,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    /// The series after differencing
    differenced: Vec<f64>,
    /// One-step residuals aligned with `differenced`
    residuals: Vec<f64>,
    /// Last value at each differencing level below d, level 0 first
    anchors: Vec<f64>,
    /// Last observed value of the original series
    last_observed: f64,
    sigma2: f64,
}

impl ArimaModel {
    /// Fit an ARIMA model of the given order
    pub fn fit(data: &[f64], order: ArimaOrder) -> Result<Self, ArimaError> {
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ArimaError::InvalidData);
        }
        if data.len() <= order.d {
            return Err(ArimaError::InsufficientData {
                required: order.d + 1,
                actual: data.len(),
            });
        }
        let last_observed = data[data.len() - 1];

        let mut anchors = Vec::with_capacity(order.d);
        let mut level = data.to_vec();
        for _ in 0..order.d {
            if let Some(&last) = level.last() {
                anchors.push(last);
            }
            level = difference(&level, 1);
        }
        let differenced = level;
        let with_constant = order.d == 0;

        let (constant, ar_coeffs, ma_coeffs) = if order.q == 0 {
            fit_ar(&differenced, order.p, with_constant)?
        } else {
            fit_arma(&differenced, order.p, order.q, with_constant)?
        };

        let residuals = recursive_residuals(&differenced, constant, &ar_coeffs, &ma_coeffs);
        if residuals.iter().any(|e| !e.is_finite()) {
            return Err(ArimaError::NonFinite);
        }

        let n_effective = differenced.len() - order.p;
        let sigma2 =
            residuals[order.p..].iter().map(|e| e * e).sum::<f64>() / n_effective.max(1) as f64;

        Ok(Self {
            order,
            constant,
            ar_coeffs,
            ma_coeffs,
            differenced,
            residuals,
            anchors,
            last_observed,
            sigma2,
        })
    }

    /// Forecast the next value on the original scale
    pub fn forecast_next(&self) -> f64 {
        let n = self.differenced.len();
        let mut next = self.constant;

        for (i, phi) in self.ar_coeffs.iter().enumerate() {
            next += phi * self.differenced[n - i - 1];
        }
        for (j, theta) in self.ma_coeffs.iter().enumerate() {
            if n > j {
                next += theta * self.residuals[n - j - 1];
            }
        }

        // Undo each differencing pass
        next + self.anchors.iter().sum::<f64>()
    }

    /// Last value of the fitted series
    pub fn last_observed(&self) -> f64 {
        self.last_observed
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Residual variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Akaike information criterion over the model's own residual sample
    pub fn aic(&self) -> f64 {
        self.aic_from(self.order.p).unwrap_or(f64::INFINITY)
    }

    /// AIC of the conditional Gaussian likelihood over the differenced
    /// residuals from `start` on.
    ///
    /// Models are only comparable when scored from the same `start`.
    /// `None` when `start` precedes the first residual or leaves no sample.
    pub fn aic_from(&self, start: usize) -> Option<f64> {
        let n = self.differenced.len();
        if start < self.order.p || start >= n {
            return None;
        }
        let count = (n - start) as f64;
        let sigma2 = self.residuals[start..].iter().map(|e| e * e).sum::<f64>() / count;
        let k = (self.order.p + self.order.q + usize::from(self.order.d == 0) + 1) as f64;
        let log_likelihood =
            -0.5 * count * (1.0 + (2.0 * std::f64::consts::PI * sigma2.max(MIN_VARIANCE)).ln());
        Some(-2.0 * log_likelihood + 2.0 * k)
    }
}

/// Pure autoregression: w_t = c + sum(phi_i * w_{t-i})
fn fit_ar(
    w: &[f64],
    p: usize,
    with_constant: bool,
) -> Result<(f64, Vec<f64>, Vec<f64>), ArimaError> {
    let n = w.len();
    let offset = usize::from(with_constant);
    let k = p + offset;
    if k == 0 {
        return Ok((0.0, Vec::new(), Vec::new()));
    }

    let rows = n.saturating_sub(p);
    if rows < k {
        return Err(ArimaError::InsufficientData {
            required: p + k,
            actual: n,
        });
    }

    // Centering leaves the fit unchanged but keeps X'X well conditioned
    let center = if with_constant { mean(w) } else { 0.0 };
    let z: Vec<f64> = w.iter().map(|v| v - center).collect();

    let x = DMatrix::from_fn(rows, k, |r, c| {
        let t = r + p;
        if c < offset {
            1.0
        } else {
            z[t - (c - offset) - 1]
        }
    });
    let y = DVector::from_vec(z[p..].to_vec());
    let beta = least_squares(&x, &y)?;

    let ar: Vec<f64> = beta.iter().skip(offset).copied().collect();
    let constant = if with_constant {
        beta[0] + center * (1.0 - ar.iter().sum::<f64>())
    } else {
        0.0
    };
    Ok((constant, ar, Vec::new()))
}

/// Hannan-Rissanen two-step ARMA estimate
fn fit_arma(
    w: &[f64],
    p: usize,
    q: usize,
    with_constant: bool,
) -> Result<(f64, Vec<f64>, Vec<f64>), ArimaError> {
    let n = w.len();
    let offset = usize::from(with_constant);
    let long = (p + q).max((n.max(1) as f64).ln().ceil() as usize).max(1);
    let k = p + q + offset;

    let rows_long = n.saturating_sub(long);
    let rows = n.saturating_sub(long + q);
    if rows_long < long + 1 || rows < k.max(1) {
        return Err(ArimaError::InsufficientData {
            required: (2 * long + 1).max(long + q + k.max(1)),
            actual: n,
        });
    }

    let center = mean(w);
    let centered: Vec<f64> = w.iter().map(|v| v - center).collect();

    // Step 1: long autoregression for innovation estimates
    let x_long = DMatrix::from_fn(rows_long, long + 1, |r, c| {
        if c == 0 {
            1.0
        } else {
            centered[r + long - c]
        }
    });
    let y_long = DVector::from_vec(centered[long..].to_vec());
    let b_long = least_squares(&x_long, &y_long)?;

    let mut innovations = vec![0.0; n];
    for t in long..n {
        let mut fitted = b_long[0];
        for i in 1..=long {
            fitted += b_long[i] * centered[t - i];
        }
        innovations[t] = centered[t] - fitted;
    }

    // Step 2: regress on own lags and lagged innovations
    let z: Vec<f64> = if with_constant {
        centered
    } else {
        w.to_vec()
    };
    let start = long + q;
    let x = DMatrix::from_fn(rows, k, |r, c| {
        let t = r + start;
        if c < offset {
            1.0
        } else if c < offset + p {
            z[t - (c - offset) - 1]
        } else {
            innovations[t - (c - offset - p) - 1]
        }
    });
    let y = DVector::from_vec(z[start..].to_vec());
    let beta = least_squares(&x, &y)?;

    let ar: Vec<f64> = beta.iter().skip(offset).take(p).copied().collect();
    let ma: Vec<f64> = beta.iter().skip(offset + p).take(q).copied().collect();
    let constant = if with_constant {
        beta[0] + center * (1.0 - ar.iter().sum::<f64>())
    } else {
        0.0
    };
    Ok((constant, ar, ma))
}

/// One-step residuals; residuals before index p are zero
fn recursive_residuals(w: &[f64], constant: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = w.len();
    let p = ar.len();
    let mut residuals = vec![0.0; n];

    for t in p..n {
        let mut fitted = constant;
        for (i, phi) in ar.iter().enumerate() {
            fitted += phi * w[t - i - 1];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                fitted += theta * residuals[t - j - 1];
            }
        }
        residuals[t] = w[t] - fitted;
    }

    residuals
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic uniform noise in [-0.5, 0.5)
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64 - 0.5
        }
    }

    #[test]
    fn test_difference() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 1), vec![3.0, 5.0, 7.0]);
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 2), vec![2.0, 2.0]);
        assert!(difference(&[1.0], 1).is_empty());
    }

    #[test]
    fn test_ar1_on_linear_series() {
        let data = [10.0, 11.0, 12.0, 13.0, 14.0];
        let model = ArimaModel::fit(&data, ArimaOrder::new(1, 0, 0)).unwrap();

        assert!((model.ar_coefficients()[0] - 1.0).abs() < 1e-6);
        assert!((model.forecast_next() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_differenced_ar1_on_linear_series() {
        let data: Vec<f64> = (0..8).map(|t| 100.0 + 2.0 * t as f64).collect();
        let model = ArimaModel::fit(&data, ArimaOrder::new(1, 1, 0)).unwrap();

        assert_eq!(model.constant(), 0.0);
        assert!((model.forecast_next() - 116.0).abs() < 1e-9);
    }

    #[test]
    fn test_second_difference_on_quadratic() {
        let data: Vec<f64> = (0..10).map(|t| (t * t) as f64).collect();
        let model = ArimaModel::fit(&data, ArimaOrder::new(1, 2, 0)).unwrap();
        assert!((model.forecast_next() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_white_noise_forecasts_mean() {
        let data = [4.0, 6.0, 5.0, 7.0, 3.0];
        let model = ArimaModel::fit(&data, ArimaOrder::new(0, 0, 0)).unwrap();
        assert!((model.forecast_next() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_walk_forecasts_last() {
        let data = [4.0, 6.0, 5.0, 7.0, 3.0];
        let model = ArimaModel::fit(&data, ArimaOrder::new(0, 1, 0)).unwrap();
        assert_eq!(model.forecast_next(), 3.0);
        assert_eq!(model.last_observed(), 3.0);
    }

    #[test]
    fn test_recovers_ar_coefficient() {
        let mut noise = Lcg(7);
        let mut data = vec![10.0];
        for _ in 1..600 {
            let prev = data[data.len() - 1];
            data.push(4.0 + 0.6 * prev + noise.next());
        }

        let model = ArimaModel::fit(&data, ArimaOrder::new(1, 0, 0)).unwrap();
        assert!((model.ar_coefficients()[0] - 0.6).abs() < 0.1);
        assert!(model.sigma2() > 0.0);
    }

    #[test]
    fn test_recovers_arma_coefficients() {
        let mut noise = Lcg(42);
        let mut data = vec![0.0];
        let mut prev_e = 0.0;
        for _ in 1..3000 {
            let e = noise.next();
            let prev = data[data.len() - 1];
            data.push(50.0 + 0.5 * (prev - 50.0) + e + 0.4 * prev_e);
            prev_e = e;
        }

        let model = ArimaModel::fit(&data[100..], ArimaOrder::new(1, 0, 1)).unwrap();
        assert!((model.ar_coefficients()[0] - 0.5).abs() < 0.15);
        assert!((model.ma_coefficients()[0] - 0.4).abs() < 0.15);
        assert!(model.forecast_next().is_finite());
    }

    #[test]
    fn test_constant_series_is_singular() {
        let data = [5.0; 12];
        let result = ArimaModel::fit(&data, ArimaOrder::new(1, 0, 0));
        assert_eq!(result.unwrap_err(), ArimaError::Singular);
    }

    #[test]
    fn test_too_short() {
        let result = ArimaModel::fit(&[1.0, 2.0], ArimaOrder::new(2, 0, 0));
        assert!(matches!(result, Err(ArimaError::InsufficientData { .. })));

        let result = ArimaModel::fit(&[1.0, 2.0, 3.0, 4.0], ArimaOrder::new(1, 0, 2));
        assert!(matches!(result, Err(ArimaError::InsufficientData { .. })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = ArimaModel::fit(&[1.0, f64::NAN, 3.0], ArimaOrder::new(0, 0, 0));
        assert_eq!(result.unwrap_err(), ArimaError::InvalidData);
    }

    #[test]
    fn test_aic_prefers_better_fit() {
        let mut noise = Lcg(3);
        let mut data = vec![10.0];
        for _ in 1..300 {
            let prev = data[data.len() - 1];
            data.push(2.0 + 0.8 * prev + noise.next());
        }

        let ar1 = ArimaModel::fit(&data, ArimaOrder::new(1, 0, 0)).unwrap();
        let mean_only = ArimaModel::fit(&data, ArimaOrder::new(0, 0, 0)).unwrap();
        assert!(ar1.aic() < mean_only.aic());
    }

    #[test]
    fn test_aic_from_common_start() {
        let data: Vec<f64> = (0..20).map(|t| 10.0 + (t % 5) as f64).collect();
        let ar2 = ArimaModel::fit(&data, ArimaOrder::new(2, 0, 0)).unwrap();

        assert_eq!(ar2.aic_from(1), None);
        assert_eq!(ar2.aic_from(20), None);
        assert_eq!(ar2.aic_from(2), Some(ar2.aic()));
        assert!(ar2.aic_from(5).unwrap() < ar2.aic());
    }
}
