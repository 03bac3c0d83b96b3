//! Learning-curve regression.
//!
//! Fits the power law `T(n) = T₁ · n^b` by ordinary least squares in log-log space:
//! `ln(time) = intercept + slope · ln(sequence)`. The slope is the learning exponent (negative
//! means the learner gets faster) and `2^slope` is the learning rate, i.e. the factor by which
//! solve time shrinks every time the number of completed tasks doubles.
//!
//! Degenerate inputs never fail:
//!
//! - no observations: everything zero, learning rate 1
//! - one observation, or all sequence indices equal: slope 0, intercept = mean of `ln(time)`, R² 0
//! - constant times: R² 0 (not 1), so flat data never looks like a perfect fit
//!
//! All arithmetic runs at full precision; only the returned fields are rounded
//! (4 decimals for exponents and ratios, 2 for seconds).

use serde::Serialize;
use tracing::debug;
use util::rounding::{round2, round4};

/// Below this magnitude the OLS denominator is treated as zero.
const DENOMINATOR_EPSILON: f64 = 1e-12;
/// Below this total sum of squares the data is treated as constant.
const VARIANCE_EPSILON: f64 = 1e-12;
/// Elapsed times are floored here before taking logarithms.
const MIN_SECONDS: f64 = 0.01;

/// Result of fitting the learning curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionFit {
    /// Slope in log-log space.
    pub exponent: f64,
    /// `2^exponent`.
    pub learning_rate: f64,
    pub intercept: f64,
    /// `e^intercept`, in seconds.
    pub predicted_first_task_time: f64,
    pub r_squared: f64,
    pub sample_size: usize,
    /// `ln(time) - fitted ln(time)` per observation.
    pub residuals: Vec<f64>,
    /// Fitted time per observation, in seconds.
    pub predicted_times: Vec<f64>,
}

impl RegressionFit {
    fn empty() -> Self {
        Self {
            exponent: 0.0,
            learning_rate: 1.0,
            intercept: 0.0,
            predicted_first_task_time: 0.0,
            r_squared: 0.0,
            sample_size: 0,
            residuals: vec![],
            predicted_times: vec![],
        }
    }
}

/// Plain OLS coefficients for `y = intercept + slope · x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least squares on paired observations.
///
/// `x` and `y` must have the same length. Fewer than two points, or identical `x` values,
/// give a flat line through the mean of `y` with R² 0.
pub fn linear_regression(x: &[f64], y: &[f64]) -> LinearFit {
    let n = x.len().min(y.len());
    if n == 0 {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
        };
    }
    let (x, y) = (&x[..n], &y[..n]);
    let nf = n as f64;
    let mean_y = y.iter().sum::<f64>() / nf;

    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(xi, yi)| xi * yi).sum();
    let sum_xx: f64 = x.iter().map(|xi| xi * xi).sum();

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom.abs() < DENOMINATOR_EPSILON {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;

    let ss_tot: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();

    let r_squared = if ss_tot < VARIANCE_EPSILON {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Fits the learning curve over `(sequence_index, elapsed_seconds)` pairs.
///
/// Pairs are expected in ascending sequence order (one per successful attempt) with
/// `sequence_index >= 1`.
pub fn fit_learning_curve(observations: &[(u32, f64)]) -> RegressionFit {
    if observations.is_empty() {
        return RegressionFit::empty();
    }

    let x: Vec<f64> = observations
        .iter()
        .map(|&(seq, _)| f64::from(seq.max(1)).ln())
        .collect();
    let y: Vec<f64> = observations
        .iter()
        .map(|&(_, secs)| secs.max(MIN_SECONDS).ln())
        .collect();

    let fit = linear_regression(&x, &y);
    let fitted: Vec<f64> = x.iter().map(|xi| fit.intercept + fit.slope * xi).collect();

    debug!(
        slope = fit.slope,
        intercept = fit.intercept,
        r_squared = fit.r_squared,
        n = observations.len(),
        "learning curve fitted"
    );

    RegressionFit {
        exponent: round4(fit.slope),
        learning_rate: round4(2f64.powf(fit.slope)),
        intercept: round4(fit.intercept),
        predicted_first_task_time: round2(fit.intercept.exp()),
        r_squared: round4(fit.r_squared),
        sample_size: observations.len(),
        residuals: y
            .iter()
            .zip(&fitted)
            .map(|(yi, fi)| round4(yi - fi))
            .collect(),
        predicted_times: fitted.iter().map(|fi| round2(fi.exp())).collect(),
    }
}
