//! Incremental statistics and random generation
//!
//! [`IncStats`] accumulates paired observations `(x, y)` one at a time
//! and answers sums, means, variances, extrema, linear regression and
//! correlation without retaining the samples. The accumulator is a plain
//! value owned by its caller; typical use is `clear -> add* -> read`.
//!
//! The random helpers draw from a caller-supplied, caller-seeded
//! generator: uniform integers and reals over `[low, high)` and a polar
//! Box-Muller Gaussian.

use rand::Rng;

use crate::error::{Result, SignalError};

/// Running statistics over paired observations
#[derive(Debug, Clone, Default)]
pub struct IncStats {
    samples: u64,
    sum_x: f64,
    sum_y: f64,
    avg_x: f64,
    avg_y: f64,
    sqr_diff_x: f64,
    sqr_diff_y: f64,
    sum_sqr_x: f64,
    sum_sqr_y: f64,
    sum_sqr_diff_xy: f64,
    sum_xy: f64,
    max_x: f64,
    min_x: f64,
    max_y: f64,
    min_y: f64,
}

impl IncStats {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all internal statistics
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Adds a new paired observation
    pub fn add(&mut self, x: f64, y: f64) {
        let avg_x_old = self.avg_x;
        let avg_y_old = self.avg_y;
        let n = self.samples as f64;

        self.avg_x = (n * self.avg_x + x) / (n + 1.0);
        self.avg_y = (n * self.avg_y + y) / (n + 1.0);

        self.sum_x += x;
        self.sum_y += y;
        self.sum_sqr_x += x * x;
        self.sum_sqr_y += y * y;
        self.sum_xy += x * y;
        self.sum_sqr_diff_xy += (x - y) * (x - y);

        // Welford-style second moment accumulation
        self.sqr_diff_x += (x - avg_x_old) * (x - self.avg_x);
        self.sqr_diff_y += (y - avg_y_old) * (y - self.avg_y);

        if self.samples == 0 {
            self.min_x = x;
            self.max_x = x;
            self.min_y = y;
            self.max_y = y;
        } else {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }

        self.samples += 1;
    }

    /// Current number of observations
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn sum_x(&self) -> f64 {
        self.sum_x
    }

    pub fn sum_y(&self) -> f64 {
        self.sum_y
    }

    pub fn sum_sqr_x(&self) -> f64 {
        self.sum_sqr_x
    }

    pub fn sum_sqr_y(&self) -> f64 {
        self.sum_sqr_y
    }

    /// Sum of the `x * y` products over all observations
    pub fn sum_xy(&self) -> f64 {
        self.sum_xy
    }

    /// Sum of the squared `(x - y)` differences over all observations
    pub fn sum_sqr_diff_xy(&self) -> f64 {
        self.sum_sqr_diff_xy
    }

    pub fn average_x(&self) -> f64 {
        self.avg_x
    }

    pub fn average_y(&self) -> f64 {
        self.avg_y
    }

    pub fn variance_x(&self) -> f64 {
        if self.samples > 0 {
            self.sqr_diff_x / self.samples as f64
        } else {
            0.0
        }
    }

    pub fn variance_y(&self) -> f64 {
        if self.samples > 0 {
            self.sqr_diff_y / self.samples as f64
        } else {
            0.0
        }
    }

    pub fn stddev_x(&self) -> f64 {
        self.variance_x().sqrt()
    }

    pub fn stddev_y(&self) -> f64 {
        self.variance_y().sqrt()
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// Linear regression of `y` on `x`
    ///
    /// Returns `(linear, angular)` coefficients of the least-squares line
    /// `y = linear + angular * x`. Fails when the observations are
    /// degenerate (all `x` identical or fewer than two samples).
    pub fn linear_regression(&self) -> Result<(f64, f64)> {
        let n = self.samples as f64;
        let den = n * self.sum_sqr_x - self.sum_x * self.sum_x;
        if den.abs() < f64::EPSILON {
            return Err(SignalError::domain(
                "linear_regression",
                "degenerate observation set",
            ));
        }
        let linear = (self.sum_y * self.sum_sqr_x - self.sum_x * self.sum_xy) / den;
        let angular = (n * self.sum_xy - self.sum_x * self.sum_y) / den;
        Ok((linear, angular))
    }

    /// Linear correlation coefficient between the x and y observations
    pub fn linear_correlation(&self) -> Result<f64> {
        let n = self.samples as f64;
        let den_x = n * self.sum_sqr_x - self.sum_x * self.sum_x;
        let den_y = n * self.sum_sqr_y - self.sum_y * self.sum_y;
        let den = (den_x * den_y).sqrt();
        if den.abs() < f64::EPSILON {
            return Err(SignalError::domain(
                "linear_correlation",
                "degenerate observation set",
            ));
        }
        Ok((n * self.sum_xy - self.sum_x * self.sum_y) / den)
    }
}

/// Uniform random integer in `[low, high)`
///
/// `low == high` collapses to `low`.
pub fn uniform_integer<R: Rng + ?Sized>(rng: &mut R, low: u64, high: u64) -> Result<u64> {
    if low > high {
        return Err(SignalError::domain(
            "uniform_integer",
            "lower bound greater than upper bound",
        ));
    }
    if low == high {
        return Ok(low);
    }
    Ok(rng.gen_range(low..high))
}

/// Uniform random real in `[low, high)`
pub fn uniform_real<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Result<f64> {
    if low > high {
        return Err(SignalError::domain(
            "uniform_real",
            "lower bound greater than upper bound",
        ));
    }
    if (high - low).abs() < f64::EPSILON {
        return Ok(low);
    }
    Ok(rng.gen_range(low..high))
}

/// Gaussian random value by the polar Box-Muller method
///
/// Draws pairs from the unit square until one lands strictly inside the
/// unit circle, then maps it to a normal deviate with the requested
/// average and standard deviation.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, avg: f64, stddev: f64) -> f64 {
    loop {
        let v1: f64 = rng.gen_range(-1.0..1.0);
        let v2: f64 = rng.gen_range(-1.0..1.0);
        let rsq = v1 * v1 + v2 * v2;
        if rsq > 0.0 && rsq < 1.0 {
            let fac = (-2.0 * rsq.ln() / rsq).sqrt();
            return avg + stddev * v2 * fac;
        }
    }
}
