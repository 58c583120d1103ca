//! Learning-rate functions
//!
//! Parameterized functions of the epoch counter selecting how fast the
//! codebook vectors move toward (or away from) the training inputs.

use serde::{Deserialize, Serialize};

use crate::error::{LvqError, Result};

/// Time-decaying learning-rate functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LRateFunction {
    /// `eta(t) = rate`
    Constant { rate: f64 },
    /// `eta(t) = initial * exp(-t / time_constant)`
    ExponentialDecay { initial: f64, time_constant: f64 },
    /// `eta(t) = max(0, initial * (1 - t / final_time))`
    LinearDecay { initial: f64, final_time: f64 },
}

impl LRateFunction {
    /// Validates the function parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            LRateFunction::Constant { rate } => {
                if rate <= 0.0 {
                    return Err(LvqError::domain(
                        "lrate_function",
                        "constant rate must be positive",
                    ));
                }
            }
            LRateFunction::ExponentialDecay {
                initial,
                time_constant,
            } => {
                if initial <= 0.0 || time_constant <= 0.0 {
                    return Err(LvqError::domain(
                        "lrate_function",
                        "exponential decay requires positive initial rate and time constant",
                    ));
                }
            }
            LRateFunction::LinearDecay {
                initial,
                final_time,
            } => {
                if initial <= 0.0 || final_time <= 0.0 {
                    return Err(LvqError::domain(
                        "lrate_function",
                        "linear decay requires positive initial rate and final time",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Learning rate at training time `t`
    pub fn value(&self, t: f64) -> f64 {
        match *self {
            LRateFunction::Constant { rate } => rate,
            LRateFunction::ExponentialDecay {
                initial,
                time_constant,
            } => initial * (-t / time_constant).exp(),
            LRateFunction::LinearDecay {
                initial,
                final_time,
            } => (initial * (1.0 - t / final_time)).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let f = LRateFunction::Constant { rate: 0.3 };
        f.validate().unwrap();
        assert_eq!(f.value(0.0), 0.3);
        assert_eq!(f.value(1000.0), 0.3);
    }

    #[test]
    fn test_exponential_decay() {
        let f = LRateFunction::ExponentialDecay {
            initial: 1.0,
            time_constant: 2.0,
        };
        f.validate().unwrap();
        assert_eq!(f.value(0.0), 1.0);
        assert!((f.value(2.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert!(f.value(100.0) < f.value(10.0));
    }

    #[test]
    fn test_linear_decay_clamps_at_zero() {
        let f = LRateFunction::LinearDecay {
            initial: 0.5,
            final_time: 10.0,
        };
        f.validate().unwrap();
        assert_eq!(f.value(0.0), 0.5);
        assert!((f.value(5.0) - 0.25).abs() < 1e-12);
        assert_eq!(f.value(10.0), 0.0);
        assert_eq!(f.value(20.0), 0.0);
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        assert!(LRateFunction::Constant { rate: 0.0 }.validate().is_err());
        assert!(LRateFunction::ExponentialDecay {
            initial: 1.0,
            time_constant: -1.0
        }
        .validate()
        .is_err());
        assert!(LRateFunction::LinearDecay {
            initial: -0.5,
            final_time: 10.0
        }
        .validate()
        .is_err());
    }
}
