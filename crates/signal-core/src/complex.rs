//! Complex function catalogue
//!
//! A fixed catalogue of dual-mode complex functions. Each function takes
//! a mode selector (real or complex calculation), a slice of complex
//! inputs and a slice of real parameters, and returns a single complex
//! value. The catalogue is the arithmetic substrate of the pipeline: the
//! FFT butterflies, the power spectrum and the cepstral log are all
//! expressed through it.
//!
//! In real mode only the real components participate; the imaginary
//! component of the result is zero.

use num_complex::Complex64;

use crate::error::{Result, SignalError};

/// Real scalar type used throughout the pipeline
pub type Real = f64;

/// Complex value type used throughout the pipeline
pub type Complex = Complex64;

/// Calculation mode for the catalogue functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpxMode {
    /// Operate on real components only
    Real,
    /// Operate on both components
    Complex,
}

impl CpxMode {
    fn name(&self) -> &'static str {
        match self {
            CpxMode::Real => "real",
            CpxMode::Complex => "complex",
        }
    }
}

/// The catalogue of complex functions
///
/// For an input `z = a + jb`:
///
/// * `Modulus` - `sqrt(a^2 + b^2)`
/// * `SqrModulus` - `a^2 + b^2`
/// * `Argument` - `atan(b/a)`, saturating when `|a|` vanishes
/// * `Minus` - `-a - jb`
/// * `Conjugate` - `a - jb`
/// * `Sum` - component-wise sum of all inputs
/// * `Subtract` - first input minus all the others
/// * `RealProduct` - input scaled by the product of the real parameters
/// * `Times` - complex product of all inputs
/// * `Inverse` - `conj(z) / |z|^2`
/// * `Exponential` - `e^a (cos b + j sin b)`
/// * `RealLog` - per-component logarithm at the parameter basis
/// * `Absolute` - per-component absolute value
/// * `LogModulus` - `0.5 * log_basis(a^2 + b^2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpxFunction {
    Modulus,
    SqrModulus,
    Argument,
    Minus,
    Conjugate,
    Sum,
    Subtract,
    RealProduct,
    Times,
    Inverse,
    Exponential,
    RealLog,
    Absolute,
    LogModulus,
}

/// Logarithm at an arbitrary basis
fn log_basis(x: Real, basis: Real) -> Real {
    x.ln() / basis.ln()
}

/// Validates a logarithm basis: `b > 0` and `b != 1`
fn check_basis(function: &'static str, basis: Real) -> Result<()> {
    if basis < f64::EPSILON || (basis - 1.0).abs() < f64::EPSILON {
        return Err(SignalError::domain(
            function,
            format!("invalid log basis: {basis}"),
        ));
    }
    Ok(())
}

fn expect_inputs(
    function: &'static str,
    inputs: &[Complex],
    expected: usize,
) -> Result<()> {
    if inputs.len() != expected {
        return Err(SignalError::Arity {
            function,
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}

fn expect_complex_mode(function: &'static str, mode: CpxMode) -> Result<()> {
    if mode != CpxMode::Complex {
        return Err(SignalError::Mode {
            function,
            mode: mode.name(),
        });
    }
    Ok(())
}

impl CpxFunction {
    /// Applies the function to the given inputs and parameters
    ///
    /// Input and parameter counts are validated against the function's
    /// arity; functions that are only meaningful for complex values
    /// reject real mode.
    pub fn apply(
        &self,
        mode: CpxMode,
        inputs: &[Complex],
        params: &[Real],
    ) -> Result<Complex> {
        match self {
            CpxFunction::Modulus => {
                expect_inputs("cpx_modulus", inputs, 1)?;
                expect_complex_mode("cpx_modulus", mode)?;
                let z = inputs[0];
                Ok(Complex::new((z.re * z.re + z.im * z.im).sqrt(), 0.0))
            }

            CpxFunction::SqrModulus => {
                expect_inputs("cpx_sqr_modulus", inputs, 1)?;
                expect_complex_mode("cpx_sqr_modulus", mode)?;
                let z = inputs[0];
                Ok(Complex::new(z.re * z.re + z.im * z.im, 0.0))
            }

            CpxFunction::Argument => {
                expect_inputs("cpx_argument", inputs, 1)?;
                expect_complex_mode("cpx_argument", mode)?;
                let z = inputs[0];
                // The argument saturates instead of dividing by zero
                let arg = if z.re.abs() < f64::EPSILON {
                    f64::MAX.atan()
                } else {
                    (z.im / z.re).atan()
                };
                Ok(Complex::new(arg, 0.0))
            }

            CpxFunction::Minus => {
                expect_inputs("cpx_minus", inputs, 1)?;
                let z = inputs[0];
                let im = if mode == CpxMode::Complex { -z.im } else { 0.0 };
                Ok(Complex::new(-z.re, im))
            }

            CpxFunction::Conjugate => {
                expect_inputs("cpx_conjugate", inputs, 1)?;
                expect_complex_mode("cpx_conjugate", mode)?;
                let z = inputs[0];
                Ok(Complex::new(z.re, -z.im))
            }

            CpxFunction::Sum => {
                let mut acc = Complex::new(0.0, 0.0);
                for z in inputs {
                    acc.re += z.re;
                    if mode == CpxMode::Complex {
                        acc.im += z.im;
                    }
                }
                Ok(acc)
            }

            CpxFunction::Subtract => {
                let mut acc = Complex::new(0.0, 0.0);
                for (i, z) in inputs.iter().enumerate() {
                    let sign = if i == 0 { 1.0 } else { -1.0 };
                    acc.re += sign * z.re;
                    if mode == CpxMode::Complex {
                        acc.im += sign * z.im;
                    }
                }
                Ok(acc)
            }

            CpxFunction::RealProduct => {
                expect_inputs("cpx_real_product", inputs, 1)?;
                if params.is_empty() {
                    return Err(SignalError::domain(
                        "cpx_real_product",
                        "at least one real parameter is required",
                    ));
                }
                let mut z = inputs[0];
                for k in params {
                    z.re *= k;
                    if mode == CpxMode::Complex {
                        z.im *= k;
                    }
                }
                if mode == CpxMode::Real {
                    z.im = 0.0;
                }
                Ok(z)
            }

            CpxFunction::Times => {
                expect_complex_mode("cpx_times", mode)?;
                let mut acc = Complex::new(1.0, 0.0);
                for z in inputs {
                    acc = Complex::new(
                        acc.re * z.re - acc.im * z.im,
                        acc.re * z.im + acc.im * z.re,
                    );
                }
                Ok(acc)
            }

            CpxFunction::Inverse => {
                expect_inputs("cpx_inverse", inputs, 1)?;
                expect_complex_mode("cpx_inverse", mode)?;
                let z = inputs[0];
                let den = z.re * z.re + z.im * z.im;
                if den.abs() < f64::EPSILON {
                    return Err(SignalError::domain(
                        "cpx_inverse",
                        "non-invertible complex",
                    ));
                }
                Ok(Complex::new(z.re / den, -z.im / den))
            }

            CpxFunction::Exponential => {
                expect_inputs("cpx_exponential", inputs, 1)?;
                expect_complex_mode("cpx_exponential", mode)?;
                let z = inputs[0];
                let e = z.re.exp();
                Ok(Complex::new(e * z.im.cos(), e * z.im.sin()))
            }

            CpxFunction::RealLog => {
                expect_inputs("cpx_real_log", inputs, 1)?;
                if params.len() != 1 {
                    return Err(SignalError::domain(
                        "cpx_real_log",
                        "exactly one parameter (basis) is required",
                    ));
                }
                let basis = params[0];
                check_basis("cpx_real_log", basis)?;

                let mut z = inputs[0];
                // Zeroed components are promoted to one before the log
                if z.re.abs() < f64::EPSILON {
                    z.re = 1.0;
                }
                if z.im.abs() < f64::EPSILON {
                    z.im = 1.0;
                }
                if z.re < f64::EPSILON
                    || (mode == CpxMode::Complex && z.im < f64::EPSILON)
                {
                    return Err(SignalError::domain(
                        "cpx_real_log",
                        format!("invalid argument: {} + j {}", z.re, z.im),
                    ));
                }
                let im = if mode == CpxMode::Complex {
                    log_basis(z.im, basis)
                } else {
                    0.0
                };
                Ok(Complex::new(log_basis(z.re, basis), im))
            }

            CpxFunction::Absolute => {
                expect_inputs("cpx_absolute", inputs, 1)?;
                let z = inputs[0];
                let im = if mode == CpxMode::Complex { z.im.abs() } else { 0.0 };
                Ok(Complex::new(z.re.abs(), im))
            }

            CpxFunction::LogModulus => {
                expect_inputs("cpx_log_modulus", inputs, 1)?;
                expect_complex_mode("cpx_log_modulus", mode)?;
                if params.len() != 1 {
                    return Err(SignalError::domain(
                        "cpx_log_modulus",
                        "exactly one parameter (basis) is required",
                    ));
                }
                let basis = params[0];
                check_basis("cpx_log_modulus", basis)?;
                let z = inputs[0];
                let sqr = z.re * z.re + z.im * z.im;
                Ok(Complex::new(0.5 * log_basis(sqr, basis), 0.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    #[test]
    fn test_modulus() {
        let z = CpxFunction::Modulus
            .apply(CpxMode::Complex, &[c(3.0, 4.0)], &[])
            .unwrap();
        assert!((z.re - 5.0).abs() < 1e-12);
        assert_eq!(z.im, 0.0);
    }

    #[test]
    fn test_modulus_rejects_real_mode() {
        let err = CpxFunction::Modulus.apply(CpxMode::Real, &[c(3.0, 4.0)], &[]);
        assert!(matches!(err, Err(SignalError::Mode { .. })));
    }

    #[test]
    fn test_sqr_modulus() {
        let z = CpxFunction::SqrModulus
            .apply(CpxMode::Complex, &[c(3.0, 4.0)], &[])
            .unwrap();
        assert!((z.re - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_argument_saturates_near_zero_real_part() {
        let z = CpxFunction::Argument
            .apply(CpxMode::Complex, &[c(0.0, 1.0)], &[])
            .unwrap();
        assert!((z.re - f64::MAX.atan()).abs() < 1e-12);
    }

    #[test]
    fn test_sum_and_subtract() {
        let inputs = [c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)];
        let s = CpxFunction::Sum
            .apply(CpxMode::Complex, &inputs, &[])
            .unwrap();
        assert_eq!(s, c(9.0, 12.0));

        let d = CpxFunction::Subtract
            .apply(CpxMode::Complex, &inputs, &[])
            .unwrap();
        assert_eq!(d, c(-7.0, -8.0));

        // Real mode ignores the imaginary component
        let s = CpxFunction::Sum.apply(CpxMode::Real, &inputs, &[]).unwrap();
        assert_eq!(s, c(9.0, 0.0));
    }

    #[test]
    fn test_real_product_scales_by_all_params() {
        let z = CpxFunction::RealProduct
            .apply(CpxMode::Complex, &[c(1.0, -2.0)], &[2.0, 0.5, 4.0])
            .unwrap();
        assert_eq!(z, c(4.0, -8.0));
    }

    #[test]
    fn test_real_product_requires_param() {
        let err = CpxFunction::RealProduct.apply(CpxMode::Complex, &[c(1.0, 0.0)], &[]);
        assert!(err.is_err());
    }

    #[test]
    fn test_times() {
        // (1 + j)(1 - j) = 2
        let z = CpxFunction::Times
            .apply(CpxMode::Complex, &[c(1.0, 1.0), c(1.0, -1.0)], &[])
            .unwrap();
        assert!((z.re - 2.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn test_inverse() {
        let z = CpxFunction::Inverse
            .apply(CpxMode::Complex, &[c(0.0, 2.0)], &[])
            .unwrap();
        assert!((z.im + 0.5).abs() < 1e-12);

        let err = CpxFunction::Inverse.apply(CpxMode::Complex, &[c(0.0, 0.0)], &[]);
        assert!(err.is_err());
    }

    #[test]
    fn test_exponential() {
        use std::f64::consts::PI;
        // e^{j pi} = -1
        let z = CpxFunction::Exponential
            .apply(CpxMode::Complex, &[c(0.0, PI)], &[])
            .unwrap();
        assert!((z.re + 1.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn test_real_log_promotes_zeros() {
        // (0, 8) at basis 2: re promoted to 1 -> log2(1) = 0, log2(8) = 3
        let z = CpxFunction::RealLog
            .apply(CpxMode::Complex, &[c(0.0, 8.0)], &[2.0])
            .unwrap();
        assert!(z.re.abs() < 1e-12);
        assert!((z.im - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_real_log_rejects_negative_and_bad_basis() {
        let err = CpxFunction::RealLog.apply(CpxMode::Complex, &[c(-1.0, 1.0)], &[2.0]);
        assert!(err.is_err());

        let err = CpxFunction::RealLog.apply(CpxMode::Complex, &[c(2.0, 2.0)], &[1.0]);
        assert!(err.is_err());
    }

    #[test]
    fn test_log_modulus() {
        // |z|^2 = 16 at basis 4: 0.5 * log4(16) = 1
        let z = CpxFunction::LogModulus
            .apply(CpxMode::Complex, &[c(0.0, 4.0)], &[4.0])
            .unwrap();
        assert!((z.re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_absolute_and_minus() {
        let z = CpxFunction::Absolute
            .apply(CpxMode::Complex, &[c(-1.5, -2.5)], &[])
            .unwrap();
        assert_eq!(z, c(1.5, 2.5));

        let z = CpxFunction::Minus
            .apply(CpxMode::Complex, &[c(-1.5, 2.5)], &[])
            .unwrap();
        assert_eq!(z, c(1.5, -2.5));

        let z = CpxFunction::Minus
            .apply(CpxMode::Real, &[c(-1.5, 2.5)], &[])
            .unwrap();
        assert_eq!(z, c(1.5, 0.0));
    }
}
