//! Pre-emphasis filter
//!
//! First-order FIR filter `y[n] = x[n] - alpha * x[n-1]` used to boost
//! the high-frequency formants of a speech signal before framing. The
//! filter treats the list as circular: the "previous" sample of `x[1]`
//! is `x[N]`.

use tracing::warn;

use crate::complex::{Complex, Real};
use crate::error::Result;
use crate::samples::{SampleKind, SampleList};

/// Default filter coefficient used when an out-of-range alpha is given
pub const DEFAULT_ALPHA: Real = 0.95;

/// Pre-emphasized value of `x[n]` given `x[n-1]`
///
/// An alpha outside `(0, 1)` falls back to [`DEFAULT_ALPHA`].
pub fn preemphasis(alpha: Real, x_current: Real, x_previous: Real) -> Real {
    let alpha = if alpha <= f64::EPSILON || 1.0 - alpha <= f64::EPSILON {
        warn!(alpha, "pre-emphasis alpha out of range, using default");
        DEFAULT_ALPHA
    } else {
        alpha
    };
    x_current - alpha * x_previous
}

/// Applies the pre-emphasis filter to every sample of the list in place
///
/// Real and imaginary components are filtered independently. The first
/// sample uses the last sample of the list as its predecessor.
pub fn list_preemphasis(list: &mut SampleList, alpha: Real) -> Result<()> {
    if list.is_empty() {
        return Ok(());
    }
    let is_complex = list.kind() == SampleKind::Complex;
    let mut last = list.get(list.len())?;

    for pos in 1..=list.len() {
        let cur = list.get(pos)?;
        let re = preemphasis(alpha, cur.re, last.re);
        let im = if is_complex {
            preemphasis(alpha, cur.im, last.im)
        } else {
            0.0
        };
        list.set(pos, Complex::new(re, im))?;
        last = cur;
    }
    Ok(())
}
