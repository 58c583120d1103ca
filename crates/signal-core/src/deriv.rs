//! Per-frame derivative estimation
//!
//! Estimates the temporal derivative of each coefficient as the slope of
//! the linear regression over the previous, current and next frames.
//! Lists store their coefficients in the first half and receive their
//! own deltas in the second half, so the derivative of list position `i`
//! lands at position `L/2 + i`.

use crate::complex::{Complex, Real};
use crate::error::{Result, SignalError};
use crate::samples::{SampleIndex, SampleList};
use crate::stats::IncStats;

/// Derivative estimate of `x[n]` from its temporal neighbours
///
/// The regression runs over the points `(0, prev)`, `(1, cur)` and
/// `(2, next)` that are present. With no neighbour at all the
/// derivative is zero.
pub fn derivative(
    x_current: Real,
    x_previous: Option<Real>,
    x_next: Option<Real>,
) -> Result<Real> {
    if x_previous.is_none() && x_next.is_none() {
        return Ok(0.0);
    }
    let mut stats = IncStats::new();
    if let Some(prev) = x_previous {
        stats.add(0.0, prev);
    }
    stats.add(1.0, x_current);
    if let Some(next) = x_next {
        stats.add(2.0, next);
    }
    let (_linear, angular) = stats.linear_regression()?;
    Ok(angular)
}

/// Writes the derivatives of the first-half coefficients of `current`
/// into its second half
///
/// All three lists are read at the same coefficient positions; the list
/// length must be even.
pub fn list_derivative(
    current: &mut SampleList,
    previous: Option<&SampleList>,
    next: Option<&SampleList>,
) -> Result<()> {
    if current.len() % 2 != 0 {
        return Err(SignalError::domain(
            "list_derivative",
            "list must have an even number of elements",
        ));
    }
    let half = current.len() / 2;

    for pos in 1..=half {
        let x_cur = current.get(pos)?.re;
        let x_prev = match previous {
            Some(list) => Some(list.get(pos)?.re),
            None => None,
        };
        let x_next = match next {
            Some(list) => Some(list.get(pos)?.re),
            None => None,
        };
        let delta = derivative(x_cur, x_prev, x_next)?;
        current.set(half + pos, Complex::new(delta, 0.0))?;
    }
    Ok(())
}

/// Computes the derivatives for every list of the index
///
/// Each entry uses its previous and next siblings in traversal order as
/// temporal neighbours.
pub fn index_derivative(index: &mut SampleIndex) -> Result<()> {
    let ids: Vec<_> = index.iter_ids().collect();
    for id in ids {
        let prev_list = index
            .entry(id)?
            .previous()
            .map(|p| index.entry(p).map(|e| e.list.clone()))
            .transpose()?;
        let next_list = index
            .entry(id)?
            .next()
            .map(|n| index.entry(n).map(|e| e.list.clone()))
            .transpose()?;

        list_derivative(
            &mut index.entry_mut(id)?.list,
            prev_list.as_ref(),
            next_list.as_ref(),
        )?;
    }
    Ok(())
}
