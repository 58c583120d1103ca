//! Transition maps
//!
//! A `K x K` integer grid counting `(desired class -> predicted class)`
//! transitions over a sweep; the confusion matrix of a training or
//! evaluation pass.

use std::fmt;

use crate::error::{LvqError, Result};

/// Confusion-matrix counter over `classes x classes` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMap {
    classes: usize,
    counts: Vec<u64>,
}

impl TransitionMap {
    /// Creates a zeroed map for the given class count
    pub fn new(classes: usize) -> Result<Self> {
        if classes == 0 {
            return Err(LvqError::domain(
                "transition_map",
                "map must have at least one class",
            ));
        }
        Ok(TransitionMap {
            classes,
            counts: vec![0; classes * classes],
        })
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Zeroes every cell
    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    fn cell(&self, desired: usize, predicted: usize) -> Result<usize> {
        if desired == 0 || desired > self.classes || predicted == 0 || predicted > self.classes {
            return Err(LvqError::domain(
                "transition_map",
                format!(
                    "transition ({desired} -> {predicted}) outside 1..={}",
                    self.classes
                ),
            ));
        }
        Ok((desired - 1) * self.classes + (predicted - 1))
    }

    /// Records one `(desired -> predicted)` transition
    pub fn transition(&mut self, desired: usize, predicted: usize) -> Result<()> {
        let cell = self.cell(desired, predicted)?;
        self.counts[cell] += 1;
        Ok(())
    }

    /// Count of one cell
    pub fn count(&self, desired: usize, predicted: usize) -> Result<u64> {
        Ok(self.counts[self.cell(desired, predicted)?])
    }

    /// Total observations for one desired class
    pub fn row_total(&self, desired: usize) -> Result<u64> {
        let base = self.cell(desired, 1)?;
        Ok(self.counts[base..base + self.classes].iter().sum())
    }

    /// Total observations recorded
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Observations on the diagonal (correct classifications)
    pub fn correct(&self) -> u64 {
        (1..=self.classes)
            .map(|c| self.counts[(c - 1) * self.classes + (c - 1)])
            .sum()
    }
}

impl fmt::Display for TransitionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "desired \\ predicted")?;
        for predicted in 1..=self.classes {
            write!(f, " {predicted:>8}")?;
        }
        writeln!(f)?;
        for desired in 1..=self.classes {
            write!(f, "{desired:>19}")?;
            for predicted in 1..=self.classes {
                let cell = (desired - 1) * self.classes + (predicted - 1);
                write!(f, " {:>8}", self.counts[cell])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
